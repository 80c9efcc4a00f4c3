use serde::Serialize;
use std::collections::BTreeMap;

/// One data row keyed by header name.
///
/// A column the row had no field for is simply missing from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Zip `headers` positionally with `values`.
    ///
    /// Values past the last header are dropped. When a header name repeats,
    /// the rightmost column decides the value, including deciding it is absent.
    pub(crate) fn zip(headers: &[String], values: &[&str]) -> Self {
        let mut fields = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            match values.get(i) {
                Some(v) => {
                    fields.insert(header.clone(), (*v).to_string());
                }
                None => {
                    fields.remove(header);
                }
            }
        }
        Self { fields }
    }

    /// Field value for `column`, verbatim as it appeared in the source line.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn short_row_leaves_trailing_fields_absent() {
        let rec = Record::zip(&headers(&["A", "B", "C"]), &["1"]);
        assert_eq!(rec.get("A"), Some("1"));
        assert_eq!(rec.get("B"), None);
        assert_eq!(rec.get("C"), None);
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn extra_values_are_ignored() {
        let rec = Record::zip(&headers(&["A"]), &["1", "2", "3"]);
        assert_eq!(rec, Record::from_iter([("A", "1")]));
    }

    #[test]
    fn duplicate_header_rightmost_column_wins() {
        let rec = Record::zip(&headers(&["ID", "ID"]), &["left", "right"]);
        assert_eq!(rec.get("ID"), Some("right"));

        // the rightmost column is missing on this row, so the value is absent
        let rec = Record::zip(&headers(&["ID", "X", "ID"]), &["left", "x"]);
        assert_eq!(rec.get("ID"), None);
    }

    #[test]
    fn serializes_as_plain_object() {
        let rec = Record::from_iter([("WISE_ID", "WISE-01"), ("Shelf_QR_ID", "QR9")]);
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"Shelf_QR_ID":"QR9","WISE_ID":"WISE-01"}"#);
    }
}
