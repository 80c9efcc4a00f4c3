// src/stickers.rs

use crate::config::Config;
use crate::table::Table;
use anyhow::{Context, Result};
use image::Luma;
use qrcode::{EcLevel, QrCode};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use url::Url;

/// Pixels per QR module.
const MODULE_PX: u32 = 10;

/// A sticker still waiting to be printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StickerLink {
    pub wise_id: String,
    pub shelf_qr_id: String,
    /// Translator link the QR code must encode.
    pub link: String,
    /// `<wise_id>_<shelf_qr_id>.png`
    pub file_name: String,
}

/// Rows whose printed flag is `FALSE`, in sheet order.
pub fn pending_stickers(table: &Table, config: &Config) -> Result<Vec<StickerLink>> {
    let base = Url::parse(&config.translator_url)
        .with_context(|| format!("parsing translator url {}", config.translator_url))?;

    let mut out = Vec::new();
    for (index, record) in table.records().iter().enumerate() {
        let printed = record.get(&config.printed_column).map(str::trim);
        if !printed.is_some_and(|p| p.eq_ignore_ascii_case("false")) {
            continue;
        }
        let Some(wise_id) = record.get(&config.lookup_column).filter(|v| !v.is_empty()) else {
            warn!(index, "unprinted row without {}", config.lookup_column);
            continue;
        };
        let shelf_qr_id = record.get(&config.target_column).unwrap_or_default();

        let mut link = base.clone();
        link.query_pairs_mut()
            .append_pair(&config.query_param, wise_id);

        out.push(StickerLink {
            wise_id: wise_id.to_string(),
            shelf_qr_id: shelf_qr_id.to_string(),
            link: link.to_string(),
            file_name: format!("{}_{}.png", wise_id, shelf_qr_id),
        });
    }

    if out.is_empty() {
        info!("No QR codes to generate. All items are already marked as printed.");
    } else {
        info!(count = out.len(), "stickers pending");
    }
    Ok(out)
}

/// Render each sticker's link as a PNG QR code named `file_name` under
/// `out_dir`, creating the directory if needed. Returns the written paths.
pub fn write_qr_codes(stickers: &[StickerLink], out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating qr output directory {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(stickers.len());
    for sticker in stickers {
        let code = QrCode::with_error_correction_level(sticker.link.as_bytes(), EcLevel::L)
            .with_context(|| format!("encoding {}", sticker.link))?;
        let img = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(MODULE_PX, MODULE_PX)
            .build();

        let path = out_dir.join(&sticker.file_name);
        img.save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(file = %sticker.file_name, "Generated QR code");
        written.push(path);
    }

    info!(
        "Generated {} QR codes in the '{}' directory.",
        written.len(),
        out_dir.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "WISE_ID,Shelf_QR_ID,QR Code Printed
WISE-01,rwlenjke7h,FALSE
WISE-02,abc123,TRUE
WISE-03,zz9,false
,orphan,FALSE
WISE-05,short";

    #[test]
    fn test_only_unprinted_rows_in_order() {
        let table = Table::parse(SHEET);
        let got = pending_stickers(&table, &Config::default()).unwrap();
        let ids: Vec<_> = got.iter().map(|s| s.wise_id.as_str()).collect();
        assert_eq!(ids, ["WISE-01", "WISE-03"]);
    }

    #[test]
    fn test_link_and_file_name() {
        let table = Table::parse(SHEET);
        let got = pending_stickers(&table, &Config::default()).unwrap();
        assert_eq!(
            got[0],
            StickerLink {
                wise_id: "WISE-01".to_string(),
                shelf_qr_id: "rwlenjke7h".to_string(),
                link: "https://wisecircuitslab.github.io/shelf_url_translator?wise_id=WISE-01"
                    .to_string(),
                file_name: "WISE-01_rwlenjke7h.png".to_string(),
            }
        );
    }

    #[test]
    fn test_all_printed_is_empty() {
        let table = Table::parse("WISE_ID,Shelf_QR_ID,QR Code Printed\nW,Q,TRUE\n");
        assert!(pending_stickers(&table, &Config::default()).unwrap().is_empty());
    }

    #[test]
    fn test_write_qr_codes_only_for_unprinted_rows() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let out_dir = tmp.path().join("qr_codes");
        let pending = pending_stickers(&Table::parse(SHEET), &Config::default())?;

        let written = write_qr_codes(&pending, &out_dir)?;
        assert_eq!(written.len(), 2);

        let mut names: Vec<String> = fs::read_dir(&out_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["WISE-01_rwlenjke7h.png", "WISE-03_zz9.png"]);

        let img = image::open(&written[0])?;
        assert!(img.width() >= 21 * MODULE_PX);
        assert_eq!(img.width(), img.height());
        Ok(())
    }

    #[test]
    fn test_write_qr_codes_nothing_pending() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let out_dir = tmp.path().join("qr_codes");
        assert!(write_qr_codes(&[], &out_dir)?.is_empty());
        assert!(out_dir.is_dir());
        Ok(())
    }

    #[test]
    fn test_bad_translator_url() {
        let cfg = Config {
            translator_url: "nope".to_string(),
            ..Config::default()
        };
        assert!(pending_stickers(&Table::parse(SHEET), &cfg).is_err());
    }
}
