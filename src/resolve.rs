// src/resolve.rs

use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use crate::fetch::fetch_csv;
use crate::table::{derive_redirect_url, Table};
use reqwest::Client;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Where a resolved URL is sent. Fire-and-forget.
pub trait Navigator {
    fn navigate(&self, url: &str);
}

/// Prints the redirect target on stdout.
pub struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn navigate(&self, url: &str) {
        println!("{}", url);
    }
}

/// First value of `name` in the query string of `link`, percent-decoded.
pub fn query_param(link: &str, name: &str) -> ResolveResult<Option<String>> {
    let url = Url::parse(link)
        .map_err(|e| ResolveError::Input(format!("bad link {:?}: {}", link, e)))?;
    Ok(url
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned()))
}

/// Look `wise_id` up in an already parsed table.
pub fn resolve_in_table(table: &Table, config: &Config, wise_id: &str) -> Option<String> {
    info!(column = %config.lookup_column, value = %wise_id, "searching");
    let Some(record) = table.find_by(&config.lookup_column, wise_id) else {
        info!(value = %wise_id, "no matching row");
        return None;
    };
    debug!(?record, "matched row");

    let target = derive_redirect_url(record, &config.target_column, &config.url_prefix);
    match &target {
        Some(url) => info!(%url, "final url"),
        None => warn!(column = %config.target_column, "matched row has no target value"),
    }
    target
}

/// Fetch the sheet, parse it, and derive the redirect target for `wise_id`.
#[instrument(skip(client, config))]
pub async fn resolve(
    client: &Client,
    config: &Config,
    wise_id: &str,
) -> ResolveResult<Option<String>> {
    let body = fetch_csv(client, &config.csv_url).await?;
    let table = Table::from_body(Some(body))?;
    Ok(resolve_in_table(&table, config, wise_id))
}

/// Full translator flow for one scanned link. Navigates only when a target
/// was found; every failure is logged and swallowed.
pub async fn run(client: &Client, config: &Config, link: &str, nav: &dyn Navigator) -> bool {
    let wise_id = match query_param(link, &config.query_param) {
        Ok(Some(id)) => id,
        Ok(None) => {
            warn!(param = %config.query_param, %link, "query parameter missing");
            return false;
        }
        Err(e) => {
            error!("{}", e);
            return false;
        }
    };

    match resolve(client, config, &wise_id).await {
        Ok(Some(url)) => {
            nav.navigate(&url);
            true
        }
        Ok(None) => false,
        Err(e) => {
            error!(%wise_id, "{}", e);
            false
        }
    }
}
