// src/fetch.rs

use crate::config::Config;
use crate::error::{ResolveError, ResolveResult};
use reqwest::{header, Client, StatusCode};
use tracing::{debug, warn};

/// Build the HTTP client used for sheet downloads.
pub fn build_client(config: &Config) -> ResolveResult<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.fetch_timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// GET the published CSV once. Anything but 200 OK is a [`ResolveError::Network`].
pub async fn fetch_csv(client: &Client, url: &str) -> ResolveResult<String> {
    debug!(%url, "fetching csv");
    let resp = client
        .get(url)
        .header(header::CONTENT_TYPE, "text/csv;charset=UTF-8")
        .send()
        .await?;

    let status = resp.status();
    if status != StatusCode::OK {
        warn!(%url, %status, "sheet fetch failed");
        return Err(ResolveError::Network(status));
    }

    let body = resp.text().await?;
    debug!(%url, bytes = body.len(), "fetched csv");
    Ok(body)
}
