// Lists stickers still to print, one JSON object per line, and renders a
// QR code PNG for each into `qr_dir` (default `qr_codes`).
//
//   sticker_links                 # fetch the configured sheet
//   sticker_links export.csv      # read a local CSV export

use anyhow::{Context, Result};
use shelf_translator::{
    fetch::{build_client, fetch_csv},
    stickers::{pending_stickers, write_qr_codes},
    Config, Table,
};
use std::{env, fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    let raw = match env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!(path = %path.display(), "reading local export");
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            let client = build_client(&config)?;
            fetch_csv(&client, &config.csv_url)
                .await
                .with_context(|| format!("fetching {}", config.csv_url))?
        }
    };

    let table = Table::parse(&raw);
    info!(rows = table.len(), "parsed sheet");

    let pending = pending_stickers(&table, &config)?;
    if pending.is_empty() {
        return Ok(());
    }
    for sticker in &pending {
        println!("{}", serde_json::to_string(sticker)?);
    }
    write_qr_codes(&pending, &config.qr_dir)?;
    Ok(())
}
