use anyhow::Result;
use shelf_translator::{
    fetch::build_client,
    resolve::{run, StdoutNavigator},
    Config,
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging (stderr; stdout carries the result) ─────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shelf_translator=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) config ───────────────────────────────────────────────────
    let config = Config::load()?;

    // ─── 3) scanned link from argv ───────────────────────────────────
    let Some(link) = env::args().nth(1) else {
        error!(
            "usage: shelf-translator '<translator link>?{}=<id>'",
            config.query_param
        );
        return Ok(());
    };

    let client = match build_client(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    };

    // ─── 4) fetch → parse → lookup → navigate ────────────────────────
    if !run(&client, &config, &link, &StdoutNavigator).await {
        info!(%link, "no redirect");
    }
    Ok(())
}
