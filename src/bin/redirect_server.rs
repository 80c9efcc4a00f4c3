use anyhow::Result;
use shelf_translator::{server, Config};
use std::{env, net::SocketAddr};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    let config = Config::load()?;

    // Cloud Run style: PORT from the environment, 8080 otherwise
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Redirect: GET http://localhost:{}/?{}=<id>", port, config.query_param);
    info!("Health check: http://localhost:{}/health", port);

    server::serve(config, addr).await
}
