// src/server.rs
//
// HTTP face of the translator: answers a sticker link with a redirect.

use crate::config::Config;
use crate::fetch::build_client;
use crate::resolve::resolve;
use anyhow::Result;
use reqwest::Client;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Instant};
use tracing::{error, info, warn};
use warp::{
    http::{header, Response, StatusCode},
    reply::Reply,
    Filter,
};

#[derive(Clone)]
struct AppState {
    client: Client,
    config: Arc<Config>,
}

fn text(status: StatusCode, msg: &'static str) -> warp::reply::Response {
    warp::reply::with_status(msg, status).into_response()
}

async fn health_check() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "shelf-translator"
    })))
}

async fn redirect(raw_query: String, state: AppState) -> Result<warp::reply::Response, Infallible> {
    let start = Instant::now();
    let param = &state.config.query_param;
    let wise_id = url::form_urlencoded::parse(raw_query.as_bytes())
        .find(|(k, _)| k == param.as_str())
        .map(|(_, v)| v.into_owned());

    let Some(wise_id) = wise_id else {
        warn!(%param, "request without query parameter");
        return Ok(text(StatusCode::BAD_REQUEST, "missing query parameter"));
    };

    let reply = match resolve(&state.client, &state.config, &wise_id).await {
        Ok(Some(target)) => match Response::builder()
            .status(StatusCode::FOUND)
            .header(header::LOCATION, target.as_str())
            .body(warp::hyper::Body::empty())
        {
            Ok(resp) => resp,
            Err(e) => {
                error!(%target, "cannot use target as Location: {}", e);
                text(StatusCode::INTERNAL_SERVER_ERROR, "invalid redirect target")
            }
        },
        Ok(None) => text(StatusCode::NOT_FOUND, "no shelf for this id"),
        Err(e) => {
            error!(%wise_id, "{}", e);
            text(StatusCode::BAD_GATEWAY, "sheet unavailable")
        }
    };

    info!(
        %wise_id,
        status = %reply.status(),
        elapsed = ?start.elapsed(),
        "handled redirect"
    );
    Ok(reply)
}

/// `GET /?<query_param>=<id>` and `GET /health`.
pub fn routes(
    client: Client,
    config: Arc<Config>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let state = AppState { client, config };
    let with_state = warp::any().map(move || state.clone());

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let translate = warp::path::end()
        .and(warp::get())
        .and(
            warp::query::raw()
                .or(warp::any().map(String::new))
                .unify(),
        )
        .and(with_state)
        .and_then(redirect);

    health.or(translate)
}

/// Run the redirect service until the process is stopped.
pub async fn serve(config: Config, addr: SocketAddr) -> Result<()> {
    let client = build_client(&config)?;
    info!(%addr, sheet = %config.csv_url, "redirect server starting");
    warp::serve(routes(client, Arc::new(config))).run(addr).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "WISE_ID,Shelf_QR_ID\nWISE-01,rwlenjke7h\nWISE-02,\n";

    fn spawn_sheet(status: u16) -> SocketAddr {
        let status = StatusCode::from_u16(status).unwrap();
        let route = warp::path("pub").map(move || warp::reply::with_status(SHEET, status));
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    fn app(sheet: SocketAddr) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
        let config = Config {
            csv_url: format!("http://{}/pub", sheet),
            ..Config::default()
        };
        routes(Client::new(), Arc::new(config))
    }

    #[tokio::test]
    async fn test_health_check() {
        let resp = warp::test::request()
            .path("/health")
            .reply(&app(spawn_sheet(200)))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_known_id_redirects() {
        let resp = warp::test::request()
            .path("/?wise_id=WISE-01")
            .reply(&app(spawn_sheet(200)))
            .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://eam.sh/rwlenjke7h"
        );
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let resp = warp::test::request()
            .path("/?wise_id=WISE-99")
            .reply(&app(spawn_sheet(200)))
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_param_is_bad_request() {
        let app = app(spawn_sheet(200));
        let resp = warp::test::request().path("/").reply(&app).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = warp::test::request().path("/?other=1").reply(&app).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_sheet_is_bad_gateway() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let resp = warp::test::request()
            .path("/?wise_id=WISE-01")
            .reply(&app(SocketAddr::from(([127, 0, 0, 1], port))))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_sheet_failure_is_bad_gateway() {
        let resp = warp::test::request()
            .path("/?wise_id=WISE-01")
            .reply(&app(spawn_sheet(503)))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
