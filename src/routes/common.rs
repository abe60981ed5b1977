//! Service-level routes that sit beside the resources.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    base_path: String,
    resources: Vec<String>,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn info(State(info): State<ServiceInfo>) -> Json<ServiceInfo> {
    Json(info)
}

/// GET /health, GET /version, and GET /info listing the resource segments served under `base_path`.
pub fn common_routes(base_path: &str, resources: impl IntoIterator<Item = impl Into<String>>) -> Router {
    let info_state = ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        base_path: base_path.to_string(),
        resources: resources.into_iter().map(Into::into).collect(),
    };
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/info", get(info))
        .with_state(info_state)
}
