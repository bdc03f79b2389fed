//! HTTP adapter: `GET /search?q=<query>` over axum.

use crate::engine::SearchEngine;
use crate::error::Result;
use crate::query::SearchQuery;
use crate::types::SearchResponse;
use axum::{
  extract::{Query, State},
  http::StatusCode,
  routing::get,
  Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// Builds the router with `/search` and `/health`.
pub fn router(engine: Arc<SearchEngine>) -> Router {
  Router::new()
    .route("/search", get(handle_search))
    .route("/health", get(handle_health))
    .with_state(engine)
}

/// Binds `addr` and serves the router until the listener fails.
pub async fn serve(engine: Arc<SearchEngine>, addr: SocketAddr) -> Result<()> {
  let listener = tokio::net::TcpListener::bind(addr).await?;
  info!("Search server listening on {}", listener.local_addr()?);
  axum::serve(listener, router(engine)).await?;
  Ok(())
}

/// Collapses the `q` parameters into the value the engine validates.
///
/// No `q` is a missing query; a repeated `q` arrives as an array and is
/// rejected like any other non-string value.
fn query_value(params: Vec<(String, String)>) -> Option<Value> {
  let mut values: Vec<String> = params
    .into_iter()
    .filter(|(key, _)| key == "q")
    .map(|(_, value)| value)
    .collect();

  match values.len() {
    0 => None,
    1 => values.pop().map(Value::String),
    _ => Some(Value::Array(values.into_iter().map(Value::String).collect())),
  }
}

/// `GET /search`.
///
/// 400 with an empty payload for a missing or repeated `q`, otherwise 200.
/// Contained scoring failures still answer 200, with `error` set.
pub async fn handle_search(
  State(engine): State<Arc<SearchEngine>>,
  Query(params): Query<Vec<(String, String)>>,
) -> (StatusCode, Json<SearchResponse>) {
  let query = match SearchQuery::from_value(query_value(params).as_ref()) {
    Ok(query) => query,
    Err(err) => {
      return (
        StatusCode::BAD_REQUEST,
        Json(SearchResponse::failed("", err.to_string())),
      )
    }
  };

  let normalized = query.as_str().to_string();
  match tokio::task::spawn_blocking(move || engine.execute(query)).await {
    Ok(response) => (StatusCode::OK, Json(response)),
    Err(err) => {
      error!("Search task failed: {:?}", err);
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SearchResponse::failed(normalized, "Search failed")),
      )
    }
  }
}

/// `GET /health`.
pub async fn handle_health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}
