// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact intake service.

use crate::config::Config;
use crate::error::IntakeResponse;
use crate::intake::{IntakePipeline, UNKNOWN_CLIENT};
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

/// Paths served by the fixed routes; the metrics endpoint may not reuse them.
const RESERVED_PATHS: [&str; 3] = ["/health", "/healthz", "/api/contact"];

/// Shared application state.
pub struct AppState {
    pub pipeline: IntakePipeline,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(submit_contact));

    let metrics_path = &state.config.metrics.path;
    if state.config.metrics.enabled {
        if !metrics_path.starts_with('/') {
            warn!(path = %metrics_path, "Metrics path must start with '/', endpoint disabled");
        } else if RESERVED_PATHS.contains(&metrics_path.as_str()) {
            warn!(
                path = %metrics_path,
                "Metrics path collides with a built-in route, endpoint disabled"
            );
        } else {
            app = app.route(metrics_path, get(metrics));
        }
    }

    app.layer(cors_layer(&state.config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if state.pipeline.store.is_available() {
            "healthy"
        } else {
            "degraded"
        },
        service: "contact-intake",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.pipeline.store.backend_name(),
    })
}

/// Accept a contact form submission.
///
/// The body is taken as raw bytes so that unparseable JSON still passes
/// through the rate limiter before being rejected.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let client_id = client_identifier(
        &headers,
        connect_info.map(|ConnectInfo(addr)| addr),
        state.config.trust_forwarded_for,
    );

    match state.pipeline.submit(&client_id, &body).await {
        Ok(stored) => (
            StatusCode::CREATED,
            Json(IntakeResponse {
                submission_id: Some(stored.id.to_string()),
                ..IntakeResponse::success("Contact form submitted successfully")
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.pipeline.metrics.encode() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Work out who is calling.
///
/// With `trust_forwarded_for`, the left-most `X-Forwarded-For` entry wins.
/// Otherwise the peer address is used, and `"unknown"` when neither exists.
pub fn client_identifier(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => {
            debug!("Client address unavailable, using sentinel identifier");
            UNKNOWN_CLIENT.to_string()
        }
    }
}
