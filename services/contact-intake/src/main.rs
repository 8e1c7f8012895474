// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake Service
//!
//! Serves `POST /api/contact` for the website contact form.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file in the
//! working directory is read first):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `DATABASE_URL`: Postgres connection string; without it submissions
//!   are kept in memory
//! - `STORAGE_BACKEND`: `auto`, `memory` or `postgres` (default: auto)
//! - `RATE_LIMIT_MAX_ATTEMPTS`: Submissions per client per window (default: 3)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 60)
//! - `TRUST_FORWARDED_FOR`: Use `X-Forwarded-For` as the client address
//!   (default: false)
//! - `ALLOWED_ORIGINS`: Comma-separated CORS origins

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_intake::{
    config::Config,
    handlers::{router, AppState},
    intake::IntakePipeline,
    limiter::RateLimiter,
    metrics::IntakeMetrics,
    store::SubmissionStore,
    validator::ContactValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        max_attempts = config.rate_limit.max_attempts,
        window_secs = config.rate_limit.window_secs,
        storage_backend = ?config.storage.backend,
        "Starting contact intake service"
    );

    let store = SubmissionStore::from_config(&config.storage).await?;
    let pipeline = IntakePipeline::new(
        RateLimiter::new(config.rate_limit.clone()),
        ContactValidator::new(config.validation.clone()),
        store,
        IntakeMetrics::new()?,
    );

    let state = Arc::new(AppState {
        pipeline,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.rate_limit.sweep_interval());
        loop {
            interval.tick().await;
            let limiter = &cleanup_state.pipeline.limiter;
            limiter.sweep().await;
            cleanup_state
                .pipeline
                .metrics
                .set_tracked_clients(limiter.tracked_clients().await);
        }
    });

    let app = router(state.clone());

    // Start server
    let addr: SocketAddr = state.config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
