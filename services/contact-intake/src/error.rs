// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for the contact intake service

use crate::validator::{FieldIssue, ValidationError};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not available")]
    Unavailable,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),
}

/// Outcome of a failed intake, one variant per short-circuit stage
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Too many submissions, retry in {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to store submission: {0}")]
    Store(#[from] StoreError),
}

impl IntakeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Response body shared by every outcome of `POST /api/contact`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldIssue>>,
}

impl IntakeResponse {
    pub fn success(message: &'static str) -> Self {
        Self {
            success: true,
            message,
            submission_id: None,
            errors: None,
        }
    }

    pub fn failure(message: &'static str) -> Self {
        Self {
            success: false,
            message,
            submission_id: None,
            errors: None,
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::RateLimited { retry_after } => {
                // Whole seconds, rounded up
                let secs = retry_after
                    .as_secs()
                    .saturating_add(u64::from(retry_after.subsec_nanos() > 0));
                (
                    status,
                    [(header::RETRY_AFTER, secs.to_string())],
                    Json(IntakeResponse::failure(
                        "Too many submissions. Please try again in a minute.",
                    )),
                )
                    .into_response()
            }
            Self::Validation(err) => (
                status,
                Json(IntakeResponse {
                    errors: Some(err.issues),
                    ..IntakeResponse::failure("Invalid form data")
                }),
            )
                .into_response(),
            // Store detail is logged by the caller, never sent to the client
            Self::Store(_) => {
                (status, Json(IntakeResponse::failure("Internal server error"))).into_response()
            }
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
