// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake
//!
//! Backend for a website contact form. Each submission passes through:
//!
//! - Per-IP rate limiting (3 submissions per 60 seconds default)
//! - Field validation (name, email, message required; company optional)
//! - Storage in Postgres, or in memory when no database is configured
//!
//! and is answered with a `{success, message, ...}` JSON body.

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod intake;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod store;
pub mod validator;

pub use config::Config;
pub use intake::IntakePipeline;
pub use limiter::{Admission, RateLimiter};
pub use store::SubmissionStore;
pub use validator::{ContactValidator, ValidationError};
