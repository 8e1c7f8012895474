// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission pipeline: rate limit, validate, persist.
//!
//! The rate limiter runs first, so even a malformed body spends one of the
//! client's attempts. Each stage short-circuits with an [`IntakeError`].

use crate::error::IntakeError;
use crate::limiter::{Admission, RateLimiter};
use crate::metrics::{IntakeMetrics, Outcome};
use crate::models::ContactSubmission;
use crate::store::SubmissionStore;
use crate::validator::ContactValidator;
use tracing::{debug, error, info};

/// Client identifier used when the caller's address is unknown.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// The intake components, constructed once at startup.
pub struct IntakePipeline {
    pub limiter: RateLimiter,
    pub validator: ContactValidator,
    pub store: SubmissionStore,
    pub metrics: IntakeMetrics,
}

impl IntakePipeline {
    pub fn new(
        limiter: RateLimiter,
        validator: ContactValidator,
        store: SubmissionStore,
        metrics: IntakeMetrics,
    ) -> Self {
        Self {
            limiter,
            validator,
            store,
            metrics,
        }
    }

    /// Run one submission from `client_id` through the pipeline.
    pub async fn submit(
        &self,
        client_id: &str,
        body: &[u8],
    ) -> Result<ContactSubmission, IntakeError> {
        let result = self.run(client_id, body).await;

        let outcome = match &result {
            Ok(_) => Outcome::Accepted,
            Err(IntakeError::RateLimited { .. }) => Outcome::RateLimited,
            Err(IntakeError::Validation(_)) => Outcome::Invalid,
            Err(IntakeError::Store(_)) => Outcome::Failed,
        };
        self.metrics.record(outcome);
        self.metrics
            .set_tracked_clients(self.limiter.tracked_clients().await);

        result
    }

    async fn run(&self, client_id: &str, body: &[u8]) -> Result<ContactSubmission, IntakeError> {
        // The limiter lock is released when admit returns, before any I/O
        if let Admission::Denied { retry_after } = self.limiter.admit(client_id).await {
            info!(
                client = %client_id,
                retry_after_secs = retry_after.as_secs(),
                "Submission rate limited"
            );
            return Err(IntakeError::RateLimited { retry_after });
        }

        let submission = self.validator.validate_body(body).inspect_err(|err| {
            info!(client = %client_id, fields = ?err.fields(), "Submission rejected");
        })?;

        let stored = self
            .store
            .insert_contact_submission(submission)
            .await
            .inspect_err(|err| {
                error!(
                    client = %client_id,
                    backend = self.store.backend_name(),
                    error = %err,
                    "Contact form submission error"
                );
            })?;

        debug!(client = %client_id, id = %stored.id, "Submission stored");
        Ok(stored)
    }
}
