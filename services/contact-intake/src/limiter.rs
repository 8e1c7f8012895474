// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-client resetting-window rate limiter for contact submissions.
//!
//! Each client identifier (normally the source IP) gets a counter and the
//! time of its last admitted attempt. A client may make `max_attempts`
//! submissions; once the window has elapsed since the last admitted attempt
//! the counter starts over. Denied attempts leave the entry untouched, so
//! hammering the endpoint does not extend the lockout.
//!
//! State lives in process memory only and is lost on restart. Entries idle
//! for more than twice the window are swept on every call.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Request is allowed
    Allowed {
        /// Attempts left in the current window
        remaining: u32,
    },
    /// Request is rate limited
    Denied {
        /// Time until the client's window resets
        retry_after: Duration,
    },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed { .. })
    }
}

/// Attempt counter for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub attempts: u32,
    pub last_attempt: Instant,
}

/// Thread-safe rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    entries: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record an attempt by `client_id` and decide whether to admit it.
    pub async fn admit(&self, client_id: &str) -> Admission {
        let now = self.clock.now();
        let window = self.config.window_duration();
        // A zero budget behaves as one
        let max_attempts = self.config.max_attempts.max(1);

        let mut entries = self.entries.write().await;

        let admission = match entries.get_mut(client_id) {
            None => {
                entries.insert(
                    client_id.to_string(),
                    RateLimitEntry {
                        attempts: 1,
                        last_attempt: now,
                    },
                );
                Admission::Allowed {
                    remaining: max_attempts.saturating_sub(1),
                }
            }
            Some(entry) => {
                let elapsed = now.saturating_duration_since(entry.last_attempt);
                if elapsed >= window {
                    entry.attempts = 1;
                    entry.last_attempt = now;
                    Admission::Allowed {
                        remaining: max_attempts.saturating_sub(1),
                    }
                } else if entry.attempts < max_attempts {
                    entry.attempts += 1;
                    entry.last_attempt = now;
                    Admission::Allowed {
                        remaining: max_attempts - entry.attempts,
                    }
                } else {
                    let retry_after = window - elapsed;
                    debug!(
                        client = %client_id,
                        ?retry_after,
                        attempts = entry.attempts,
                        "Client rate limit exceeded"
                    );
                    Admission::Denied { retry_after }
                }
            }
        };

        let expiry = self.config.idle_expiry();
        entries.retain(|_, entry| now.saturating_duration_since(entry.last_attempt) <= expiry);

        admission
    }

    /// Drop entries idle for more than twice the window.
    ///
    /// `admit` already does this on every call; the service also runs it
    /// periodically so quiet periods do not leave stale clients behind.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now();
        let expiry = self.config.idle_expiry();

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.last_attempt) <= expiry);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "Swept idle rate limit entries");
        }
        removed
    }

    /// Current entry for a client, if tracked.
    pub async fn entry(&self, client_id: &str) -> Option<RateLimitEntry> {
        self.entries.read().await.get(client_id).copied()
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.entries.read().await.len()
    }
}
