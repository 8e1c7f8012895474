// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for flood simulation results.

use contact_intake::error::IntakeError;
use std::collections::HashMap;

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Accepted,
    RateLimited,
    Invalid,
    Failed,
}

impl<T> From<&Result<T, IntakeError>> for Outcome {
    fn from(result: &Result<T, IntakeError>) -> Self {
        match result {
            Ok(_) => Outcome::Accepted,
            Err(IntakeError::RateLimited { .. }) => Outcome::RateLimited,
            Err(IntakeError::Validation(_)) => Outcome::Invalid,
            Err(IntakeError::Store(_)) => Outcome::Failed,
        }
    }
}

/// Collects outcomes during a flood simulation.
#[derive(Debug, Default)]
pub struct FloodMetrics {
    /// Count of submissions by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of submissions by client
    requests_per_client: HashMap<String, usize>,
    /// Count of accepted submissions by client
    accepted_per_client: HashMap<String, usize>,
}

impl FloodMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission outcome.
    pub fn record(&mut self, outcome: Outcome, client: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self
            .requests_per_client
            .entry(client.to_string())
            .or_insert(0) += 1;
        if outcome == Outcome::Accepted {
            *self
                .accepted_per_client
                .entry(client.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Get total request count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get block rate (ratio of non-accepted to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Outcome::Accepted)) as f64 / total as f64
    }

    /// Number of distinct clients that submitted.
    pub fn unique_clients(&self) -> usize {
        self.requests_per_client.len()
    }

    /// Highest number of accepted submissions for any one client.
    pub fn max_accepted_per_client(&self) -> usize {
        self.accepted_per_client.values().copied().max().unwrap_or(0)
    }

    /// Generate a summary report.
    pub fn report(&self) -> FloodReport {
        FloodReport {
            total_requests: self.total_requests(),
            accepted: self.count(Outcome::Accepted),
            rate_limited: self.count(Outcome::RateLimited),
            invalid: self.count(Outcome::Invalid),
            failed: self.count(Outcome::Failed),
            block_rate: self.block_rate(),
            unique_clients: self.unique_clients(),
            max_accepted_per_client: self.max_accepted_per_client(),
        }
    }
}

/// Summary report of flood metrics.
#[derive(Debug, Clone)]
pub struct FloodReport {
    pub total_requests: usize,
    pub accepted: usize,
    pub rate_limited: usize,
    pub invalid: usize,
    pub failed: usize,
    pub block_rate: f64,
    pub unique_clients: usize,
    pub max_accepted_per_client: usize,
}

impl std::fmt::Display for FloodReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flood Report ===")?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f, "Accepted:          {}", self.accepted)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Invalid:           {}", self.invalid)?;
        writeln!(f, "Failed:            {}", self.failed)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f, "Unique Clients:    {}", self.unique_clients)?;
        writeln!(f, "Max Accepted/Client: {}", self.max_accepted_per_client)?;
        Ok(())
    }
}
