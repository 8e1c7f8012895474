// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Traffic patterns for flood simulation.

use std::time::Duration;

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Simulated time between consecutive submissions
    pub interval: Duration,
    /// Number of distinct client addresses, used round-robin
    pub unique_clients: usize,
    /// Share of bodies that are not JSON at all (0.0-1.0)
    pub malformed_ratio: f64,
    /// Share of bodies missing a required field (0.0-1.0)
    pub missing_field_ratio: f64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            interval: Duration::from_millis(100),
            unique_clients: 1,
            malformed_ratio: 0.0,
            missing_field_ratio: 0.0,
        }
    }
}

/// Predefined flood patterns.
impl FloodConfig {
    /// One client submitting as fast as it can.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            interval: Duration::from_millis(10),
            ..Default::default()
        }
    }

    /// Many clients, a handful of submissions each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            interval: Duration::from_millis(20),
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// One client posting garbage; every body is unparseable.
    pub fn garbage_flood() -> Self {
        Self {
            total_requests: 50,
            interval: Duration::from_millis(10),
            malformed_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Several clients whose forms are always missing a field.
    pub fn incomplete_forms() -> Self {
        Self {
            total_requests: 30,
            interval: Duration::from_millis(10),
            unique_clients: 10,
            missing_field_ratio: 1.0,
            ..Default::default()
        }
    }

    /// One client submitting just slower than the window allows.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 20,
            interval: Duration::from_secs(21),
            ..Default::default()
        }
    }
}
