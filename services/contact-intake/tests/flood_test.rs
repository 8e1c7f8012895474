// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Flood tests for the contact intake pipeline.
//!
//! These tests replay traffic patterns on a manual clock and check that
//! per-client limits hold under load.

mod harness;

use contact_intake::{
    clock::ManualClock,
    config::{RateLimitConfig, ValidationConfig},
    intake::IntakePipeline,
    limiter::RateLimiter,
    metrics::IntakeMetrics,
    store::{MemoryStore, SubmissionStore},
    validator::ContactValidator,
};
use harness::{
    floods::FloodConfig,
    generators,
    metrics::{FloodMetrics, Outcome},
};
use std::sync::Arc;
use std::time::Duration;

struct Simulation {
    pipeline: IntakePipeline,
    clock: ManualClock,
    store: MemoryStore,
}

fn simulation() -> Simulation {
    let clock = ManualClock::default();
    let store = MemoryStore::new();
    let pipeline = IntakePipeline::new(
        RateLimiter::with_clock(RateLimitConfig::default(), Arc::new(clock.clone())),
        ContactValidator::new(ValidationConfig::default()),
        SubmissionStore::Memory(store.clone()),
        IntakeMetrics::new().unwrap(),
    );
    Simulation {
        pipeline,
        clock,
        store,
    }
}

/// Run a flood against a fresh pipeline.
async fn run_flood(config: &FloodConfig, sim: &Simulation) -> FloodMetrics {
    let ips = generators::generate_ips(config.unique_clients);
    let malformed = generators::generate_malformed_bodies();
    let mut metrics = FloodMetrics::new();

    for i in 0..config.total_requests {
        if i > 0 {
            sim.clock.advance(config.interval);
        }

        let client = ips[i % ips.len()].to_string();
        let body = if ratio_hit(config.malformed_ratio, i) {
            malformed[i % malformed.len()].as_bytes().to_vec()
        } else if ratio_hit(config.missing_field_ratio, i) {
            generators::incomplete_submission(i)
        } else {
            generators::valid_submission(i)
        };

        let result = sim.pipeline.submit(&client, &body).await;
        metrics.record(Outcome::from(&result), &client);
    }

    metrics
}

/// Simple deterministic "random" based on index and ratio.
fn ratio_hit(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}

// ============================================================================
// Flood Simulation Tests
// ============================================================================

#[tokio::test]
async fn test_single_client_flood() {
    let sim = simulation();
    let report = run_flood(&FloodConfig::single_client_flood(), &sim)
        .await
        .report();
    println!("{}", report);

    assert_eq!(report.accepted, 3);
    assert_eq!(report.rate_limited, 197);
    assert_eq!(sim.store.submission_count().await, 3);
}

#[tokio::test]
async fn test_distributed_flood() {
    let sim = simulation();
    let report = run_flood(&FloodConfig::distributed_flood(), &sim)
        .await
        .report();
    println!("{}", report);

    // Each client is limited on its own budget
    assert_eq!(report.unique_clients, 100);
    assert_eq!(report.max_accepted_per_client, 3);
    assert_eq!(report.accepted, 300);
    assert_eq!(report.rate_limited, 200);
}

#[tokio::test]
async fn test_garbage_flood_spends_rate_limit() {
    let sim = simulation();
    let report = run_flood(&FloodConfig::garbage_flood(), &sim)
        .await
        .report();
    println!("{}", report);

    assert_eq!(report.accepted, 0);
    assert_eq!(report.invalid, 3);
    assert_eq!(report.rate_limited, 47);
    assert_eq!(sim.store.submission_count().await, 0);
}

#[tokio::test]
async fn test_incomplete_forms_rejected() {
    let sim = simulation();
    let report = run_flood(&FloodConfig::incomplete_forms(), &sim)
        .await
        .report();
    println!("{}", report);

    assert_eq!(report.invalid, 30);
    assert_eq!(report.rate_limited, 0);
    assert_eq!(report.accepted, 0);
}

#[tokio::test]
async fn test_slow_drip() {
    let sim = simulation();
    let report = run_flood(&FloodConfig::slow_drip(), &sim).await.report();
    println!("{}", report);

    // Every 21s: three admitted, then two denied until 60s have passed
    // since the last admitted attempt. Denials do not push the reset back.
    assert_eq!(report.accepted, 12);
    assert_eq!(report.rate_limited, 8);
}

// ============================================================================
// Memory Bound Tests
// ============================================================================

#[tokio::test]
async fn test_idle_clients_evicted() {
    let sim = simulation();
    let config = FloodConfig {
        total_requests: 1000,
        interval: Duration::from_millis(1),
        unique_clients: 1000,
        ..Default::default()
    };
    run_flood(&config, &sim).await;
    assert_eq!(sim.pipeline.limiter.tracked_clients().await, 1000);

    sim.clock.advance(Duration::from_secs(121));
    sim.pipeline
        .submit("192.0.2.1", &generators::valid_submission(0))
        .await
        .unwrap();

    assert_eq!(sim.pipeline.limiter.tracked_clients().await, 1);
}

#[tokio::test]
async fn test_malformed_bodies_all_rejected() {
    for (i, body) in generators::generate_malformed_bodies().into_iter().enumerate() {
        let sim = simulation();
        let client = format!("10.1.0.{i}");
        let result = sim.pipeline.submit(&client, body.as_bytes()).await;
        assert_eq!(
            Outcome::from(&result),
            Outcome::Invalid,
            "Body {:?} should be rejected",
            body
        );
    }
}
