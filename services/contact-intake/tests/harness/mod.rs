// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for contact form flood simulation.
//!
//! Drives the intake pipeline with generated traffic patterns on a manual
//! clock and tallies the outcomes.

#![allow(dead_code)]

pub mod floods;
pub mod generators;
pub mod metrics;
