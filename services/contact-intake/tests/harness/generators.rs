// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for flood simulation.

use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A complete, valid submission body.
pub fn valid_submission(i: usize) -> Vec<u8> {
    let company = (i % 2 == 0).then(|| format!("Company {i}"));
    json!({
        "name": format!("Visitor {i}"),
        "email": format!("visitor{i}@example.com"),
        "company": company,
        "message": format!("Hello from visitor {i}"),
    })
    .to_string()
    .into_bytes()
}

/// A submission body with one required field missing, rotating which.
pub fn incomplete_submission(i: usize) -> Vec<u8> {
    let mut body = json!({
        "name": format!("Visitor {i}"),
        "email": format!("visitor{i}@example.com"),
        "message": format!("Hello from visitor {i}"),
    });
    let missing = ["name", "email", "message"][i % 3];
    if let Some(object) = body.as_object_mut() {
        object.remove(missing);
    }
    body.to_string().into_bytes()
}

/// Bodies that are not a JSON object.
pub fn generate_malformed_bodies() -> Vec<&'static str> {
    vec![
        "",
        "name=Ann&email=a@b.com&message=Hi",
        "{\"name\": \"Ann\"",
        "null",
        "[\"Ann\", \"a@b.com\", \"Hi\"]",
        "\"just a string\"",
        "<contact><name>Ann</name></contact>",
    ]
}
