// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later
//! Data models for contact submissions and users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Validated contact form input, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    /// `None` when the form left it empty
    pub company: Option<String>,
    pub message: String,
}

/// Stored contact submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    /// Unique submission identifier
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    /// Set once by the store at creation
    pub submitted_at: DateTime<Utc>,
}

impl ContactSubmission {
    /// Stamp a new submission with a fresh id and the current time
    pub fn new(submission: NewContactSubmission) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: submission.name,
            email: submission.email,
            company: submission.company.filter(|c| !c.is_empty()),
            message: submission.message,
            submitted_at: Utc::now(),
        }
    }
}

/// Input for creating a user
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// Stored user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Credential, never serialized
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    pub fn new(user: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: user.username,
            password: user.password,
        }
    }
}
