// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form validator.
//!
//! Checks the request body against the contact form schema:
//! - `name`, `email`, `message`: required, non-empty strings
//! - `company`: optional string, empty or null becomes `None`
//! - configurable length limits
//!
//! Every problem is reported, not just the first, so the form can
//! highlight all offending fields at once.

use crate::config::ValidationConfig;
use crate::models::NewContactSubmission;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Kind of problem found with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Field missing or null
    Required,
    /// Field has the wrong JSON type
    InvalidType,
    /// Field is an empty string
    TooSmall,
    /// Field exceeds the configured length
    TooBig,
}

/// A problem with a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub code: IssueCode,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &str, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation failure carrying every field problem found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid form data ({} problem(s))", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Error for a body that could not be read as a JSON object.
    pub fn malformed_body(detail: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::new("body", IssueCode::InvalidType, detail)],
        }
    }

    /// Names of the offending fields, in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

/// Contact form validator.
#[derive(Debug, Clone)]
pub struct ContactValidator {
    config: ValidationConfig,
}

impl ContactValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Parse and validate a raw request body.
    pub fn validate_body(&self, body: &[u8]) -> Result<NewContactSubmission, ValidationError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            debug!(error = %e, "Request body is not valid JSON");
            ValidationError::malformed_body("Request body must be valid JSON")
        })?;
        self.validate(&value)
    }

    /// Validate a decoded JSON submission.
    pub fn validate(&self, input: &Value) -> Result<NewContactSubmission, ValidationError> {
        let Some(object) = input.as_object() else {
            debug!("Submission is not a JSON object");
            return Err(ValidationError::malformed_body(
                "Request body must be a JSON object",
            ));
        };

        let mut issues = Vec::new();
        let max_field = self.config.max_field_chars;

        let name = required_string(object, "name", max_field, &mut issues);
        let email = required_string(object, "email", max_field, &mut issues);
        let company = optional_string(object, "company", max_field, &mut issues);
        let message = required_string(
            object,
            "message",
            self.config.max_message_chars,
            &mut issues,
        );

        match (name, email, company, message) {
            (Some(name), Some(email), Ok(company), Some(message)) if issues.is_empty() => {
                Ok(NewContactSubmission {
                    name,
                    email,
                    company,
                    message,
                })
            }
            _ => {
                let err = ValidationError { issues };
                debug!(fields = ?err.fields(), "Submission invalid");
                Err(err)
            }
        }
    }
}

fn required_string(
    object: &Map<String, Value>,
    field: &str,
    max_chars: usize,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => {
            issues.push(FieldIssue::new(field, IssueCode::Required, "Required"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            issues.push(FieldIssue::new(field, IssueCode::TooSmall, "Must not be empty"));
            None
        }
        Some(Value::String(s)) => check_length(field, s, max_chars, issues),
        Some(other) => {
            issues.push(type_issue(field, other));
            None
        }
    }
}

/// `Ok(None)` for absent, null or empty values; `Err` when a problem was recorded.
fn optional_string(
    object: &Map<String, Value>,
    field: &str,
    max_chars: usize,
    issues: &mut Vec<FieldIssue>,
) -> Result<Option<String>, ()> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => check_length(field, s, max_chars, issues)
            .map(Some)
            .ok_or(()),
        Some(other) => {
            issues.push(type_issue(field, other));
            Err(())
        }
    }
}

fn check_length(
    field: &str,
    value: &str,
    max_chars: usize,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    if value.chars().count() > max_chars {
        issues.push(FieldIssue::new(
            field,
            IssueCode::TooBig,
            format!("Must be at most {max_chars} characters"),
        ));
        None
    } else {
        Some(value.to_string())
    }
}

fn type_issue(field: &str, value: &Value) -> FieldIssue {
    let actual = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    FieldIssue::new(
        field,
        IssueCode::InvalidType,
        format!("Expected string, received {actual}"),
    )
}
