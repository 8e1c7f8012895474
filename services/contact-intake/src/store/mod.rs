// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later
//! Submission storage.
//!
//! Two interchangeable backends sit behind [`SubmissionStore`]:
//!
//! - [`MemoryStore`]: process-lifetime maps, lost on restart
//! - [`PostgresStore`]: durable storage through an `sqlx` pool
//!
//! The backend is picked once at startup from [`StorageConfig`] and never
//! changes afterwards.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::{
    config::{StorageBackend, StorageConfig},
    error::Result,
    models::{ContactSubmission, NewContactSubmission, NewUser, User},
};
use tracing::{info, warn};
use uuid::Uuid;

/// Storage backend for submissions and users
#[derive(Debug, Clone)]
pub enum SubmissionStore {
    Memory(MemoryStore),
    Postgres(PostgresStore),
}

impl SubmissionStore {
    /// Build the backend named by the configuration.
    ///
    /// Connecting to Postgres runs the schema setup, so an unreachable
    /// database fails startup instead of the first submission.
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        let url = config.database_url.as_deref();
        match (config.backend, url) {
            (StorageBackend::Memory, _) | (StorageBackend::Auto, None) => {
                info!("Using in-memory submission store");
                Ok(Self::Memory(MemoryStore::new()))
            }
            (StorageBackend::Postgres, None) => {
                warn!("Postgres backend selected without DATABASE_URL, submissions will fail");
                Ok(Self::Postgres(PostgresStore::unconfigured()))
            }
            (StorageBackend::Auto | StorageBackend::Postgres, Some(url)) => {
                let store = PostgresStore::connect(url, config.max_connections).await?;
                info!("Connected to Postgres submission store");
                Ok(Self::Postgres(store))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// False for a Postgres backend started without a connection string
    pub fn is_available(&self) -> bool {
        match self {
            Self::Memory(_) => true,
            Self::Postgres(store) => store.is_configured(),
        }
    }

    /// Store a validated submission, assigning its id and timestamp
    pub async fn insert_contact_submission(
        &self,
        submission: NewContactSubmission,
    ) -> Result<ContactSubmission> {
        match self {
            Self::Memory(store) => Ok(store.insert_contact_submission(submission).await),
            Self::Postgres(store) => store.insert_contact_submission(submission).await,
        }
    }

    /// Get a submission by id
    pub async fn get_contact_submission(&self, id: Uuid) -> Result<Option<ContactSubmission>> {
        match self {
            Self::Memory(store) => Ok(store.get_contact_submission(id).await),
            Self::Postgres(store) => store.get_contact_submission(id).await,
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        match self {
            Self::Memory(store) => Ok(store.get_user(id).await),
            Self::Postgres(store) => store.get_user(id).await,
        }
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        match self {
            Self::Memory(store) => Ok(store.get_user_by_username(username).await),
            Self::Postgres(store) => store.get_user_by_username(username).await,
        }
    }

    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        match self {
            Self::Memory(store) => store.create_user(user).await,
            Self::Postgres(store) => store.create_user(user).await,
        }
    }
}
