// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later
//! Postgres storage backend

use crate::{
    error::{Result, StoreError},
    models::{ContactSubmission, NewContactSubmission, NewUser, User},
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

const SUBMISSION_COLUMNS: &str = "id, name, email, company, message, submitted_at";

/// Durable store; without a pool every call fails with `StoreError::Unavailable`
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Option<PgPool>,
}

impl PostgresStore {
    /// Connect to Postgres and make sure the tables exist
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool: Some(pool) })
    }

    /// Durable backend selected without a connection string
    pub fn unconfigured() -> Self {
        Self { pool: None }
    }

    pub fn is_configured(&self) -> bool {
        self.pool.is_some()
    }

    fn pool(&self) -> Result<&PgPool> {
        self.pool.as_ref().ok_or(StoreError::Unavailable)
    }

    async fn init_schema(pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contact_submissions (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                company TEXT,
                message TEXT NOT NULL,
                submitted_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn insert_contact_submission(
        &self,
        submission: NewContactSubmission,
    ) -> Result<ContactSubmission> {
        let pool = self.pool()?;
        let record = ContactSubmission::new(submission);

        let created = sqlx::query_as::<_, ContactSubmission>(&format!(
            "INSERT INTO contact_submissions ({SUBMISSION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.company)
        .bind(&record.message)
        .bind(record.submitted_at)
        .fetch_one(pool)
        .await?;

        Ok(created)
    }

    pub async fn get_contact_submission(&self, id: Uuid) -> Result<Option<ContactSubmission>> {
        let pool = self.pool()?;
        let submission = sqlx::query_as::<_, ContactSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM contact_submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(submission)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let pool = self.pool()?;
        let user =
            sqlx::query_as::<_, User>("SELECT id, username, password FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(user)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let pool = self.pool()?;
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        let pool = self.pool()?;
        let record = User::new(user);

        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password) VALUES ($1, $2, $3) \
             RETURNING id, username, password",
        )
        .bind(record.id)
        .bind(&record.username)
        .bind(&record.password)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return StoreError::DuplicateUsername(record.username.clone());
                }
            }
            StoreError::Database(e)
        })
    }
}
