// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later
//! In-memory storage backend

use crate::{
    error::{Result, StoreError},
    models::{ContactSubmission, NewContactSubmission, NewUser, User},
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-lifetime store; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    submissions: Arc<RwLock<HashMap<Uuid, ContactSubmission>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_contact_submission(
        &self,
        submission: NewContactSubmission,
    ) -> ContactSubmission {
        let stored = ContactSubmission::new(submission);
        self.submissions
            .write()
            .await
            .insert(stored.id, stored.clone());
        stored
    }

    pub async fn get_contact_submission(&self, id: Uuid) -> Option<ContactSubmission> {
        self.submissions.read().await.get(&id).cloned()
    }

    /// Number of stored submissions
    pub async fn submission_count(&self) -> usize {
        self.submissions.read().await.len()
    }

    pub async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }
        let created = User::new(user);
        users.insert(created.id, created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let submission = NewContactSubmission {
            name: "Ann".to_string(),
            email: "a@b.com".to_string(),
            company: None,
            message: "Hi".to_string(),
        };

        let first = store.insert_contact_submission(submission.clone()).await;
        let second = store.insert_contact_submission(submission).await;

        assert_ne!(first.id, second.id);
        assert_eq!(store.submission_count().await, 2);
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let store = MemoryStore::new();
        let clone = store.clone();

        let user = store
            .create_user(NewUser {
                username: "admin".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(clone.get_user(user.id).await, Some(user));
    }
}
