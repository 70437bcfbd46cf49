// In-process user repository, used when no DATABASE_URL is configured and in tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::auth::Role;
use crate::users::{
    error::StoreError,
    models::{User, UserChanges},
    repository::UserRepository,
};

#[derive(Default)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, User>,
}

impl Table {
    fn email_owner(&self, email: &str) -> Option<i32> {
        self.rows
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .map(|user| user.id)
    }
}

/// Repository keeping users in a map behind an async lock
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table>,
    writes: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful create/update/delete calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let mut table = self.table.write().await;
        if table.email_owner(email).is_some() {
            return Err(StoreError::EmailTaken);
        }

        table.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.next_id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table
            .email_owner(email)
            .and_then(|id| table.rows.get(&id).cloned()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, StoreError> {
        let mut table = self.table.write().await;

        if let Some(email) = &changes.email {
            if matches!(table.email_owner(email), Some(owner) if owner != id) {
                return Err(StoreError::EmailTaken);
            }
        }

        let Some(user) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        let updated = user.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<Option<User>, StoreError> {
        let removed = self.table.write().await.rows.remove(&id);
        if removed.is_some() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();
        let first = repo.create("A", "a@example.com", "h", Role::User).await.unwrap();
        let second = repo.create("B", "b@example.com", "h", Role::Admin).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.write_count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create("A", "a@example.com", "h", Role::User).await.unwrap();

        let result = repo.create("A2", "A@Example.com", "h", Role::User).await;
        assert!(matches!(result, Err(StoreError::EmailTaken)));
        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create("A", "a@example.com", "h", Role::User).await.unwrap();

        let changes = UserChanges {
            name: Some("Renamed".to_string()),
            ..UserChanges::default()
        };
        let updated = repo.update(user.id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, "a@example.com");
        assert_eq!(updated.role, Role::User);
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn test_update_to_own_email_is_allowed() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create("A", "a@example.com", "h", Role::User).await.unwrap();

        let changes = UserChanges {
            email: Some("a@example.com".to_string()),
            ..UserChanges::default()
        };
        assert!(repo.update(user.id, &changes).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_rows() {
        let repo = InMemoryUserRepository::new();

        assert!(repo.update(9, &UserChanges::default()).await.unwrap().is_none());
        assert!(repo.delete(9).await.unwrap().is_none());
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create("A", "a@example.com", "h", Role::User).await.unwrap();

        let removed = repo.delete(user.id).await.unwrap().unwrap();
        assert_eq!(removed.id, user.id);
        assert!(repo.find_by_id(user.id).await.unwrap().is_none());
    }
}
