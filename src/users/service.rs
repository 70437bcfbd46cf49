// User store service - business logic over a UserRepository

use std::sync::Arc;

use tracing::debug;

use crate::auth::PasswordService;
use crate::users::{
    error::StoreError,
    models::{NewUser, User, UserChanges},
    repository::UserRepository,
};

/// Create / authenticate / read / update / delete for user records
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new UserService
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Register a new user
    ///
    /// 1. Rejects an email that is already registered
    /// 2. Hashes the password
    /// 3. Inserts the record (a concurrent insert still surfaces as `EmailTaken`)
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        if self
            .repository
            .find_by_email(&new_user.email)
            .await?
            .is_some()
        {
            return Err(StoreError::EmailTaken);
        }

        let password_hash = PasswordService::hash_password(&new_user.password)
            .map_err(|_| StoreError::PasswordHash)?;

        let user = self
            .repository
            .create(&new_user.name, &new_user.email, &password_hash, new_user.role)
            .await?;

        debug!("Created user id={} role={}", user.id, user.role);
        Ok(user)
    }

    /// Check an email/password pair
    pub async fn authenticate_user(&self, email: &str, password: &str) -> Result<User, StoreError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(StoreError::UnknownEmail)?;

        let valid = PasswordService::verify_password(password, &user.password_hash)
            .map_err(|_| StoreError::PasswordHash)?;
        if !valid {
            return Err(StoreError::InvalidPassword);
        }

        Ok(user)
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, StoreError> {
        self.repository.find_all().await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<User, StoreError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Apply a partial update
    ///
    /// 1. The user must exist
    /// 2. A new email must not belong to another user
    /// 3. Omitted fields keep their values; `updated_at` is bumped
    pub async fn update_user(&self, id: i32, changes: UserChanges) -> Result<User, StoreError> {
        let existing = self.get_user_by_id(id).await?;

        if let Some(email) = &changes.email {
            if !email.eq_ignore_ascii_case(&existing.email) {
                if let Some(owner) = self.repository.find_by_email(email).await? {
                    if owner.id != id {
                        return Err(StoreError::EmailTaken);
                    }
                }
            }
        }

        self.repository
            .update(id, &changes)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Remove a user, returning the deleted record
    pub async fn delete_user(&self, id: i32) -> Result<User, StoreError> {
        self.repository
            .delete(id)
            .await?
            .ok_or(StoreError::NotFound)
    }
}
