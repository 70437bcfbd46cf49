// Persistence for user records

use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::Role;
use crate::users::{
    error::StoreError,
    models::{User, UserChanges},
};

/// Storage backend for users.
///
/// Implementations only persist; uniqueness of `email` must still be
/// enforced here (case-insensitive) and reported as [`StoreError::EmailTaken`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    async fn find_all(&self) -> Result<Vec<User>, StoreError>;

    /// Returns `None` when no row has `id`
    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, StoreError>;

    /// Returns the removed row, or `None` when no row has `id`
    async fn delete(&self, id: i32) -> Result<Option<User>, StoreError>;
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_write)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let query = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);

        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, StoreError> {
        // Omitted fields keep their stored values
        let query = format!(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                role = COALESCE($3, role),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(changes.name.as_deref())
            .bind(changes.email.as_deref())
            .bind(changes.role)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_write)
    }

    async fn delete(&self, id: i32) -> Result<Option<User>, StoreError> {
        let query = format!("DELETE FROM users WHERE id = $1 RETURNING {}", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
