use thiserror::Error;

/// Domain errors signalled by the user store.
///
/// Handlers match on the variant; nothing downstream inspects the message.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User not found")]
    NotFound,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("User with this email does not exist")]
    UnknownEmail,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Map a failed write, turning unique-constraint violations into `EmailTaken`
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::EmailTaken;
            }
        }
        StoreError::Database(err)
    }
}
