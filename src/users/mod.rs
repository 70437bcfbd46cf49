// User records: persistence, store service, authorization rules and handlers

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod policy;
pub mod repository;
pub mod service;

pub use error::StoreError;
pub use handlers::{delete_user_by_id, fetch_all_users, fetch_user_by_id, update_user_by_id};
pub use memory::InMemoryUserRepository;
pub use models::{NewUser, UpdateUserRequest, User, UserChanges, UserResponse};
pub use repository::{PgUserRepository, UserRepository};
pub use service::UserService;
