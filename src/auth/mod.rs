// Authentication module
// JWT-in-cookie sessions: signup, signin, signout and the middleware guarding protected routes

pub mod cookie;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod token;

// Re-export commonly used types
pub use cookie::{CookieConfig, TOKEN_COOKIE};
pub use error::AuthError;
pub use handlers::{signin, signout, signup};
pub use middleware::{authenticate_token, require_admin, AuthContext};
pub use models::{AuthResponse, MessageResponse, Role, SigninRequest, SignupRequest};
pub use password::PasswordService;
pub use token::{Claims, TokenService};
