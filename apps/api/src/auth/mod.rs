//! Accounts: password hashing, bearer tokens, the auth middleware and the
//! `/api/auth/*` handlers.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::require_auth;
pub use token::TokenKeys;
