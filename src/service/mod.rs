//! Business logic layer

pub mod auth;
pub mod user;

pub use auth::AuthenticationService;
pub use user::UserService;
