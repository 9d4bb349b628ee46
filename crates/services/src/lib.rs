pub mod auth;
pub mod dao;
pub mod reporting;

pub use auth::AuthService;
pub use dao::*;
