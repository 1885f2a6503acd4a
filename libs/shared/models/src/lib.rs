pub mod auth;
pub mod clinic;
pub mod error;
