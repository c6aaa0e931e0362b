pub mod password_hasher;
pub mod account_service;

pub use password_hasher::*;
pub use account_service::*;
