pub mod account_repository;
pub mod order_log_repository;
pub mod repository_trait;

pub use account_repository::*;
pub use order_log_repository::*;
pub use repository_trait::*;
