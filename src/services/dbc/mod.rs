pub mod database_client;

pub use database_client::*;
