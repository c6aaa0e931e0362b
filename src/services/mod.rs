pub mod db;
pub mod dbc;
pub mod auth;
pub mod robot;

pub use db::*;
pub use dbc::*;
pub use auth::*;
pub use robot::*;
