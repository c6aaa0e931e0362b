pub mod transport;
pub mod dispatcher;

pub use transport::*;
pub use dispatcher::*;
