pub mod door;
pub mod grip;
pub mod robot;
pub mod order_log;
pub mod account;
pub mod status;

pub use door::*;
pub use grip::*;
pub use robot::*;
pub use order_log::*;
pub use account::*;
pub use status::*;

use chrono::{Local, NaiveDateTime};

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
