use serde::{Deserialize, Serialize};
use sqlx_oldapi::FromRow;

/// An operator account row. The password is only ever stored as a salted hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub username: String,
    #[serde(skip_serializing)]
    pub salt: Vec<u8>,
    #[serde(skip_serializing)]
    pub salted_password_hash: Vec<u8>,
    pub is_admin: bool,
}
