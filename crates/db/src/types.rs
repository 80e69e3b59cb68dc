use std::fmt;

use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};
use svix_ksuid::KsuidLike;

/// KSUID of a row, stored as `CHAR(27)`.
#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbId(String);

impl DbId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DbId {
    fn default() -> Self {
        DbId(svix_ksuid::Ksuid::new(None, None).to_string())
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DbId {
    fn from(id: String) -> Self {
        DbId(id)
    }
}

impl From<&str> for DbId {
    fn from(id: &str) -> Self {
        DbId(id.to_string())
    }
}

impl From<svix_ksuid::Ksuid> for DbId {
    fn from(id: svix_ksuid::Ksuid) -> Self {
        DbId(id.to_string())
    }
}
