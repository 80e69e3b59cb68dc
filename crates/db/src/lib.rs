#![forbid(unsafe_code)]

pub mod migrations;
pub mod models;
pub mod pagination;
pub mod schema;
pub mod store;
pub mod types;
pub mod utils;

pub use store::{memory::MemoryStore, pg::PgStore, Store};
