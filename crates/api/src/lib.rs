#![forbid(unsafe_code)]

pub mod auth_middleware;
pub mod common;
pub mod entities;
pub mod error;
pub mod forms;
pub mod routers;
