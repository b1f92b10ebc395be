//! HTTP request handlers.

pub mod common;
pub mod health;
pub mod repositories;

pub use health::*;
pub use repositories::*;
