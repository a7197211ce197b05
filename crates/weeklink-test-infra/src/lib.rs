//! Containers backing the integration tests of the other weeklink crates.

pub mod error;
pub mod redis;

pub use error::{Result, TestInfraError};
