//! CLI command implementations.

pub mod build;

pub use build::{BuildCommand, BuildReport};
