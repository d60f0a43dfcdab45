//! Common types shared across Postforge crates.
//!
//! This crate provides the foundational pieces the crew executor and the
//! HTTP boundary both depend on: the error type, task descriptors, and the
//! prompt template engine.

pub mod error;
pub mod task;
pub mod template;

pub use error::{PostforgeError, Result};
pub use task::{TaskOutput, TaskSpec};
pub use template::Template;
