//! Error types for the Quillforge content engine.
//!
//! This crate provides the foundation error types used throughout the
//! Quillforge workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use quillforge_error::{QuillforgeResult, ValidationError};
//!
//! fn check_title(title: &str) -> QuillforgeResult<()> {
//!     if title.trim().is_empty() {
//!         Err(ValidationError::new("title cannot be empty"))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_title("  ").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod validation;
mod generation;
mod limit;
mod not_found;
mod consistency;
mod config;
mod json;
#[cfg(feature = "database")]
mod database;
mod error;

pub use validation::ValidationError;
pub use generation::{GenerationError, GenerationErrorKind, RetryableError};
pub use limit::{LimitExceededError, LimitExceededErrorKind};
pub use not_found::NotFoundError;
pub use consistency::{ConsistencyError, ConsistencyErrorKind};
pub use config::ConfigError;
pub use json::JsonError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{QuillforgeError, QuillforgeErrorKind, QuillforgeResult};
