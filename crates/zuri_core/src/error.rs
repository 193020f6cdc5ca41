//! Error types for Zuri.
//!
//! Deliberately small: an extraction miss or a locate miss is a normal
//! outcome (an `Option`), not an error, and the file operation
//! primitives classify their own failures into `ActionResult` messages
//! rather than raising. What remains here is what can genuinely fail
//! before any operation runs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZuriError {
    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Invalid pattern: {0}")]
    Pattern(String),
}
