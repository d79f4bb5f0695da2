//! Unified error type for the writer.
//!
//! Every fallible operation in the crate reports through [`Error`], whether
//! it is a rejected builder argument, a misuse of the streaming state machine
//! or a failure of the output sink.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
