//! Common types and errors shared by the callers of the `siv` crate.

pub mod error;
pub mod protocol;

pub use error::ToolError;
