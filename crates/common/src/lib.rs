//! Shared error plumbing and relative-path helpers used across skillbox crates.

pub mod error;
pub mod relpath;

pub use error::FromMessage;
