//! Shared helpers.

pub mod bytes;
pub mod mime;
