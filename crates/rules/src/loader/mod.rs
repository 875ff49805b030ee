//! Filesystem loader for policy documents.
//!
//! Reads a single YAML policy file, deserializes it into a
//! [`PolicyDocument`](crate::schema::PolicyDocument) and applies the
//! structural checks every document must pass before it can be scheduled.

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::PolicyLoader;
pub use self::error::{LoadError, Result};
