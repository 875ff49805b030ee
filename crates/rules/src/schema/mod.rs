//! YAML schema types for policy documents.
//!
//! A document is a list of named rule groups:
//! - `PolicyDocument`: top-level `groups` list
//! - `PolicyGroup`: name, annotations, optional evaluation interval, rules
//! - `PolicyRule`: record name plus a single condition expression

mod document;

pub use document::*;
