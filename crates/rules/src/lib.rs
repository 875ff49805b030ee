//! Policy expression engine.
//!
//! This crate provides:
//! - A PEG-style parser for single-comparison policy expressions (`vm.rx > 1000`)
//! - Condition assembly from the parser's matched spans
//! - Threshold evaluation over per-resource sample series
//! - YAML rule groups with a loader, validation and per-group intervals
//! - An engine driver that ticks, fetches samples and reports results

pub mod engine;
pub mod evaluator;
pub mod expr;
pub mod loader;
pub mod report;
pub mod scheduler;
pub mod schema;
pub mod validation;
