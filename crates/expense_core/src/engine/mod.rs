//! Aggregation engine.
//!
//! # Responsibility
//! - Turn one expense snapshot into summary cards, category totals and chart
//!   datasets.
//! - Stay free of I/O so every derivation is deterministic and testable.
//!
//! # Invariants
//! - Category and palette configuration is always passed in explicitly.

pub mod aggregation;
pub mod view;
