//! Expense domain model.
//!
//! # Responsibility
//! - Define the record owned by the store and the create payload sent to it.
//!
//! # Invariants
//! - Every stored expense is identified by a stable `ExpenseId`.
//! - Deletion is permanent; there are no tombstones.

pub mod expense;
