//! Expense record and create payload.
//!
//! # Responsibility
//! - Define the canonical record delivered by store snapshots.
//! - Define the client-assigned fields submitted on create.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store, never by callers.
//! - `amount` is positive when it reaches a store; stores do not re-check it.
//! - Records are never mutated after creation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier assigned by the store on creation.
pub type ExpenseId = Uuid;

/// One recorded outlay as delivered by the live query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub title: String,
    /// Currency-agnostic magnitude.
    pub amount: f64,
    /// Expected to be a configured category label. Unknown labels are kept
    /// but do not contribute to category totals.
    pub category: String,
    /// User-selected calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Unix epoch milliseconds. Orders the live query, newest first.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

/// Fields supplied by the client when adding an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

impl NewExpense {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            category: category.into(),
            date,
        }
    }

    /// Materializes the stored record once the store has assigned identity
    /// and creation time.
    pub fn into_expense(self, id: ExpenseId, created_at: i64) -> Expense {
        Expense {
            id,
            title: self.title,
            amount: self.amount,
            category: self.category,
            date: self.date,
            created_at,
        }
    }
}
