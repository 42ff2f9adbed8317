//! Expense filtering and aggregation.
//!
//! # Responsibility
//! - Derive the filtered list, its summary and the per-category totals from
//!   one snapshot of the live query.
//!
//! # Invariants
//! - Functions are pure and never re-sort: output order follows input order
//!   (lists) or configured category order (totals).
//! - Category totals always cover the full snapshot. Only the list and its
//!   summary follow the active filter.
//! - Categories whose total is not positive never appear in the totals.

use crate::config::CategoryConfig;
use crate::model::expense::Expense;
use serde::{Deserialize, Serialize};

/// Active list filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum CategoryFilter {
    /// Every expense, including ones with unknown categories.
    #[default]
    All,
    /// Only expenses whose category equals the label exactly.
    Category(String),
}

impl CategoryFilter {
    /// Maps a filter option label to a filter; the sentinel selects `All`.
    pub fn from_label(label: &str, config: &CategoryConfig) -> Self {
        if label == config.all_label() {
            Self::All
        } else {
            Self::Category(label.to_string())
        }
    }

    /// Label shown on the filter control.
    pub fn label<'a>(&'a self, config: &'a CategoryConfig) -> &'a str {
        match self {
            Self::All => config.all_label(),
            Self::Category(name) => name,
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => expense.category == *name,
        }
    }
}

/// Summary cards over the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewSummary {
    pub total_amount: f64,
    pub count: usize,
    /// `total_amount / count`, or `0.0` for an empty list.
    pub average: f64,
}

/// Sum of amounts for one configured category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
}

/// Returns the order-preserving subsequence selected by `filter`.
pub fn filter_by_category(expenses: &[Expense], filter: &CategoryFilter) -> Vec<Expense> {
    match filter {
        CategoryFilter::All => expenses.to_vec(),
        CategoryFilter::Category(_) => expenses
            .iter()
            .filter(|expense| filter.matches(expense))
            .cloned()
            .collect(),
    }
}

/// Totals the filtered list. Never divides by zero.
pub fn summarize(filtered: &[Expense]) -> ViewSummary {
    let total_amount: f64 = filtered.iter().map(|expense| expense.amount).sum();
    let count = filtered.len();
    let average = if count > 0 {
        total_amount / count as f64
    } else {
        0.0
    };

    ViewSummary {
        total_amount,
        count,
        average,
    }
}

/// Per-category sums over the unfiltered snapshot, in configured order.
///
/// Expenses with categories outside the configuration are not attributed.
pub fn category_totals(all_expenses: &[Expense], config: &CategoryConfig) -> Vec<CategoryTotal> {
    let mut sums = vec![0.0_f64; config.categories().len()];
    for expense in all_expenses {
        if let Some(index) = config.index_of(&expense.category) {
            sums[index] += expense.amount;
        }
    }

    config
        .categories()
        .iter()
        .zip(sums)
        .filter(|(_, total)| *total > 0.0)
        .map(|(name, total)| CategoryTotal {
            name: name.clone(),
            total,
        })
        .collect()
}

/// Palette entry at the position of `category` in the configured order.
///
/// Returns `None` for categories outside the configuration.
pub fn color_for<'a>(category: &str, config: &'a CategoryConfig) -> Option<&'a str> {
    config
        .index_of(category)
        .and_then(|index| config.palette().get(index))
        .map(String::as_str)
}
