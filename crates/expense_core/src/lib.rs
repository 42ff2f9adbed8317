//! Core domain logic for the expense tracker.
//! This crate is the single source of truth for expense aggregation rules.

pub mod config;
pub mod db;
pub mod engine;
pub mod format;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{CategoryConfig, ConfigError, TrackerConfig};
pub use engine::aggregation::{
    category_totals, color_for, filter_by_category, summarize, CategoryFilter, CategoryTotal,
    ViewSummary,
};
pub use engine::view::{build_view, ChartData, ExpenseRow, ExpenseView, Tab};
pub use format::CurrencyFormat;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::expense::{Expense, ExpenseId, NewExpense};
pub use service::submit::{SubmitRejected, SubmitState};
pub use service::tracker::{AddExpenseError, ExpenseTracker};
pub use service::validation::{validate_draft, ExpenseDraft, ValidationError, MAX_AMOUNT};
pub use store::memory_store::{MemoryExpenseStore, StoreCall};
pub use store::sqlite_store::SqliteExpenseStore;
pub use store::{ExpenseStore, PersistenceError, SnapshotListener, StoreResult, Subscription};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
