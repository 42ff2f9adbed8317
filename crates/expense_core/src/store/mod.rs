//! Expense store adapter contracts.
//!
//! # Responsibility
//! - Define the narrow capability the tracker needs from a document store:
//!   one live ordered query and two mutations.
//! - Keep storage details (SQL, wire protocols) behind that capability.
//!
//! # Invariants
//! - Snapshots are ordered by `created_at` descending, newest first.
//! - Every successful create/remove delivers the full new snapshot to every
//!   live subscription. There is no incremental diff.
//! - Stores do not re-validate create payloads.

use crate::db::DbError;
use crate::model::expense::{Expense, ExpenseId, NewExpense};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

mod listeners;
pub mod memory_store;
pub mod sqlite_store;

pub use listeners::Subscription;
pub(crate) use listeners::ListenerRegistry;

/// Callback receiving each full snapshot of the live query.
pub type SnapshotListener = Box<dyn FnMut(&[Expense])>;

pub type StoreResult<T> = Result<T, PersistenceError>;

/// Failure of a read or write against the backing store.
#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    NotFound(ExpenseId),
    InvalidData(String),
    Unavailable(String),
    /// The change was committed, but the snapshot that should follow it
    /// could not be read. Subscribers still hold the previous list.
    Unpublished(Box<PersistenceError>),
}

impl PersistenceError {
    /// Whether the mutation reached the store despite the error.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Unpublished(_))
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "expense not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored expense: {message}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
            Self::Unpublished(err) => write!(f, "change saved but not published: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unpublished(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Live-query and mutation capability over one expense collection.
pub trait ExpenseStore {
    /// Registers `on_change`, delivers the current snapshot to it right away,
    /// then again after every change until the handle is released.
    fn subscribe(&self, on_change: SnapshotListener) -> StoreResult<Subscription>;

    /// Current result of the live query.
    fn snapshot(&self) -> StoreResult<Vec<Expense>>;

    /// Persists a new expense; the store assigns `id` and `created_at`.
    fn create(&self, fields: &NewExpense) -> StoreResult<ExpenseId>;

    /// Permanently deletes one expense.
    fn remove(&self, id: ExpenseId) -> StoreResult<()>;
}

impl<S: ExpenseStore + ?Sized> ExpenseStore for &S {
    fn subscribe(&self, on_change: SnapshotListener) -> StoreResult<Subscription> {
        (**self).subscribe(on_change)
    }

    fn snapshot(&self) -> StoreResult<Vec<Expense>> {
        (**self).snapshot()
    }

    fn create(&self, fields: &NewExpense) -> StoreResult<ExpenseId> {
        (**self).create(fields)
    }

    fn remove(&self, id: ExpenseId) -> StoreResult<()> {
        (**self).remove(id)
    }
}

impl<S: ExpenseStore + ?Sized> ExpenseStore for Rc<S> {
    fn subscribe(&self, on_change: SnapshotListener) -> StoreResult<Subscription> {
        (**self).subscribe(on_change)
    }

    fn snapshot(&self) -> StoreResult<Vec<Expense>> {
        (**self).snapshot()
    }

    fn create(&self, fields: &NewExpense) -> StoreResult<ExpenseId> {
        (**self).create(fields)
    }

    fn remove(&self, id: ExpenseId) -> StoreResult<()> {
        (**self).remove(id)
    }
}
