//! In-process expense store.
//!
//! Delivers snapshots synchronously and records every call it receives, so
//! callers can assert exactly which store operations a user action issued.
//! Failures can be scheduled to exercise error paths without a network.

use super::{
    ExpenseStore, ListenerRegistry, PersistenceError, SnapshotListener, StoreResult, Subscription,
};
use crate::model::expense::{Expense, ExpenseId, NewExpense};
use chrono::Utc;
use std::cell::{Cell, RefCell};
use uuid::Uuid;

/// One operation received by a [`MemoryExpenseStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Subscribe,
    Create(NewExpense),
    Remove(ExpenseId),
}

#[derive(Default)]
struct FailurePlan {
    create: Option<String>,
    remove: Option<String>,
    publish: Option<String>,
    offline: Option<String>,
}

/// Expense store held entirely in memory, newest record first.
#[derive(Default)]
pub struct MemoryExpenseStore {
    records: RefCell<Vec<Expense>>,
    listeners: ListenerRegistry,
    calls: RefCell<Vec<StoreCall>>,
    failures: RefCell<FailurePlan>,
    last_created_at: Cell<i64>,
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store; records are ordered by `created_at` descending.
    pub fn with_expenses(mut expenses: Vec<Expense>) -> Self {
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let newest = expenses.first().map_or(0, |expense| expense.created_at);
        let store = Self::default();
        *store.records.borrow_mut() = expenses;
        store.last_created_at.set(newest);
        store
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.borrow().clone()
    }

    /// Number of create/remove calls received.
    pub fn mutation_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| !matches!(call, StoreCall::Subscribe))
            .count()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// The next create fails with `message` instead of persisting.
    pub fn fail_next_create(&self, message: impl Into<String>) {
        self.failures.borrow_mut().create = Some(message.into());
    }

    /// The next remove fails with `message` instead of deleting.
    pub fn fail_next_remove(&self, message: impl Into<String>) {
        self.failures.borrow_mut().remove = Some(message.into());
    }

    /// The next successful mutation is applied but its snapshot is not
    /// delivered; the call fails with [`PersistenceError::Unpublished`].
    pub fn fail_next_publish(&self, message: impl Into<String>) {
        self.failures.borrow_mut().publish = Some(message.into());
    }

    /// Every operation fails with `message` until [`Self::go_online`].
    pub fn go_offline(&self, message: impl Into<String>) {
        self.failures.borrow_mut().offline = Some(message.into());
    }

    pub fn go_online(&self) {
        self.failures.borrow_mut().offline = None;
    }

    fn check_online(&self) -> StoreResult<()> {
        match &self.failures.borrow().offline {
            Some(message) => Err(PersistenceError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn next_created_at(&self) -> i64 {
        let created_at = Utc::now()
            .timestamp_millis()
            .max(self.last_created_at.get());
        self.last_created_at.set(created_at);
        created_at
    }

    fn publish(&self) -> StoreResult<()> {
        if let Some(message) = self.failures.borrow_mut().publish.take() {
            return Err(PersistenceError::Unpublished(Box::new(
                PersistenceError::Unavailable(message),
            )));
        }
        let snapshot = self.records.borrow().clone();
        self.listeners.notify(&snapshot);
        Ok(())
    }
}

impl ExpenseStore for MemoryExpenseStore {
    fn subscribe(&self, mut on_change: SnapshotListener) -> StoreResult<Subscription> {
        self.calls.borrow_mut().push(StoreCall::Subscribe);
        self.check_online()?;
        let snapshot = self.records.borrow().clone();
        on_change(&snapshot);
        Ok(self.listeners.register(on_change))
    }

    fn snapshot(&self) -> StoreResult<Vec<Expense>> {
        self.check_online()?;
        Ok(self.records.borrow().clone())
    }

    fn create(&self, fields: &NewExpense) -> StoreResult<ExpenseId> {
        self.calls
            .borrow_mut()
            .push(StoreCall::Create(fields.clone()));
        self.check_online()?;
        if let Some(message) = self.failures.borrow_mut().create.take() {
            return Err(PersistenceError::Unavailable(message));
        }

        let id = Uuid::new_v4();
        let expense = fields.clone().into_expense(id, self.next_created_at());
        self.records.borrow_mut().insert(0, expense);
        self.publish()?;
        Ok(id)
    }

    fn remove(&self, id: ExpenseId) -> StoreResult<()> {
        self.calls.borrow_mut().push(StoreCall::Remove(id));
        self.check_online()?;
        if let Some(message) = self.failures.borrow_mut().remove.take() {
            return Err(PersistenceError::Unavailable(message));
        }

        let removed = {
            let mut records = self.records.borrow_mut();
            let before = records.len();
            records.retain(|expense| expense.id != id);
            before != records.len()
        };
        if !removed {
            return Err(PersistenceError::NotFound(id));
        }

        self.publish()
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryExpenseStore, StoreCall};
    use crate::model::expense::{Expense, NewExpense};
    use crate::store::{ExpenseStore, PersistenceError};
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn lunch() -> NewExpense {
        NewExpense::new(
            "Lunch",
            12.0,
            "Food",
            NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date"),
        )
    }

    #[test]
    fn create_prepends_and_notifies() {
        let store = MemoryExpenseStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let seen = Rc::clone(&seen);
            store
                .subscribe(Box::new(move |snapshot: &[Expense]| seen.borrow_mut().push(snapshot.len())))
                .expect("subscribe succeeds")
        };

        let first = store.create(&lunch()).expect("create succeeds");
        let second = store.create(&lunch()).expect("create succeeds");

        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        let snapshot = store.snapshot().expect("snapshot succeeds");
        assert_eq!(snapshot[0].id, second);
        assert_eq!(snapshot[1].id, first);
        assert!(snapshot[0].created_at >= snapshot[1].created_at);
    }

    #[test]
    fn scheduled_failure_applies_once() {
        let store = MemoryExpenseStore::new();
        store.fail_next_create("quota exceeded");

        let err = store.create(&lunch()).expect_err("first create fails");
        assert!(err.to_string().contains("quota exceeded"));
        store.create(&lunch()).expect("second create succeeds");

        assert_eq!(store.mutation_count(), 2);
        assert!(matches!(store.calls()[0], StoreCall::Create(_)));
    }

    #[test]
    fn offline_store_rejects_everything() {
        let store = MemoryExpenseStore::new();
        store.go_offline("no network");

        assert!(matches!(
            store.snapshot(),
            Err(PersistenceError::Unavailable(_))
        ));
        assert!(store.create(&lunch()).is_err());

        store.go_online();
        assert!(store.create(&lunch()).is_ok());
    }

    #[test]
    fn listener_that_writes_on_notify_ends_with_latest_snapshot() {
        let store = Rc::new(MemoryExpenseStore::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let _subscription = {
            let seen = Rc::clone(&seen);
            let writer = Rc::downgrade(&store);
            store
                .subscribe(Box::new(move |snapshot: &[Expense]| {
                    seen.borrow_mut().push(snapshot.len());
                    if snapshot.len() == 1 {
                        if let Some(store) = writer.upgrade() {
                            store.create(&lunch()).expect("nested create succeeds");
                        }
                    }
                }))
                .expect("subscribe succeeds")
        };

        store.create(&lunch()).expect("create succeeds");

        assert_eq!(store.snapshot().expect("snapshot succeeds").len(), 2);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }
}
