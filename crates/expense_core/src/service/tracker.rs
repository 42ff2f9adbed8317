//! Expense tracker session.
//!
//! # Responsibility
//! - Own the UI-side state of one tracker: draft, filter, tab, submit state,
//!   and the latest snapshot delivered by the store subscription.
//! - Translate user intents (add, delete, filter, tab switch) into store
//!   calls or local state changes.
//!
//! # Invariants
//! - The in-memory list is only ever replaced wholesale by a snapshot.
//! - Invalid drafts never reach the store.
//! - At most one add is in flight; deletes are not guarded.
//! - No error is fatal to the session or corrupts the list.

use crate::config::TrackerConfig;
use crate::engine::aggregation::CategoryFilter;
use crate::engine::view::{build_view, ExpenseView, Tab};
use crate::model::expense::{Expense, ExpenseId, NewExpense};
use crate::service::submit::{SubmitRejected, SubmitState};
use crate::service::validation::{validate_draft, ExpenseDraft, ValidationError};
use crate::store::{ExpenseStore, PersistenceError, StoreResult, Subscription};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::time::Instant;

/// Why an add did not produce a new expense.
#[derive(Debug)]
pub enum AddExpenseError {
    Validation(ValidationError),
    Persistence(PersistenceError),
    Busy(SubmitRejected),
}

impl Display for AddExpenseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "error: {err}"),
            Self::Busy(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AddExpenseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::Busy(err) => Some(err),
        }
    }
}

impl From<ValidationError> for AddExpenseError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for AddExpenseError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

impl From<SubmitRejected> for AddExpenseError {
    fn from(value: SubmitRejected) -> Self {
        Self::Busy(value)
    }
}

type Clock = Box<dyn Fn() -> NaiveDate>;

/// One tracker session bound to a store.
pub struct ExpenseTracker<S: ExpenseStore> {
    store: S,
    config: TrackerConfig,
    expenses: Rc<RefCell<Vec<Expense>>>,
    subscription: Option<Subscription>,
    draft: ExpenseDraft,
    submit: SubmitState,
    in_flight: Option<NewExpense>,
    filter: CategoryFilter,
    tab: Tab,
    notice: Option<String>,
    today: Clock,
}

impl<S: ExpenseStore> ExpenseTracker<S> {
    /// Creates a detached session; call [`Self::attach`] to start the live query.
    pub fn new(store: S, config: TrackerConfig) -> Self {
        Self::with_clock(store, config, Box::new(|| Utc::now().date_naive()))
    }

    /// Like [`Self::new`] with a custom source for the draft's default date.
    pub fn with_clock(store: S, config: TrackerConfig, today: Clock) -> Self {
        let draft = ExpenseDraft::new(&config.categories, today());
        Self {
            store,
            config,
            expenses: Rc::new(RefCell::new(Vec::new())),
            subscription: None,
            draft,
            submit: SubmitState::default(),
            in_flight: None,
            filter: CategoryFilter::All,
            tab: Tab::List,
            notice: None,
            today,
        }
    }

    /// Subscribes to the live query. A no-op when already attached.
    pub fn attach(&mut self) -> StoreResult<()> {
        if self.subscription.is_some() {
            return Ok(());
        }

        let expenses = Rc::clone(&self.expenses);
        let subscription = self.store.subscribe(Box::new(move |snapshot: &[Expense]| {
            *expenses.borrow_mut() = snapshot.to_vec();
        }))?;
        self.subscription = Some(subscription);

        info!(
            "event=tracker_attach module=service status=ok rows={}",
            self.expenses.borrow().len()
        );
        Ok(())
    }

    /// Releases the live query. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            info!("event=tracker_detach module=service status=ok");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Validates the draft and submits it in one step.
    ///
    /// On success the draft resets to its defaults; the new expense shows up
    /// through the next snapshot. On failure the error message is kept in
    /// [`SubmitState::Error`] and the draft is left untouched for a retry.
    pub fn add(&mut self) -> Result<ExpenseId, AddExpenseError> {
        self.begin_add()?;
        self.finish_add()
    }

    /// Validates the draft and enters [`SubmitState::Submitting`].
    ///
    /// Nothing reaches the store until [`Self::finish_add`]. While an add is
    /// in flight a renderer sees the submit control as busy and further
    /// adds are refused with [`AddExpenseError::Busy`].
    pub fn begin_add(&mut self) -> Result<(), AddExpenseError> {
        if self.submit.is_submitting() {
            return Err(SubmitRejected::InFlight.into());
        }

        let fields = match validate_draft(&self.draft, &self.config.categories) {
            Ok(fields) => fields,
            Err(err) => {
                info!(
                    "event=expense_add module=service status=invalid reason={}",
                    err.code()
                );
                self.submit.reject(err.to_string())?;
                return Err(err.into());
            }
        };

        self.submit.begin()?;
        self.in_flight = Some(fields);
        Ok(())
    }

    /// Sends the add started by [`Self::begin_add`] to the store.
    ///
    /// A store error for a change that was committed anyway
    /// ([`PersistenceError::is_committed`]) resets the form like a success
    /// and raises a [`Self::notice`] instead of a retryable error.
    pub fn finish_add(&mut self) -> Result<ExpenseId, AddExpenseError> {
        let Some(fields) = self.in_flight.take() else {
            return Err(SubmitRejected::NotSubmitting.into());
        };

        let started_at = Instant::now();
        match self.store.create(&fields) {
            Ok(id) => {
                self.submit.succeed()?;
                self.draft = ExpenseDraft::new(&self.config.categories, (self.today)());
                info!(
                    "event=expense_add module=service status=ok expense_id={} duration_ms={}",
                    id,
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) if err.is_committed() => {
                warn!(
                    "event=expense_add module=service status=unpublished duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                // Saved: a retry would duplicate it.
                self.submit.succeed()?;
                self.draft = ExpenseDraft::new(&self.config.categories, (self.today)());
                self.notice = Some(format!("expense saved but the list is out of date: {err}"));
                Err(err.into())
            }
            Err(err) => {
                let err = AddExpenseError::from(err);
                warn!(
                    "event=expense_add module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                self.submit.fail(err.to_string())?;
                Err(err)
            }
        }
    }

    /// Deletes `id` in the store, whether or not it is in the local list.
    ///
    /// Failures are logged and surfaced through [`Self::notice`]; the list is
    /// left as the last snapshot delivered it.
    pub fn delete(&mut self, id: ExpenseId) -> StoreResult<()> {
        match self.store.remove(id) {
            Ok(()) => {
                info!(
                    "event=expense_delete module=service status=ok expense_id={}",
                    id
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=expense_delete module=service status=error expense_id={} error={}",
                    id, err
                );
                self.notice = Some(if err.is_committed() {
                    format!("expense deleted but the list is out of date: {err}")
                } else {
                    format!("could not delete expense: {err}")
                });
                Err(err)
            }
        }
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Selects a filter by its option label; the "All" label clears it.
    pub fn set_filter_label(&mut self, label: &str) {
        self.filter = CategoryFilter::from_label(label, &self.config.categories);
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.submit.dismiss();
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.draft.amount = amount.into();
        self.submit.dismiss();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.draft.category = category.into();
        self.submit.dismiss();
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.draft.date = date;
        self.submit.dismiss();
    }

    pub fn dismiss_error(&mut self) {
        self.submit.dismiss();
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit
    }

    /// Latest non-blocking message, e.g. a failed delete.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Latest snapshot, newest first.
    pub fn expenses(&self) -> Vec<Expense> {
        self.expenses.borrow().clone()
    }

    /// Derives the render-ready view from the latest snapshot.
    pub fn view(&self) -> ExpenseView {
        build_view(
            &self.expenses.borrow(),
            &self.filter,
            self.tab,
            &self.config.categories,
            &self.config.currency,
        )
    }
}
