//! SQLite-backed expense store.
//!
//! # Responsibility
//! - Serve the live query from the `expenses` table.
//! - Assign identity and creation time on insert.
//! - Push a fresh snapshot to subscribers after every successful mutation.
//!
//! # Invariants
//! - Snapshot order is `created_at DESC, seq DESC`.
//! - Read paths reject malformed rows instead of masking them.
//! - A mutation whose follow-up snapshot cannot be read fails with
//!   `PersistenceError::Unpublished`; the row change itself stays committed.

use super::{
    ExpenseStore, ListenerRegistry, PersistenceError, SnapshotListener, StoreResult, Subscription,
};
use crate::model::expense::{Expense, ExpenseId, NewExpense};
use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use rusqlite::{params, Connection, Row};
use std::time::Instant;
use uuid::Uuid;

const EXPENSE_SNAPSHOT_SQL: &str = "SELECT
    id,
    title,
    amount,
    category,
    date,
    created_at
FROM expenses
ORDER BY created_at DESC, seq DESC";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Expense store over a migrated SQLite connection.
pub struct SqliteExpenseStore<'conn> {
    conn: &'conn Connection,
    listeners: ListenerRegistry,
}

impl<'conn> SqliteExpenseStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Re-reads the live query after a committed mutation and fans it out.
    fn publish_snapshot(&self, cause: &str) -> StoreResult<()> {
        match self.snapshot() {
            Ok(snapshot) => {
                let delivered = self.listeners.notify(&snapshot);
                debug!(
                    "event=snapshot_publish module=store status=ok cause={} rows={} listeners={}",
                    cause,
                    snapshot.len(),
                    delivered
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=snapshot_publish module=store status=error cause={} error={}",
                    cause, err
                );
                Err(PersistenceError::Unpublished(Box::new(err)))
            }
        }
    }
}

impl ExpenseStore for SqliteExpenseStore<'_> {
    fn subscribe(&self, mut on_change: SnapshotListener) -> StoreResult<Subscription> {
        let snapshot = self.snapshot()?;
        on_change(&snapshot);
        Ok(self.listeners.register(on_change))
    }

    fn snapshot(&self) -> StoreResult<Vec<Expense>> {
        let mut stmt = self.conn.prepare(EXPENSE_SNAPSHOT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut expenses = Vec::new();

        while let Some(row) = rows.next()? {
            expenses.push(parse_expense_row(row)?);
        }

        Ok(expenses)
    }

    fn create(&self, fields: &NewExpense) -> StoreResult<ExpenseId> {
        let started_at = Instant::now();
        let id = Uuid::new_v4();
        let created_at = Utc::now().timestamp_millis();

        if let Err(err) = self.conn.execute(
            "INSERT INTO expenses (id, title, amount, category, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.to_string(),
                fields.title.as_str(),
                fields.amount,
                fields.category.as_str(),
                fields.date.format(DATE_FORMAT).to_string(),
                created_at,
            ],
        ) {
            error!(
                "event=expense_create module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        info!(
            "event=expense_create module=store status=ok expense_id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        self.publish_snapshot("create")?;
        Ok(id)
    }

    fn remove(&self, id: ExpenseId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            warn!(
                "event=expense_remove module=store status=not_found expense_id={}",
                id
            );
            return Err(PersistenceError::NotFound(id));
        }

        info!(
            "event=expense_remove module=store status=ok expense_id={}",
            id
        );
        self.publish_snapshot("remove")
    }
}

fn parse_expense_row(row: &Row<'_>) -> StoreResult<Expense> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        PersistenceError::InvalidData(format!("invalid uuid `{id_text}` in expenses.id"))
    })?;

    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        PersistenceError::InvalidData(format!("invalid date `{date_text}` in expenses.date"))
    })?;

    Ok(Expense {
        id,
        title: row.get("title")?,
        amount: row.get("amount")?,
        category: row.get("category")?,
        date,
        created_at: row.get("created_at")?,
    })
}
