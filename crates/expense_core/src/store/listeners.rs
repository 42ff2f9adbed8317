//! Live-subscription bookkeeping shared by store adapters.
//!
//! # Invariants
//! - Listener ids are never reused within one registry.
//! - A detached listener is never called again.
//! - A listener is never re-entered. If it triggers a store change from inside
//!   its own callback, it receives the final snapshot after its callback
//!   returns.
//! - A listener never receives a snapshot older than one it already has.

use super::SnapshotListener;
use crate::model::expense::Expense;
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

#[derive(Clone)]
struct ListenerEntry {
    id: u64,
    callback: Rc<RefCell<SnapshotListener>>,
    /// Generation of the newest snapshot handed to `callback`.
    delivered: Rc<Cell<u64>>,
    /// Latest snapshot that arrived while `callback` was running.
    pending: Rc<RefCell<Option<(u64, Vec<Expense>)>>>,
}

impl ListenerEntry {
    fn take_pending(&self) -> Option<(u64, Vec<Expense>)> {
        self.pending.borrow_mut().take()
    }
}

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    generation: u64,
    entries: Vec<ListenerEntry>,
}

impl ListenerTable {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }
}

/// Single-threaded registry of snapshot listeners.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    table: Rc<RefCell<ListenerTable>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, listener: SnapshotListener) -> Subscription {
        let mut table = self.table.borrow_mut();
        let id = table.next_id;
        table.next_id += 1;
        let generation = table.generation;
        table.entries.push(ListenerEntry {
            id,
            callback: Rc::new(RefCell::new(listener)),
            delivered: Rc::new(Cell::new(generation)),
            pending: Rc::new(RefCell::new(None)),
        });

        Subscription {
            id,
            table: Some(Rc::downgrade(&self.table)),
        }
    }

    /// Delivers `snapshot` to every live listener; returns how many ran.
    ///
    /// A listener that is still inside its callback is not called again
    /// directly. The snapshot is parked on its entry and delivered by the
    /// outer call once the callback returns, until nothing is parked.
    /// Listeners already holding a newer snapshot from a nested call are
    /// skipped.
    pub(crate) fn notify(&self, snapshot: &[Expense]) -> usize {
        let (generation, entries) = {
            let mut table = self.table.borrow_mut();
            table.generation += 1;
            (table.generation, table.entries.clone())
        };
        let mut delivered = 0;

        for entry in entries {
            if !self.is_registered(entry.id) || entry.delivered.get() > generation {
                continue;
            }
            let Ok(mut callback) = entry.callback.try_borrow_mut() else {
                *entry.pending.borrow_mut() = Some((generation, snapshot.to_vec()));
                debug!(
                    "event=snapshot_defer module=store status=reentrant listener_id={}",
                    entry.id
                );
                continue;
            };

            entry.delivered.set(generation);
            (&mut *callback)(snapshot);
            delivered += 1;

            while let Some((latest_generation, latest)) = entry.take_pending() {
                if !self.is_registered(entry.id) {
                    break;
                }
                entry.delivered.set(latest_generation);
                (&mut *callback)(&latest);
            }
        }

        delivered
    }

    fn is_registered(&self, id: u64) -> bool {
        self.table.borrow().contains(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }
}

/// Handle for one live subscription.
///
/// Detaches on [`Subscription::unsubscribe`] or when dropped.
#[must_use = "dropping a subscription detaches it immediately"]
pub struct Subscription {
    id: u64,
    table: Option<Weak<RefCell<ListenerTable>>>,
}

impl Subscription {
    /// Detaches the listener. Consumes the handle, so it runs exactly once.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    /// Whether the listener is still registered with a live store.
    pub fn is_active(&self) -> bool {
        self.table
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|table| {
                let registered = table.borrow().contains(self.id);
                registered
            })
    }

    fn detach(&mut self) {
        let Some(table) = self.table.take().and_then(|weak| weak.upgrade()) else {
            return;
        };
        table
            .borrow_mut()
            .entries
            .retain(|entry| entry.id != self.id);
        debug!(
            "event=unsubscribe module=store status=ok listener_id={}",
            self.id
        );
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
