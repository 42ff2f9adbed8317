//! Single in-flight add guard.
//!
//! States: `Idle`, `Submitting`, `Error(message)`.
//!
//! - `begin`: `Idle | Error` -> `Submitting`; rejected while `Submitting`.
//! - `succeed`: `Submitting` -> `Idle`.
//! - `fail`: `Submitting` -> `Error`.
//! - `reject`: `Idle | Error` -> `Error` (validation failures, no store call).
//! - `dismiss`: `Error` -> `Idle`.
//!
//! There is no request queue and no automatic retry.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Submit control state for the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Error(String),
}

/// Transition refused by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// An add is already in flight.
    InFlight,
    /// `succeed`/`fail` called with nothing in flight.
    NotSubmitting,
}

impl Display for SubmitRejected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InFlight => write!(f, "an expense is already being added"),
            Self::NotSubmitting => write!(f, "no add is in flight"),
        }
    }
}

impl Error for SubmitRejected {}

impl SubmitState {
    pub fn begin(&mut self) -> Result<(), SubmitRejected> {
        if self.is_submitting() {
            return Err(SubmitRejected::InFlight);
        }
        *self = Self::Submitting;
        Ok(())
    }

    pub fn succeed(&mut self) -> Result<(), SubmitRejected> {
        self.finish(Self::Idle)
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), SubmitRejected> {
        self.finish(Self::Error(message.into()))
    }

    pub fn reject(&mut self, message: impl Into<String>) -> Result<(), SubmitRejected> {
        if self.is_submitting() {
            return Err(SubmitRejected::InFlight);
        }
        *self = Self::Error(message.into());
        Ok(())
    }

    /// Clears a shown error. No effect in other states.
    pub fn dismiss(&mut self) {
        if matches!(self, Self::Error(_)) {
            *self = Self::Idle;
        }
    }

    /// Whether the submit control should be disabled.
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    fn finish(&mut self, next: Self) -> Result<(), SubmitRejected> {
        if !self.is_submitting() {
            return Err(SubmitRejected::NotSubmitting);
        }
        *self = next;
        Ok(())
    }
}
