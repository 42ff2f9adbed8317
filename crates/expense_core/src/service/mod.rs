//! Presentation boundary services.
//!
//! # Responsibility
//! - Validate user input before it reaches a store.
//! - Guard submission with an explicit state machine.
//! - Hold per-session UI state and expose user intents.
//!
//! # See also
//! - `engine` for the derivations rendered from this state.

pub mod submit;
pub mod tracker;
pub mod validation;
