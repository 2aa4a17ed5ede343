//! Accessibility wiring for modals.
//!
//! - [`AccessibilityController`] - keyboard trap, scroll lock and focus restore
//! - [`FocusScope`] / [`BackgroundHost`] - the two sides the controller talks to
//! - [`AccessibilityStore`] - per-logical-modal scroll and focus memory

mod controller;
mod focus;
mod store;

pub use controller::{AccessibilityController, BackgroundHost, SessionMemory, TrapEvent};
pub use focus::{FocusScope, FocusTarget, TabDirection, cycle};
pub use store::{AccessibilityStore, MemoryStore};

#[cfg(test)]
pub(crate) use controller::tests::{FakeBackground, resolver as test_resolver};
