//! Simulation kernel: stepping, system hooks, render-side event subscription.
//!
//! # Invariants
//! - Simulation time only advances through `Simulation::step`, and never while paused.
//! - Event callbacks run outside the event manager's lock.
//! - Dropping a `Connection` unsubscribes it. No call to its callback starts after
//!   the drop, even from an emit already in progress.

pub mod events;
pub mod simulation;

pub use events::{Connection, EventManager};
pub use simulation::{Descriptor, Simulation, System, UpdateInfo};
