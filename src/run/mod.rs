// src/run/mod.rs

//! Run orchestration.
//!
//! - [`controller`] validates preconditions, resets per-run state and
//!   invokes the scheduler exactly once per run.
//! - [`events`] carries per-node progress to any observer.

pub mod controller;
pub mod events;

pub use controller::RunController;
pub use events::{EventSink, RunEvent};
