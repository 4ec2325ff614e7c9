//! Search orchestration module
//!
//! Runs the depth-bounded, judge-guided query expansion of one sub-question
//! and records every result in the shared store.

mod scheduler;
mod session;

pub use scheduler::QueryScheduler;
pub use session::{SearchSession, SessionOutcome};
