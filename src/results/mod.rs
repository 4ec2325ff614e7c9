//! Search sections and the store they are appended to
//!
//! Every search call, successful or not, produces exactly one section.

mod store;
mod types;

pub use store::ResultStore;
pub use types::*;
