//! Search engine module
//!
//! Defines the SearchEngine trait and the provider implementations.

mod traits;

// Engine implementations
pub mod perplexity;

pub use perplexity::Perplexity;
pub use traits::*;
