//! Wellness Shared Library
//!
//! This crate contains the step activity model, formulas and API types
//! shared by the backend service and the WASM helpers.

pub mod activity;
pub mod errors;
pub mod format;
pub mod insight;
pub mod types;

// Re-export commonly used items
pub use activity::*;
pub use errors::*;
pub use insight::*;
pub use types::*;
