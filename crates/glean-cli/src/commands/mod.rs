//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Run the insight engine and emit text/CSV/JSON reports
//! - `inspect` - Panel validation and insight-type listing

pub mod analyze;
pub mod inspect;

// Re-export command functions for main.rs
pub use analyze::*;
pub use inspect::*;
