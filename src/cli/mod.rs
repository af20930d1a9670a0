//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs, one per subcommand that does work.

mod diff;
mod fleet;

pub use diff::run_diff;
pub use fleet::run_fleet;

// Re-export config types used by handlers
pub use crate::config::AppConfig;
