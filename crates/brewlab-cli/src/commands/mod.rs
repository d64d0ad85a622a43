//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `common` - Shared utilities (config resolution, brew loading, JSON output)
//! - `analyze` - Correlation matrix and ranked insights
//! - `detail` - Scatter detail for one pair
//! - `goals` - Goal tracking
//! - `variables` - Catalog and config display
//! - `serve` - Web server command

pub mod analyze;
pub mod common;
pub mod detail;
pub mod goals;
pub mod serve;
pub mod variables;

// Re-export command functions for main.rs
pub use analyze::*;
pub use common::*;
pub use detail::*;
pub use goals::*;
pub use serve::*;
pub use variables::*;
