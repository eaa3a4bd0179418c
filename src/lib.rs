//! State Diagram Walker
//!
//! Opens a UML state machine model and prints the state machine behind a
//! named diagram: its states, its vertices with their incoming and outgoing
//! transitions, its transitions, and everything nested in composite states
//! and submachine states.
//!
//! This library provides functionality for:
//! - Loading read-only state machine projects from JSON or TOML files
//! - Opening a project through a scoped session and finding diagrams by name
//! - Walking a state machine depth-first into a deterministic text report
//! - Detecting cyclic submachine nesting and exporting machines to DOT

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod source;
pub mod walker;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
///
/// Logs go to stderr; stdout carries the report.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "state-diagram-walker");
    }
}
