//! Model source module - Abstraction for loading project files
//!
//! This module provides a trait-based abstraction for reading a state machine
//! project from different places (a file on disk, the bundled sample).

use crate::Result;
use crate::model::Project;
use async_trait::async_trait;
use std::path::PathBuf;

pub mod embedded;
pub mod file;

pub use embedded::EmbeddedSource;
pub use file::FileSource;

/// Source of a state machine project
///
/// Implementations:
/// - `FileSource`: reads a JSON or TOML project file
/// - `EmbeddedSource`: the sample project compiled into the binary
#[async_trait]
pub trait ModelSource: Send + Sync {
    /// Read and resolve the whole project
    async fn load(&self) -> Result<Project>;

    /// Human readable origin, used in logs and session bookkeeping
    fn describe(&self) -> String;
}

/// Create a model source: the given file, or the bundled sample when none is given
pub fn create_model_source(path: Option<PathBuf>) -> Box<dyn ModelSource> {
    match path {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(EmbeddedSource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model_source() {
        let source = create_model_source(None);
        assert_eq!(source.describe(), "embedded:sample.json");

        let source = create_model_source(Some(PathBuf::from("model.json")));
        assert_eq!(source.describe(), "model.json");
    }
}
