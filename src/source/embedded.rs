//! Bundled sample project
//!
//! Lets the tool run with no arguments at all: the sample has a
//! `Statemachine Diagram` whose machine uses pseudostates, a composite
//! state and a submachine state.

use super::ModelSource;
use crate::Result;
use crate::model::{Project, ProjectFile, ProjectFormat};
use async_trait::async_trait;

pub const SAMPLE_PROJECT: &str = include_str!("../../assets/sample.json");

/// Source serving the bundled sample project
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

#[async_trait]
impl ModelSource for EmbeddedSource {
    async fn load(&self) -> Result<Project> {
        ProjectFile::parse(SAMPLE_PROJECT, ProjectFormat::Json)?.into_project()
    }

    fn describe(&self) -> String {
        "embedded:sample.json".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_loads() {
        let project = EmbeddedSource.load().await.unwrap();
        assert!(
            project
                .elements()
                .iter()
                .filter_map(|e| e.as_state_machine_diagram())
                .any(|d| d.name == "Statemachine Diagram")
        );
        assert!(project.machines().count() >= 2);
    }
}
