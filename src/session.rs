//! Model sessions
//!
//! A [`ProjectAccessor`] hands out at most one open [`ModelSession`] at a
//! time. The session is released exactly once, either by [`ModelSession::close`]
//! or when it is dropped, so every exit path of a command gives the model back.

use crate::model::{NamedElement, Project, StateMachineDiagram};
use crate::source::ModelSource;
use crate::{Error, Result};
use regex::Regex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Opens projects, one at a time
#[derive(Debug, Clone, Default)]
pub struct ProjectAccessor {
    open: Arc<AtomicBool>,
    releases: Arc<AtomicUsize>,
}

impl ProjectAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a project from `source` and hold it open
    pub async fn open(&self, source: &dyn ModelSource) -> Result<ModelSession> {
        let origin = source.describe();
        if self
            .open
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::SessionBusy(origin));
        }

        // Load failures must hand the slot back as well.
        let project = match source.load().await {
            Ok(project) => project,
            Err(e) => {
                self.open.store(false, Ordering::Release);
                return Err(e);
            }
        };

        tracing::info!("Opened model {}", origin);
        Ok(ModelSession {
            project,
            origin,
            open: Arc::clone(&self.open),
            releases: Arc::clone(&self.releases),
            released: false,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Number of sessions released so far
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::Acquire)
    }
}

/// An open project
pub struct ModelSession {
    project: Project,
    origin: String,
    open: Arc<AtomicBool>,
    releases: Arc<AtomicUsize>,
    released: bool,
}

impl ModelSession {
    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Named elements accepted by `finder`, in declaration order
    pub fn find_elements(&self, finder: &impl ModelFinder) -> Vec<&NamedElement> {
        self.project
            .elements()
            .iter()
            .filter(|e| finder.is_target(e))
            .collect()
    }

    /// Elements accepted by `finder` that are state machine diagrams
    pub fn state_machine_diagrams(&self, finder: &impl ModelFinder) -> Vec<StateMachineDiagram<'_>> {
        self.find_elements(finder)
            .into_iter()
            .filter_map(|e| {
                let diagram = e.as_state_machine_diagram();
                if diagram.is_none() {
                    tracing::debug!("Skipping '{}': not a state machine diagram", e.name);
                }
                diagram
            })
            .collect()
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.releases.fetch_add(1, Ordering::AcqRel);
        self.open.store(false, Ordering::Release);
        tracing::info!("Closed model {}", self.origin);
    }
}

impl Drop for ModelSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// Predicate selecting named elements
pub trait ModelFinder {
    fn is_target(&self, element: &NamedElement) -> bool;
}

impl<F: Fn(&NamedElement) -> bool> ModelFinder for F {
    fn is_target(&self, element: &NamedElement) -> bool {
        self(element)
    }
}

/// Matches elements by exact name
#[derive(Debug, Clone)]
pub struct NameFinder {
    name: String,
}

impl NameFinder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ModelFinder for NameFinder {
    fn is_target(&self, element: &NamedElement) -> bool {
        element.name == self.name
    }
}

/// Matches elements whose name matches a regular expression
#[derive(Debug, Clone)]
pub struct PatternFinder {
    pattern: Regex,
}

impl PatternFinder {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::invalid_argument(format!("bad name pattern: {}", e)))?;
        Ok(Self { pattern })
    }
}

impl ModelFinder for PatternFinder {
    fn is_target(&self, element: &NamedElement) -> bool {
        self.pattern.is_match(&element.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{EmbeddedSource, FileSource};

    #[tokio::test]
    async fn test_session_released_once_on_close() {
        let accessor = ProjectAccessor::new();
        let session = accessor.open(&EmbeddedSource).await.unwrap();
        assert!(accessor.is_open());
        assert_eq!(session.origin(), "embedded:sample.json");

        session.close();
        assert!(!accessor.is_open());
        assert_eq!(accessor.release_count(), 1);
    }

    #[tokio::test]
    async fn test_session_released_on_error_path() {
        fn failing(session: &ModelSession) -> Result<()> {
            let _ = session.project();
            Err(Error::custom("boom"))
        }

        let accessor = ProjectAccessor::new();
        let result = {
            let session = accessor.open(&EmbeddedSource).await.unwrap();
            failing(&session)
        };
        assert!(result.is_err());
        assert!(!accessor.is_open());
        assert_eq!(accessor.release_count(), 1);
    }

    #[tokio::test]
    async fn test_second_open_is_busy() {
        let accessor = ProjectAccessor::new();
        let first = accessor.open(&EmbeddedSource).await.unwrap();
        let second = accessor.open(&EmbeddedSource).await;
        assert!(matches!(second, Err(Error::SessionBusy(_))));

        drop(first);
        let third = accessor.open(&EmbeddedSource).await.unwrap();
        third.close();
        assert_eq!(accessor.release_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_frees_accessor() {
        let dir = tempfile::tempdir().unwrap();
        let accessor = ProjectAccessor::new();
        let missing = FileSource::new(dir.path().join("nope.json"));
        assert!(accessor.open(&missing).await.is_err());
        assert!(!accessor.is_open());
        assert_eq!(accessor.release_count(), 0);
    }

    #[tokio::test]
    async fn test_finders() {
        let accessor = ProjectAccessor::new();
        let session = accessor.open(&EmbeddedSource).await.unwrap();

        let found = session.find_elements(&NameFinder::new("Statemachine Diagram"));
        assert_eq!(found.len(), 1);

        let found = session.find_elements(&PatternFinder::new("Diagram$").unwrap());
        assert_eq!(found.len(), 3);
        let diagrams = session.state_machine_diagrams(&PatternFinder::new("Diagram$").unwrap());
        assert_eq!(diagrams.len(), 2);

        let by_closure = session.find_elements(&|e: &NamedElement| e.name.starts_with("Or"));
        assert_eq!(by_closure.len(), 1);

        assert!(session.find_elements(&NameFinder::new("Nothing")).is_empty());
    }

    #[test]
    fn test_bad_pattern() {
        assert!(matches!(
            PatternFinder::new("("),
            Err(Error::InvalidArgument(_))
        ));
    }
}
