//! File-backed model source

use super::ModelSource;
use crate::Result;
use crate::model::{Project, ProjectFile, ProjectFormat};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Project file on disk, JSON unless the extension is `.toml`
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn format(&self) -> ProjectFormat {
        match self.path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ProjectFormat::Toml,
            _ => ProjectFormat::Json,
        }
    }
}

#[async_trait]
impl ModelSource for FileSource {
    async fn load(&self) -> Result<Project> {
        tracing::debug!("Reading project file {:?}", self.path);
        let contents = fs::read_to_string(&self.path).await?;

        ProjectFile::parse(&contents, self.format())
            .and_then(ProjectFile::into_project)
            .map_err(|e| e.in_file(&self.path))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileSource::new("a.json").format(), ProjectFormat::Json);
        assert_eq!(FileSource::new("a.TOML").format(), ProjectFormat::Toml);
        assert_eq!(FileSource::new("a").format(), ProjectFormat::Json);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.json"));
        assert!(matches!(source.load().await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_malformed_file_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"state_machines\": 3 }}").unwrap();

        let source = FileSource::new(file.path());
        match source.load().await {
            Err(Error::FormatIn { file: f, .. }) => assert_eq!(f, file.path()),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("malformed project loaded"),
        }
    }

    #[tokio::test]
    async fn test_load_valid_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{ "name": "disk", "state_machines": [ {{ "id": "m",
                "vertices": [ {{ "id": "a", "kind": "state", "name": "A" }} ] }} ] }}"#
        )
        .unwrap();

        let project = FileSource::new(file.path()).load().await.unwrap();
        assert_eq!(project.name, "disk");
        assert_eq!(project.graph.node_count(), 1);
    }
}
