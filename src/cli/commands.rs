//! CLI command implementations
//!
//! This module contains the implementation for each CLI command. Every
//! command opens exactly one model session; the session is closed at the end
//! of the command, or dropped (and so released) when a step fails.

use crate::session::{ModelSession, ProjectAccessor};
use crate::source::create_model_source;
use crate::{Config, Result};
use std::io::Write;
use std::path::PathBuf;

/// Open the model named on the command line, falling back to config, then to the sample
async fn open_model(
    accessor: &ProjectAccessor,
    model: Option<PathBuf>,
    config: &Config,
) -> Result<ModelSession> {
    let source = create_model_source(model.or_else(|| config.default.model.clone()));
    tracing::debug!("Using model source: {}", source.describe());
    accessor.open(source.as_ref()).await
}

/// Show command implementation
pub mod show {
    use super::*;
    use crate::cli::{OutputFormat, ShowArgs};
    use crate::session::{NameFinder, PatternFinder};
    use crate::walker::Walker;

    /// Execute the show command, returning the number of diagrams rendered
    pub async fn execute(args: ShowArgs, config: &Config, w: &mut impl Write) -> Result<usize> {
        let accessor = ProjectAccessor::new();
        let session = open_model(&accessor, args.model, config).await?;
        let policy = args.on_cycle.unwrap_or(config.walker.on_cycle);

        let diagrams = match &args.pattern {
            Some(pattern) => session.state_machine_diagrams(&PatternFinder::new(pattern)?),
            None => {
                let name = args.diagram.as_deref().unwrap_or(&config.default.diagram);
                session.state_machine_diagrams(&NameFinder::new(name))
            }
        };

        if diagrams.is_empty() {
            tracing::warn!("No state machine diagram matched in {}", session.origin());
        }

        let project = session.project();
        for diagram in &diagrams {
            tracing::info!("Rendering diagram '{}'", diagram.name);
            match args.output {
                OutputFormat::Text => {
                    let mut walker = Walker::new(project, &mut *w).with_cycle_policy(policy);
                    walker.render_state_machine(diagram.state_machine())?;
                }
                OutputFormat::Dot => {
                    crate::cli::output::output_dot(w, project, diagram.state_machine())?;
                }
            }
        }

        let rendered = diagrams.len();
        session.close();
        Ok(rendered)
    }
}

/// List command implementation
pub mod list {
    use super::*;

    /// Execute the list command
    pub async fn execute(model: Option<PathBuf>, config: &Config, w: &mut impl Write) -> Result<()> {
        let accessor = ProjectAccessor::new();
        let session = open_model(&accessor, model, config).await?;

        for element in session.project().elements() {
            writeln!(w, "{}", element)?;
        }

        session.close();
        Ok(())
    }
}

/// Check command implementation
pub mod check {
    use super::*;
    use crate::Error;
    use crate::analysis::{NestingGraph, analyze};

    /// Execute the check command
    pub async fn execute(
        model: Option<PathBuf>,
        json: bool,
        config: &Config,
        w: &mut impl Write,
    ) -> Result<()> {
        let accessor = ProjectAccessor::new();
        let session = open_model(&accessor, model, config).await?;
        let project = session.project();
        let stats = analyze(project);
        let nesting = NestingGraph::build(project);
        let cycle: Option<Vec<String>> = nesting.has_cycle().then(|| {
            nesting
                .cycle_path()
                .unwrap_or_default()
                .into_iter()
                .filter_map(|id| project.machine(id))
                .map(|m| m.name.clone())
                .collect()
        });

        if json {
            crate::cli::output::output_stats_json(w, &stats)?;
        } else {
            crate::cli::output::output_stats_table(
                w,
                &project.name,
                session.origin(),
                &stats,
            )?;
        }

        session.close();

        match cycle {
            Some(path) => Err(Error::CyclicNesting { path }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{OutputFormat, ShowArgs};
    use crate::source::ModelSource;
    use crate::walker::{CyclePolicy, render_to_string};

    const CYCLIC: &str = r#"{
        "elements": [ { "name": "Statemachine Diagram", "kind": "state_machine_diagram", "state_machine": "a" } ],
        "state_machines": [
            { "id": "a", "name": "A", "vertices": [ { "id": "x", "kind": "state", "name": "X", "submachine": "b" } ] },
            { "id": "b", "name": "B", "vertices": [ { "id": "y", "kind": "state", "name": "Y", "submachine": "a" } ] }
        ]
    }"#;

    fn write_model(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_show_defaults_render_sample() {
        let mut out = Vec::new();
        let rendered = show::execute(ShowArgs::default(), &Config::default(), &mut out)
            .await
            .unwrap();
        assert_eq!(rendered, 1);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("start \n"));
        assert!(text.contains("found sub vertex"));
        assert!(text.contains("found sub machine"));
        assert!(text.contains("vertex : Authorizing"));
        assert!(text.ends_with("end.\n"));
    }

    #[tokio::test]
    async fn test_show_matches_direct_walk() {
        let mut out = Vec::new();
        show::execute(ShowArgs::default(), &Config::default(), &mut out)
            .await
            .unwrap();

        let project = crate::source::EmbeddedSource.load().await.unwrap();
        let order = project.machine_by_key("order").unwrap();
        let direct = render_to_string(&project, order, CyclePolicy::Fail).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), direct);
    }

    #[tokio::test]
    async fn test_show_without_match_is_not_an_error() {
        let args = ShowArgs {
            diagram: Some("No Such Diagram".into()),
            ..ShowArgs::default()
        };
        let mut out = Vec::new();
        let rendered = show::execute(args, &Config::default(), &mut out).await.unwrap();
        assert_eq!(rendered, 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_show_pattern_renders_every_diagram() {
        let args = ShowArgs {
            pattern: Some("Diagram$".into()),
            ..ShowArgs::default()
        };
        let mut out = Vec::new();
        let rendered = show::execute(args, &Config::default(), &mut out).await.unwrap();
        assert_eq!(rendered, 2);
    }

    #[tokio::test]
    async fn test_show_cycle_policy_from_config_and_flag() {
        let file = write_model(CYCLIC);
        let args = || ShowArgs {
            model: Some(file.path().to_path_buf()),
            ..ShowArgs::default()
        };

        let mut out = Vec::new();
        let err = show::execute(args(), &Config::default(), &mut out)
            .await
            .unwrap_err();
        assert!(err.is_cycle());
        // partial output stays written
        assert!(String::from_utf8(out).unwrap().contains("found sub machine"));

        let mut config = Config::default();
        config.walker.on_cycle = CyclePolicy::Skip;
        let mut out = Vec::new();
        show::execute(args(), &config, &mut out).await.unwrap();
        assert!(String::from_utf8(out).unwrap().contains("cycle detected: A"));

        let mut out = Vec::new();
        let flagged = ShowArgs {
            on_cycle: Some(CyclePolicy::Fail),
            ..args()
        };
        assert!(show::execute(flagged, &config, &mut out).await.is_err());
    }

    #[tokio::test]
    async fn test_show_dot_output() {
        let args = ShowArgs {
            output: OutputFormat::Dot,
            ..ShowArgs::default()
        };
        let mut out = Vec::new();
        show::execute(args, &Config::default(), &mut out).await.unwrap();
        let dot = String::from_utf8(out).unwrap();
        assert!(dot.starts_with("digraph StateMachine {"));
        assert!(dot.contains("cluster_0"));
    }

    #[tokio::test]
    async fn test_list_elements() {
        let mut out = Vec::new();
        list::execute(None, &Config::default(), &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("state_machine_diagram\tStatemachine Diagram\n"));
        assert!(text.contains("package\tDomain\n"));
        assert_eq!(text.lines().count(), 5);
    }

    #[tokio::test]
    async fn test_check_sample_and_cycle() {
        let mut out = Vec::new();
        check::execute(None, false, &Config::default(), &mut out)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("State machines: 2"));

        let file = write_model(CYCLIC);
        let mut out = Vec::new();
        let err = check::execute(Some(file.path().to_path_buf()), true, &Config::default(), &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cyclic submachine nesting: A -> B -> A");
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["cyclic_machines"], serde_json::json!(["A", "B"]));
    }

    #[tokio::test]
    async fn test_missing_model_file() {
        let args = ShowArgs {
            model: Some(PathBuf::from("/definitely/not/here.json")),
            ..ShowArgs::default()
        };
        let mut out = Vec::new();
        let err = show::execute(args, &Config::default(), &mut out).await.unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
