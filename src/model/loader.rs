//! Project file loading
//!
//! Project files are JSON (or TOML) documents listing the named elements of
//! a model and the state machines they refer to. Vertices nest inline under
//! their parent state; transitions and submachines refer to vertices and
//! machines by id. All references are resolved and checked here, so a loaded
//! [`Project`] never contains dangling handles.

use crate::model::{
    ElementKind, MachineId, NamedElement, PlainVertex, Project, PseudoKind, State, StateKind,
    Trigger, Vertex, VertexId,
};
use crate::{Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Supported project file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Json,
    Toml,
}

/// On-disk project document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub elements: Vec<ElementDef>,

    #[serde(default)]
    pub state_machines: Vec<MachineDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDef {
    pub name: String,
    pub kind: String,

    /// Only meaningful for `state_machine_diagram` elements
    pub state_machine: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineDef {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub vertices: Vec<VertexDef>,

    #[serde(default)]
    pub transitions: Vec<TransitionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexDef {
    pub id: String,
    pub kind: VertexKindDef,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub sub_vertices: Vec<VertexDef>,

    pub submachine: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexKindDef {
    State,
    Final,
    Initial,
    Choice,
    Junction,
    Fork,
    Join,
    ShallowHistory,
    DeepHistory,
    EntryPoint,
    ExitPoint,
    Terminate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionDef {
    pub source: String,
    pub target: String,

    #[serde(flatten)]
    pub trigger: Trigger,
}

impl VertexKindDef {
    fn state_kind(self) -> Option<StateKind> {
        match self {
            VertexKindDef::State => Some(StateKind::Simple),
            VertexKindDef::Final => Some(StateKind::Final),
            _ => None,
        }
    }

    fn pseudo_kind(self) -> Option<PseudoKind> {
        Some(match self {
            VertexKindDef::Initial => PseudoKind::Initial,
            VertexKindDef::Choice => PseudoKind::Choice,
            VertexKindDef::Junction => PseudoKind::Junction,
            VertexKindDef::Fork => PseudoKind::Fork,
            VertexKindDef::Join => PseudoKind::Join,
            VertexKindDef::ShallowHistory => PseudoKind::ShallowHistory,
            VertexKindDef::DeepHistory => PseudoKind::DeepHistory,
            VertexKindDef::EntryPoint => PseudoKind::EntryPoint,
            VertexKindDef::ExitPoint => PseudoKind::ExitPoint,
            VertexKindDef::Terminate => PseudoKind::Terminate,
            VertexKindDef::State | VertexKindDef::Final => return None,
        })
    }
}

impl ProjectFile {
    pub fn parse(contents: &str, format: ProjectFormat) -> Result<Self> {
        Ok(match format {
            ProjectFormat::Json => serde_json::from_str(contents)?,
            ProjectFormat::Toml => toml::from_str(contents)?,
        })
    }

    /// Resolve all references and build the in-memory project
    pub fn into_project(self) -> Result<Project> {
        let mut project = Project::new(self.name);

        // Machines first so submachine references can point forward.
        for def in &self.state_machines {
            ensure!(
                project.machine_by_key(&def.id).is_none(),
                "duplicate state machine id '{}'",
                def.id
            );
            let name = if def.name.is_empty() { &def.id } else { &def.name };
            project.add_machine(def.id.clone(), name.clone());
        }

        let mut seen = HashSet::new();
        for def in &self.state_machines {
            let machine = resolve_machine(&project, &def.id)?;
            for vertex in &def.vertices {
                add_vertex_tree(&mut project, machine, None, vertex, &mut seen)?;
            }
        }

        for def in &self.state_machines {
            let machine = resolve_machine(&project, &def.id)?;
            let owned: HashSet<VertexId> = project.all_vertices(machine).into_iter().collect();
            for t in &def.transitions {
                for end in [&t.source, &t.target] {
                    let Some(&idx) = project.vertex_index.get(end) else {
                        bail!("transition in '{}' refers to unknown vertex '{}'", def.id, end);
                    };
                    ensure!(
                        owned.contains(&idx),
                        "transition in '{}' refers to vertex '{}' of another state machine",
                        def.id,
                        end
                    );
                }
                project.add_transition(machine, &t.source, &t.target, t.trigger.clone());
            }
        }

        for el in self.elements {
            let kind = match el.kind.as_str() {
                "state_machine_diagram" => {
                    let Some(key) = el.state_machine.as_deref() else {
                        bail!("diagram '{}' does not name a state machine", el.name);
                    };
                    ElementKind::StateMachineDiagram {
                        machine: resolve_machine(&project, key)?,
                    }
                }
                "class_diagram" => ElementKind::ClassDiagram,
                "class" => ElementKind::Class,
                "package" => ElementKind::Package,
                other => ElementKind::Other(other.to_string()),
            };
            project.add_element(NamedElement::new(el.name, kind));
        }

        tracing::debug!(
            "Loaded project '{}': {} machines, {} vertices, {} transitions",
            project.name,
            self.state_machines.len(),
            project.graph.node_count(),
            project.graph.edge_count()
        );

        Ok(project)
    }
}

fn resolve_machine(project: &Project, key: &str) -> Result<MachineId> {
    match project.machine_by_key(key) {
        Some(id) => Ok(id),
        None => bail!("unknown state machine '{}'", key),
    }
}

fn add_vertex_tree(
    project: &mut Project,
    machine: MachineId,
    parent: Option<VertexId>,
    def: &VertexDef,
    seen: &mut HashSet<String>,
) -> Result<()> {
    ensure!(seen.insert(def.id.clone()), "duplicate vertex id '{}'", def.id);

    let vertex = match (def.kind.state_kind(), def.kind.pseudo_kind()) {
        (Some(kind), _) => {
            let mut state = State::new(def.id.clone(), def.name.clone()).with_kind(kind);
            if let Some(key) = &def.submachine {
                state = state.with_submachine(resolve_machine(project, key)?);
            }
            Vertex::State(state)
        }
        (None, Some(kind)) => {
            ensure!(
                def.sub_vertices.is_empty() && def.submachine.is_none(),
                "pseudostate '{}' cannot own sub-vertices or a submachine",
                def.id
            );
            Vertex::Plain(PlainVertex::new(def.id.clone(), def.name.clone(), kind))
        }
        (None, None) => bail!("vertex '{}' has no usable kind", def.id),
    };

    let idx = match parent {
        Some(parent) => project.add_sub_vertex(parent, vertex),
        None => project.add_vertex(machine, vertex),
    };
    let Some(idx) = idx else {
        bail!("could not place vertex '{}'", def.id);
    };

    for child in &def.sub_vertices {
        add_vertex_tree(project, machine, Some(idx), child, seen)?;
    }
    Ok(())
}
