//! Vertex representation

use crate::model::MachineId;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a vertex inside a [`Project`](crate::model::Project)
pub type VertexId = NodeIndex;

/// A node of a state machine: either a state or a pseudostate
#[derive(Debug, Clone)]
pub enum Vertex {
    State(State),
    Plain(PlainVertex),
}

/// A state, possibly composite (sub-vertices) or a submachine state
#[derive(Debug, Clone)]
pub struct State {
    pub key: String,
    pub name: String,
    pub kind: StateKind,
    pub sub_vertices: Vec<VertexId>,
    pub submachine: Option<MachineId>,
}

/// A vertex that is not a state (initial, choice, history, ...)
#[derive(Debug, Clone)]
pub struct PlainVertex {
    pub key: String,
    pub name: String,
    pub kind: PseudoKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    #[default]
    Simple,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PseudoKind {
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

impl StateKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            StateKind::Simple => "State",
            StateKind::Final => "Final State",
        }
    }
}

impl PseudoKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PseudoKind::Initial => "Initial Pseudostate",
            PseudoKind::Choice => "Choice Pseudostate",
            PseudoKind::Junction => "Junction Pseudostate",
            PseudoKind::Fork => "Fork Pseudostate",
            PseudoKind::Join => "Join Pseudostate",
            PseudoKind::ShallowHistory => "Shallow History Pseudostate",
            PseudoKind::DeepHistory => "Deep History Pseudostate",
            PseudoKind::EntryPoint => "Entry Point Pseudostate",
            PseudoKind::ExitPoint => "Exit Point Pseudostate",
            PseudoKind::Terminate => "Terminate Pseudostate",
        }
    }
}

impl State {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind: StateKind::Simple,
            sub_vertices: Vec::new(),
            submachine: None,
        }
    }

    pub fn with_kind(mut self, kind: StateKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_submachine(mut self, machine: MachineId) -> Self {
        self.submachine = Some(machine);
        self
    }
}

impl PlainVertex {
    pub fn new(key: impl Into<String>, name: impl Into<String>, kind: PseudoKind) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind,
        }
    }
}

impl Vertex {
    /// Identifier the vertex was declared with in the project file
    pub fn key(&self) -> &str {
        match self {
            Vertex::State(s) => &s.key,
            Vertex::Plain(p) => &p.key,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Vertex::State(s) => &s.name,
            Vertex::Plain(p) => &p.name,
        }
    }

    pub fn as_state(&self) -> Option<&State> {
        match self {
            Vertex::State(s) => Some(s),
            Vertex::Plain(_) => None,
        }
    }

    pub fn is_state(&self) -> bool {
        matches!(self, Vertex::State(_))
    }

    /// Name used in reports: the vertex name, or the kind when unnamed
    pub fn label(&self) -> &str {
        let name = self.name();
        if !name.is_empty() {
            return name;
        }
        match self {
            Vertex::State(s) => s.kind.display_name(),
            Vertex::Plain(p) => p.kind.display_name(),
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}
