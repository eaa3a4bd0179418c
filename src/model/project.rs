use crate::model::{NamedElement, Transition, Trigger, Vertex, VertexId, TransitionId};
use petgraph::Direction;
use petgraph::prelude::EdgeRef;
use petgraph::stable_graph::StableGraph;
use std::collections::HashMap;
use std::fmt;

/// Handle of a state machine inside a [`Project`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MachineId(pub usize);

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A state machine: its top-level vertices and its transitions, in declaration order
#[derive(Debug, Clone)]
pub struct StateMachine {
    pub key: String,
    pub name: String,
    pub vertices: Vec<VertexId>,
    pub transitions: Vec<TransitionId>,
}

/// A loaded, read-only state machine model.
///
/// Every vertex of every machine lives in one shared graph so that a
/// vertex's incoming and outgoing transitions are plain edge queries.
/// Machines only record which vertices sit at their top level and which
/// transitions they own; nested vertices hang off their parent state.
#[derive(Debug)]
pub struct Project {
    pub name: String,

    /// Vertices as nodes, transitions as edges.
    pub graph: StableGraph<Vertex, Transition>,

    /// Lookup from declared vertex id to graph node.
    pub vertex_index: HashMap<String, VertexId>,

    machines: Vec<StateMachine>,
    machine_index: HashMap<String, MachineId>,
    elements: Vec<NamedElement>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: StableGraph::new(),
            vertex_index: HashMap::new(),
            machines: Vec::new(),
            machine_index: HashMap::new(),
            elements: Vec::new(),
        }
    }

    /// Adds an empty state machine and returns its handle.
    pub fn add_machine(&mut self, key: impl Into<String>, name: impl Into<String>) -> MachineId {
        let key = key.into();
        let id = MachineId(self.machines.len());
        self.machine_index.insert(key.clone(), id);
        self.machines.push(StateMachine {
            key,
            name: name.into(),
            vertices: Vec::new(),
            transitions: Vec::new(),
        });
        id
    }

    /// Adds a vertex at the top level of `machine`.
    pub fn add_vertex(&mut self, machine: MachineId, vertex: Vertex) -> Option<VertexId> {
        self.machines.get(machine.0)?;
        let idx = self.insert_vertex(vertex);
        self.machines[machine.0].vertices.push(idx);
        Some(idx)
    }

    /// Adds a vertex nested inside the state `parent`.
    ///
    /// Returns `None` when `parent` is unknown or is not a state.
    pub fn add_sub_vertex(&mut self, parent: VertexId, vertex: Vertex) -> Option<VertexId> {
        if !self.graph.node_weight(parent)?.is_state() {
            return None;
        }
        let idx = self.insert_vertex(vertex);
        if let Some(Vertex::State(state)) = self.graph.node_weight_mut(parent) {
            state.sub_vertices.push(idx);
        }
        Some(idx)
    }

    fn insert_vertex(&mut self, vertex: Vertex) -> VertexId {
        let key = vertex.key().to_string();
        let idx = self.graph.add_node(vertex);
        self.vertex_index.insert(key, idx);
        idx
    }

    /// Adds a transition owned by `machine` between two declared vertex ids.
    pub fn add_transition(
        &mut self,
        machine: MachineId,
        from: &str,
        to: &str,
        trigger: Trigger,
    ) -> Option<TransitionId> {
        self.machines.get(machine.0)?;
        let (&from_idx, &to_idx) = (self.vertex_index.get(from)?, self.vertex_index.get(to)?);
        let transition = Transition::new(
            self.graph[from_idx].label().to_string(),
            self.graph[to_idx].label().to_string(),
        )
        .with_trigger(trigger);
        let edge = self.graph.add_edge(from_idx, to_idx, transition);
        self.machines[machine.0].transitions.push(edge);
        Some(edge)
    }

    pub fn add_element(&mut self, element: NamedElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[NamedElement] {
        &self.elements
    }

    pub fn machine(&self, id: MachineId) -> Option<&StateMachine> {
        self.machines.get(id.0)
    }

    pub fn machine_by_key(&self, key: &str) -> Option<MachineId> {
        self.machine_index.get(key).copied()
    }

    /// All machines with their handles, in declaration order
    pub fn machines(&self) -> impl Iterator<Item = (MachineId, &StateMachine)> {
        self.machines
            .iter()
            .enumerate()
            .map(|(idx, m)| (MachineId(idx), m))
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.graph.node_weight(id)
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.graph.edge_weight(id)
    }

    /// Top-level vertices of `machine` that are states, in vertex order
    pub fn states(&self, machine: MachineId) -> Vec<VertexId> {
        self.machine(machine)
            .map(|m| {
                m.vertices
                    .iter()
                    .copied()
                    .filter(|&v| self.graph.node_weight(v).is_some_and(Vertex::is_state))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Transitions ending at `vertex`, in declaration order
    pub fn incoming(&self, vertex: VertexId) -> Vec<TransitionId> {
        self.edges(vertex, Direction::Incoming)
    }

    /// Transitions leaving `vertex`, in declaration order
    pub fn outgoing(&self, vertex: VertexId) -> Vec<TransitionId> {
        self.edges(vertex, Direction::Outgoing)
    }

    fn edges(&self, vertex: VertexId, direction: Direction) -> Vec<TransitionId> {
        if !self.graph.contains_node(vertex) {
            return Vec::new();
        }
        // petgraph walks adjacency lists newest-first; edge indices grow with insertion.
        let mut edges: Vec<TransitionId> = self
            .graph
            .edges_directed(vertex, direction)
            .map(|edge| edge.id())
            .collect();
        edges.sort();
        edges
    }

    /// Every vertex of `machine`, nested ones included, depth-first
    pub fn all_vertices(&self, machine: MachineId) -> Vec<VertexId> {
        let mut out = Vec::new();
        if let Some(m) = self.machine(machine) {
            let mut stack: Vec<VertexId> = m.vertices.iter().rev().copied().collect();
            while let Some(v) = stack.pop() {
                out.push(v);
                if let Some(Vertex::State(state)) = self.graph.node_weight(v) {
                    stack.extend(state.sub_vertices.iter().rev().copied());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlainVertex, PseudoKind, State};

    fn sample() -> (Project, MachineId) {
        let mut project = Project::new("test");
        let m = project.add_machine("main", "Main");
        project
            .add_vertex(m, Vertex::Plain(PlainVertex::new("init", "", PseudoKind::Initial)))
            .unwrap();
        project.add_vertex(m, Vertex::State(State::new("a", "A"))).unwrap();
        project.add_vertex(m, Vertex::State(State::new("b", "B"))).unwrap();
        (project, m)
    }

    #[test]
    fn test_empty_project() {
        let project = Project::new("empty");
        assert_eq!(project.graph.node_count(), 0);
        assert_eq!(project.machines().count(), 0);
        assert!(project.machine(MachineId(0)).is_none());
    }

    #[test]
    fn test_states_are_subset_of_vertices() {
        let (project, m) = sample();
        assert_eq!(project.machine(m).unwrap().vertices.len(), 3);
        let states = project.states(m);
        assert_eq!(states.len(), 2);
        assert_eq!(project.vertex(states[0]).unwrap().name(), "A");
    }

    #[test]
    fn test_edges_keep_declaration_order() {
        let (mut project, m) = sample();
        let t1 = project.add_transition(m, "init", "a", Trigger::default()).unwrap();
        let t2 = project.add_transition(m, "a", "b", Trigger::default()).unwrap();
        let t3 = project.add_transition(m, "b", "a", Trigger::default()).unwrap();
        let t4 = project.add_transition(m, "a", "a", Trigger::default()).unwrap();

        let a = project.vertex_index["a"];
        assert_eq!(project.incoming(a), vec![t1, t3, t4]);
        assert_eq!(project.outgoing(a), vec![t2, t4]);
        assert_eq!(project.machine(m).unwrap().transitions, vec![t1, t2, t3, t4]);
        assert_eq!(
            project.transition(t1).unwrap().to_string(),
            "Initial Pseudostate -> A"
        );
    }

    #[test]
    fn test_unknown_endpoint_is_rejected() {
        let (mut project, m) = sample();
        assert!(project.add_transition(m, "a", "nope", Trigger::default()).is_none());
        assert!(project.machine(m).unwrap().transitions.is_empty());
    }

    #[test]
    fn test_sub_vertices_only_on_states() {
        let (mut project, m) = sample();
        let a = project.vertex_index["a"];
        let init = project.vertex_index["init"];

        let child = project
            .add_sub_vertex(a, Vertex::State(State::new("a.1", "A1")))
            .unwrap();
        assert!(project
            .add_sub_vertex(init, Vertex::State(State::new("x", "X")))
            .is_none());

        let state = project.vertex(a).unwrap().as_state().unwrap();
        assert_eq!(state.sub_vertices, vec![child]);
        // nested vertices are not top-level vertices of the machine
        assert_eq!(project.machine(m).unwrap().vertices.len(), 3);
        assert_eq!(project.all_vertices(m).len(), 4);
        assert_eq!(project.all_vertices(m)[2], child);
    }
}
