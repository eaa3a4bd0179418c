//! Model analysis
//!
//! Builds the submachine nesting graph of a project and derives statistics
//! from it. The walker itself never needs this; it backs the `check` command
//! and lets a model be validated before anything is rendered.

use crate::model::{MachineId, Project, Vertex};
use petgraph::algo::{is_cyclic_directed, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

/// Machines as nodes, an edge `a -> b` for each state of `a` (nested ones
/// included) that uses `b` as its submachine
pub struct NestingGraph {
    pub graph: DiGraph<MachineId, ()>,
}

/// Summary of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub machines: usize,
    pub states: usize,
    pub pseudostates: usize,
    pub transitions: usize,

    /// Longest chain of submachine nesting; `None` when nesting is cyclic
    pub max_nesting_depth: Option<usize>,

    /// Names of machines taking part in a nesting cycle
    pub cyclic_machines: Vec<String>,
}

impl NestingGraph {
    pub fn build(project: &Project) -> Self {
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = project.machines().map(|(id, _)| graph.add_node(id)).collect();

        for (id, _) in project.machines() {
            for v in project.all_vertices(id) {
                if let Some(Vertex::State(state)) = project.vertex(v)
                    && let Some(sub) = state.submachine
                {
                    graph.add_edge(nodes[id.0], nodes[sub.0], ());
                }
            }
        }

        Self { graph }
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Machines that sit on a nesting cycle, self-references included
    pub fn cyclic_machines(&self) -> Vec<MachineId> {
        let mut out: Vec<MachineId> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| self.is_cyclic_component(scc))
            .flatten()
            .map(|idx| self.graph[idx])
            .collect();
        out.sort();
        out
    }

    /// One nesting cycle as a closed path such as `[a, b, a]`, starting from
    /// the lowest machine id of its component
    pub fn cycle_path(&self) -> Option<Vec<MachineId>> {
        let scc = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| self.is_cyclic_component(scc))
            .min_by_key(|scc| scc.iter().map(|&n| self.graph[n]).min())?;
        let start = scc.iter().copied().min_by_key(|&n| self.graph[n])?;

        // every node of a cyclic component has a successor inside it
        let mut path = vec![start];
        let mut node = start;
        loop {
            let next = self
                .graph
                .neighbors(node)
                .filter(|n| scc.contains(n))
                .min_by_key(|&n| self.graph[n])?;
            if let Some(pos) = path.iter().position(|&n| n == next) {
                let mut path = path.split_off(pos);
                path.push(next);
                return Some(path.into_iter().map(|n| self.graph[n]).collect());
            }
            path.push(next);
            node = next;
        }
    }

    fn is_cyclic_component(&self, scc: &[NodeIndex]) -> bool {
        scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0])
    }

    /// Length of the longest submachine chain, `None` when cyclic
    pub fn max_depth(&self) -> Option<usize> {
        let order = toposort(&self.graph, None).ok()?;
        let mut depth = vec![0usize; self.graph.node_count()];
        // reverse topological order: children are settled before parents
        for &node in order.iter().rev() {
            depth[node.index()] = self
                .graph
                .neighbors(node)
                .map(|child| depth[child.index()] + 1)
                .max()
                .unwrap_or(0);
        }
        Some(depth.into_iter().max().unwrap_or(0))
    }
}

/// Collect statistics for a project
pub fn analyze(project: &Project) -> ModelStats {
    let nesting = NestingGraph::build(project);
    let states = project
        .graph
        .node_weights()
        .filter(|v| v.is_state())
        .count();

    ModelStats {
        machines: project.machines().count(),
        states,
        pseudostates: project.graph.node_count() - states,
        transitions: project.graph.edge_count(),
        max_nesting_depth: nesting.max_depth(),
        cyclic_machines: nesting
            .cyclic_machines()
            .into_iter()
            .filter_map(|id| project.machine(id))
            .map(|m| m.name.clone())
            .collect(),
    }
}
