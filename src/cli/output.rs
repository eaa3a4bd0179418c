//! Output formatting module
//!
//! This module handles the non-walk outputs: Graphviz export of a state
//! machine and the `check` statistics.

use crate::Result;
use crate::analysis::ModelStats;
use crate::model::{MachineId, Project, PseudoKind, StateKind, Vertex};
use std::collections::{HashSet, VecDeque};
use std::io::Write;

/// Output a state machine, its nested vertices and every reachable
/// submachine as a DOT digraph
pub fn output_dot(w: &mut impl Write, project: &Project, machine: MachineId) -> Result<()> {
    writeln!(w, "digraph StateMachine {{")?;
    writeln!(w, "  rankdir=LR;")?;
    writeln!(w, "  node [shape=box, style=rounded];")?;

    let mut queue = VecDeque::from([machine]);
    let mut visited = HashSet::new();
    let mut edges = Vec::new();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        let Some(m) = project.machine(id) else {
            continue;
        };

        writeln!(w)?;
        writeln!(w, "  subgraph cluster_{} {{", id.0)?;
        writeln!(w, "    label=\"{}\";", escape(&m.name))?;
        for v in project.all_vertices(id) {
            let Some(vertex) = project.vertex(v) else {
                continue;
            };
            writeln!(
                w,
                "    v{} [label=\"{}\", shape={}];",
                v.index(),
                escape(vertex.label()),
                shape(vertex)
            )?;

            if let Vertex::State(state) = vertex
                && let Some(sub) = state.submachine
            {
                if let Some(&entry) = project.machine(sub).and_then(|s| s.vertices.first()) {
                    edges.push(format!(
                        "  v{} -> v{} [style=dashed, label=\"submachine\"];",
                        v.index(),
                        entry.index()
                    ));
                }
                queue.push_back(sub);
            }
        }
        writeln!(w, "  }}")?;

        for &t in &m.transitions {
            if let (Some((from, to)), Some(transition)) =
                (project.graph.edge_endpoints(t), project.transition(t))
            {
                let label = transition.trigger.to_string();
                if label.is_empty() {
                    edges.push(format!("  v{} -> v{};", from.index(), to.index()));
                } else {
                    edges.push(format!(
                        "  v{} -> v{} [label=\"{}\"];",
                        from.index(),
                        to.index(),
                        escape(&label)
                    ));
                }
            }
        }
    }

    writeln!(w)?;
    for edge in edges {
        writeln!(w, "{}", edge)?;
    }
    writeln!(w, "}}")?;
    Ok(())
}

fn shape(vertex: &Vertex) -> &'static str {
    match vertex {
        Vertex::State(s) if s.kind == StateKind::Final => "doublecircle",
        Vertex::State(_) => "box",
        Vertex::Plain(p) => match p.kind {
            PseudoKind::Initial => "point",
            PseudoKind::Choice => "diamond",
            PseudoKind::Fork | PseudoKind::Join => "rect",
            PseudoKind::Terminate => "Msquare",
            _ => "circle",
        },
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Output model statistics as JSON
pub fn output_stats_json(w: &mut impl Write, stats: &ModelStats) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, stats)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output model statistics as a text report
pub fn output_stats_table(
    w: &mut impl Write,
    name: &str,
    origin: &str,
    stats: &ModelStats,
) -> Result<()> {
    writeln!(w, "📋 Model Check Report")?;
    writeln!(w, "{}", "━".repeat(43))?;
    writeln!(w, "Model: {} ({})", name, origin)?;
    writeln!(w)?;
    writeln!(w, "  State machines: {}", stats.machines)?;
    writeln!(w, "  States:         {}", stats.states)?;
    writeln!(w, "  Pseudostates:   {}", stats.pseudostates)?;
    writeln!(w, "  Transitions:    {}", stats.transitions)?;
    match stats.max_nesting_depth {
        Some(depth) => writeln!(w, "  Max nesting:    {}", depth)?,
        None => writeln!(w, "  Max nesting:    unbounded (cyclic)")?,
    }
    writeln!(w)?;

    if stats.cyclic_machines.is_empty() {
        writeln!(w, "✅ No submachine cycles")?;
    } else {
        writeln!(w, "❌ Submachine nesting cycle through:")?;
        for name in &stats.cyclic_machines {
            writeln!(w, "   {}", name)?;
        }
    }
    Ok(())
}
