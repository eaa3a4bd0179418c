//! Diagram walker
//!
//! Depth-first text report of a state machine: its states, its vertices with
//! their incoming and outgoing transitions, its transitions, and everything
//! nested below composite states and submachine states.
//!
//! The report layout is fixed:
//!
//! ```text
//! start
//! -----------------------
//! State start.
//! ...
//! State end.
//! -----------------------
//! Vertex start.
//! ----
//! vertex : Idle
//! ----
//! incoming start.
//! ...
//! incoming end.
//! ----
//! outgoing start.
//! ...
//! outgoing end.
//! ----
//! Vertex end.
//! -----------------------
//! Transition start.
//! transition : Idle -> Busy : start
//! Transition end.
//! -----------------------
//! end.
//! ```

use crate::model::{MachineId, Project, StateMachine, TransitionId, Vertex, VertexId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::Write;

pub const SEPARATOR: &str = "-----------------------";
pub const MINI_SEPARATOR: &str = "----";

/// What to do when a submachine refers back to a machine being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Abort the walk with [`Error::CyclicNesting`]
    #[default]
    Fail,
    /// Log a warning, write a `cycle detected` line and keep going
    Skip,
}

/// Renders state machines of one project to a writer
pub struct Walker<'p, W: Write> {
    project: &'p Project,
    out: W,
    policy: CyclePolicy,

    /// Machines currently being rendered, outermost first.
    active: Vec<MachineId>,
}

impl<'p, W: Write> Walker<'p, W> {
    pub fn new(project: &'p Project, out: W) -> Self {
        Self {
            project,
            out,
            policy: CyclePolicy::default(),
            active: Vec::new(),
        }
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render_state_machine(&mut self, machine: MachineId) -> Result<()> {
        let m = self.machine(machine)?;
        if self.active.contains(&machine) {
            return self.flag_cycle(m);
        }

        tracing::debug!(depth = self.active.len(), "Rendering state machine '{}'", m.name);
        self.active.push(machine);
        let result = self.render_machine_sections(machine);
        self.active.pop();
        result
    }

    fn render_machine_sections(&mut self, machine: MachineId) -> Result<()> {
        self.line("start ")?;
        self.line(SEPARATOR)?;
        self.render_states(machine)?;
        self.line(SEPARATOR)?;
        self.render_vertices(machine)?;
        self.line(SEPARATOR)?;
        self.render_transitions(machine)?;
        self.line(SEPARATOR)?;
        self.line("end.")
    }

    pub fn render_states(&mut self, machine: MachineId) -> Result<()> {
        self.machine(machine)?;
        self.line("State start.")?;
        for v in self.project.states(machine) {
            let state = self.vertex(v)?;
            self.line(state)?;
        }
        self.line("State end.")
    }

    pub fn render_vertices(&mut self, machine: MachineId) -> Result<()> {
        let m = self.machine(machine)?;
        self.line("Vertex start.")?;
        for &v in &m.vertices {
            self.render_vertex(v)?;
        }
        self.line("Vertex end.")
    }

    pub fn render_vertex(&mut self, vertex: VertexId) -> Result<()> {
        let v = self.vertex(vertex)?;
        self.line(MINI_SEPARATOR)?;
        self.line(format_args!("vertex : {}", v))?;
        self.line(MINI_SEPARATOR)?;
        self.render_incoming(vertex)?;
        self.line(MINI_SEPARATOR)?;
        self.render_outgoing(vertex)?;

        if let Vertex::State(state) = v {
            for &sub in &state.sub_vertices {
                self.line(MINI_SEPARATOR)?;
                self.line("found sub vertex")?;
                self.render_vertex(sub)?;
                self.line(MINI_SEPARATOR)?;
            }
            if let Some(submachine) = state.submachine {
                self.line(MINI_SEPARATOR)?;
                self.line("found sub machine")?;
                self.render_state_machine(submachine)?;
            }
        }
        self.line(MINI_SEPARATOR)
    }

    pub fn render_incoming(&mut self, vertex: VertexId) -> Result<()> {
        self.vertex(vertex)?;
        self.line("incoming start.")?;
        for t in self.project.incoming(vertex) {
            self.transition_line(t, "")?;
        }
        self.line("incoming end.")
    }

    pub fn render_outgoing(&mut self, vertex: VertexId) -> Result<()> {
        self.vertex(vertex)?;
        self.line("outgoing start.")?;
        for t in self.project.outgoing(vertex) {
            self.transition_line(t, "")?;
        }
        self.line("outgoing end.")
    }

    pub fn render_transitions(&mut self, machine: MachineId) -> Result<()> {
        let m = self.machine(machine)?;
        self.line("Transition start.")?;
        for &t in &m.transitions {
            self.transition_line(t, "transition : ")?;
        }
        self.line("Transition end.")
    }

    fn flag_cycle(&mut self, machine: &StateMachine) -> Result<()> {
        let project = self.project;
        let mut path: Vec<String> = self
            .active
            .iter()
            .filter_map(|&id| project.machine(id))
            .map(|m| m.name.clone())
            .collect();
        path.push(machine.name.clone());

        match self.policy {
            CyclePolicy::Fail => Err(Error::CyclicNesting { path }),
            CyclePolicy::Skip => {
                tracing::warn!("Submachine cycle skipped: {}", path.join(" -> "));
                self.line(format_args!("cycle detected: {}", machine.name))
            }
        }
    }

    fn machine(&self, id: MachineId) -> Result<&'p StateMachine> {
        let project = self.project;
        project.machine(id).ok_or_else(|| {
            Error::invalid_argument(format!(
                "state machine {} is not part of project '{}'",
                id, project.name
            ))
        })
    }

    fn vertex(&self, id: VertexId) -> Result<&'p Vertex> {
        let project = self.project;
        project.vertex(id).ok_or_else(|| {
            Error::invalid_argument(format!(
                "vertex {} is not part of project '{}'",
                id.index(),
                project.name
            ))
        })
    }

    fn transition_line(&mut self, id: TransitionId, prefix: &str) -> Result<()> {
        let project = self.project;
        let Some(t) = project.transition(id) else {
            return Err(Error::lookup(format!("transition {:?} not found", id)));
        };
        self.line(format_args!("{}{}", prefix, t))
    }

    fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}

/// Render one state machine into a string
pub fn render_to_string(
    project: &Project,
    machine: MachineId,
    policy: CyclePolicy,
) -> Result<String> {
    let mut walker = Walker::new(project, Vec::new()).with_cycle_policy(policy);
    walker.render_state_machine(machine)?;
    String::from_utf8(walker.into_inner()).map_err(|e| Error::Other(e.into()))
}
