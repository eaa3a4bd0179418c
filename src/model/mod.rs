//! Model module - Read-only state machine model
//!
//! A [`Project`] owns every state machine, vertex and transition loaded from
//! a project file. Everything handed out from here is an immutable view or a
//! copyable handle; nothing in the crate mutates a project after loading.

pub mod element;
pub mod loader;
pub mod project;
pub mod transition;
pub mod vertex;

// Re-export key types
pub use element::{ElementKind, NamedElement, StateMachineDiagram};
pub use loader::{ProjectFile, ProjectFormat};
pub use project::{MachineId, Project, StateMachine};
pub use transition::{Transition, TransitionId, Trigger};
pub use vertex::{PlainVertex, PseudoKind, State, StateKind, Vertex, VertexId};
