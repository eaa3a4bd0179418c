//! Named model elements and diagram narrowing

use crate::model::MachineId;
use std::fmt;

/// A top-level element of a project that can be searched by name
#[derive(Debug, Clone)]
pub struct NamedElement {
    pub name: String,
    pub kind: ElementKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    StateMachineDiagram { machine: MachineId },
    ClassDiagram,
    Class,
    Package,
    Other(String),
}

/// View of a [`NamedElement`] known to be a state machine diagram
#[derive(Debug, Clone, Copy)]
pub struct StateMachineDiagram<'p> {
    pub name: &'p str,
    machine: MachineId,
}

impl<'p> StateMachineDiagram<'p> {
    /// The state machine shown on this diagram
    pub fn state_machine(&self) -> MachineId {
        self.machine
    }
}

impl NamedElement {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Narrow this element to a state machine diagram, if it is one
    pub fn as_state_machine_diagram(&self) -> Option<StateMachineDiagram<'_>> {
        match self.kind {
            ElementKind::StateMachineDiagram { machine } => Some(StateMachineDiagram {
                name: &self.name,
                machine,
            }),
            _ => None,
        }
    }
}

impl ElementKind {
    pub fn display_name(&self) -> &str {
        match self {
            ElementKind::StateMachineDiagram { .. } => "state_machine_diagram",
            ElementKind::ClassDiagram => "class_diagram",
            ElementKind::Class => "class",
            ElementKind::Package => "package",
            ElementKind::Other(kind) => kind,
        }
    }
}

impl fmt::Display for NamedElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.kind.display_name(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrowing() {
        let diagram = NamedElement::new(
            "Statemachine Diagram",
            ElementKind::StateMachineDiagram {
                machine: MachineId(2),
            },
        );
        let narrowed = diagram.as_state_machine_diagram().unwrap();
        assert_eq!(narrowed.name, "Statemachine Diagram");
        assert_eq!(narrowed.state_machine(), MachineId(2));

        let package = NamedElement::new("Statemachine Diagram", ElementKind::Package);
        assert!(package.as_state_machine_diagram().is_none());
    }

    #[test]
    fn test_display() {
        let el = NamedElement::new("Order", ElementKind::Class);
        assert_eq!(el.to_string(), "class\tOrder");
        let el = NamedElement::new("Notes", ElementKind::Other("note".into()));
        assert_eq!(el.to_string(), "note\tNotes");
    }
}
