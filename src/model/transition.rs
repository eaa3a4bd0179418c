//! Transition representation

use petgraph::stable_graph::EdgeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a transition inside a [`Project`](crate::model::Project)
pub type TransitionId = EdgeIndex;

/// A directed edge between two vertices
///
/// `source` and `target` hold the report labels of the endpoints, resolved
/// when the transition is added to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub trigger: Trigger,
}

/// Event, guard and effect of a transition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub guard: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl Trigger {
    pub fn is_empty(&self) -> bool {
        self.event.is_none() && self.guard.is_none() && self.action.is_none()
    }
}

/// UML trigger label: `event[guard]/action`, only the parts that are set
impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(event) = &self.event {
            f.write_str(event)?;
        }
        if let Some(guard) = &self.guard {
            write!(f, "[{}]", guard)?;
        }
        if let Some(action) = &self.action {
            write!(f, "/{}", action)?;
        }
        Ok(())
    }
}

impl Transition {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            trigger: Trigger::default(),
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)?;
        if !self.trigger.is_empty() {
            write!(f, " : {}", self.trigger)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_transition_display() {
        let t = Transition::new("Idle", "Busy");
        assert_eq!(t.to_string(), "Idle -> Busy");
    }

    #[test]
    fn test_full_transition_display() {
        let t = Transition::new("Idle", "Busy").with_trigger(Trigger {
            event: Some("start".into()),
            guard: Some("ready".into()),
            action: Some("log".into()),
        });
        assert_eq!(t.to_string(), "Idle -> Busy : start[ready]/log");
    }

    #[test]
    fn test_partial_trigger() {
        let t = Transition::new("A", "B").with_trigger(Trigger {
            guard: Some("x > 0".into()),
            ..Trigger::default()
        });
        assert_eq!(t.trigger.to_string(), "[x > 0]");
        assert_eq!(t.to_string(), "A -> B : [x > 0]");
    }
}
