use crate::automaton::serialization::{MachineData, StateData, TransitionData};

/// A preset machine that the editor can load in place of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    BinaryCounter,
    EvenNumberOfOnes,
}

impl Template {
    pub const ALL: [Template; 2] = [Template::BinaryCounter, Template::EvenNumberOfOnes];

    pub fn name(&self) -> &'static str {
        match self {
            Template::BinaryCounter => "Binary Counter",
            Template::EvenNumberOfOnes => "Even Number of 1s",
        }
    }

    /// Looks a template up by its display name or a short slug
    /// (`binary-counter`, `even-ones`).
    pub fn from_name(name: &str) -> Option<Template> {
        let normalized = name.trim().to_lowercase();
        Template::ALL.into_iter().find(|t| {
            t.name().to_lowercase() == normalized || t.slug() == normalized
        })
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Template::BinaryCounter => "binary-counter",
            Template::EvenNumberOfOnes => "even-ones",
        }
    }

    /// The template in the persisted format. The first state is the start
    /// state.
    pub fn machine_data(&self) -> MachineData {
        match self {
            // q0 -0-> q1 -1-> q2 -0-> q0
            Template::BinaryCounter => build(
                &[
                    ("q0", "Start", 100.0, 150.0, false),
                    ("q1", "State 1", 300.0, 150.0, false),
                    ("q2", "Accept", 500.0, 150.0, true),
                ],
                &[("q0", "q1", "0"), ("q1", "q2", "1"), ("q2", "q0", "0")],
            ),
            Template::EvenNumberOfOnes => build(
                &[
                    ("e0", "Even", 200.0, 150.0, true),
                    ("e1", "Odd", 500.0, 150.0, false),
                ],
                &[
                    ("e0", "e0", "0"),
                    ("e0", "e1", "1"),
                    ("e1", "e1", "0"),
                    ("e1", "e0", "1"),
                ],
            ),
        }
    }
}

fn build(
    states: &[(&str, &str, f64, f64, bool)],
    transitions: &[(&str, &str, &str)],
) -> MachineData {
    let label_of = |id: &str| {
        states
            .iter()
            .find(|(sid, ..)| *sid == id)
            .map(|(_, label, ..)| label.to_string())
    };

    MachineData {
        machine_type: Some("DFA".to_string()),
        start_state: states.first().map(|(id, ..)| id.to_string()),
        states: states
            .iter()
            .map(|&(id, label, x, y, is_accepting)| StateData {
                id: id.to_string(),
                label: label.to_string(),
                x,
                y,
                is_accepting,
            })
            .collect(),
        transitions: transitions
            .iter()
            .map(|&(from, to, label)| TransitionData {
                source_id: from.to_string(),
                target_id: to.to_string(),
                label: label.to_string(),
                source: label_of(from),
                target: label_of(to),
            })
            .collect(),
    }
}
