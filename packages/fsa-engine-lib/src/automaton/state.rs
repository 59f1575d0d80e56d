/// A state of an automaton.
///
/// The `id` is unique within its automaton and never changes. The `label` is
/// what traces report and is not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    pub id: String,
    pub label: String,
    pub accepting: bool,
    /// Insertion sequence number, used to iterate states in the order they
    /// were added even after arena slots get reused.
    pub(crate) seq: u64,
}

impl State {
    pub(crate) fn new(id: String, label: String, accepting: bool, seq: u64) -> Self {
        State {
            id,
            label,
            accepting,
            seq,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

/// Edge weight of the automaton graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct TransitionData {
    pub symbol: super::Symbol,
    pub seq: u64,
}

/// A borrowed view of a transition, resolved to state ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<'a> {
    pub source: &'a State,
    pub target: &'a State,
    pub symbol: super::Symbol,
}
