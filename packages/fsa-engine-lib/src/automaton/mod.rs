use std::{fmt::Display, str::FromStr};

use hashbrown::HashMap;
use itertools::Itertools;
use petgraph::{
    Direction,
    stable_graph::{NodeIndex, StableDiGraph},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        state::{State, Transition, TransitionData},
        symbol::Symbol,
    },
    error::{EngineResult, InputError, InvariantViolation, StructuralError},
};

pub mod serialization;
pub mod state;
pub mod symbol;
pub mod templates;

/// The kind tag of a machine. It is set by the editor and decides which
/// transitions the model accepts; it is not a structural guarantee on its
/// own, see [`crate::diagnostics::is_deterministic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineKind {
    #[serde(rename = "DFA")]
    Deterministic,
    #[serde(rename = "NFA")]
    Nondeterministic,
}

impl MachineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineKind::Deterministic => "DFA",
            MachineKind::Nondeterministic => "NFA",
        }
    }
}

impl FromStr for MachineKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DFA" => Ok(MachineKind::Deterministic),
            "NFA" => Ok(MachineKind::Nondeterministic),
            _ => Err(InputError::UnknownMachineType(s.to_string())),
        }
    }
}

impl Display for MachineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A finite automaton as edited by the user.
///
/// States and transitions live in a stable arena, so indices stay valid
/// across removals. States are addressed by their string id from the outside.
/// Every mutating operation validates first and only then touches the graph,
/// so an `Err` leaves the automaton exactly as it was.
#[derive(Debug, Clone)]
pub struct Automaton {
    kind: MachineKind,
    graph: StableDiGraph<State, TransitionData>,
    ids: HashMap<String, NodeIndex>,
    start: Option<NodeIndex>,
    next_seq: u64,
}

impl Automaton {
    pub fn new(kind: MachineKind) -> Self {
        Automaton {
            kind,
            graph: StableDiGraph::new(),
            ids: HashMap::new(),
            start: None,
            next_seq: 0,
        }
    }

    pub fn deterministic() -> Self {
        Automaton::new(MachineKind::Deterministic)
    }

    pub fn nondeterministic() -> Self {
        Automaton::new(MachineKind::Nondeterministic)
    }

    pub fn kind(&self) -> MachineKind {
        self.kind
    }

    /// Changes the kind label. Existing transitions are kept as they are.
    pub fn set_kind(&mut self, kind: MachineKind) {
        self.kind = kind;
    }

    pub fn is_deterministic_kind(&self) -> bool {
        self.kind == MachineKind::Deterministic
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub fn add_state(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
    ) -> EngineResult<()> {
        let id = id.into();
        if self.ids.contains_key(&id) {
            return Err(StructuralError::DuplicateState(id).into());
        }

        let seq = self.next_seq();
        let node = self
            .graph
            .add_node(State::new(id.clone(), label.into(), false, seq));
        self.ids.insert(id, node);

        Ok(())
    }

    /// Removes a state together with every transition entering or leaving it.
    /// If it was the start state, the automaton no longer has one.
    pub fn remove_state(&mut self, id: &str) -> EngineResult<State> {
        let node = self.node(id)?;

        if self.start == Some(node) {
            self.start = None;
        }
        self.ids.remove(id);

        let removed = self
            .graph
            .remove_node(node)
            .ok_or_else(|| StructuralError::UnknownState(id.to_string()))?;

        tracing::debug!(state = %removed.id, "removed state and its incident transitions");

        Ok(removed)
    }

    pub fn set_label(&mut self, id: &str, label: impl Into<String>) -> EngineResult<()> {
        let node = self.node(id)?;
        self.graph[node].label = label.into();
        Ok(())
    }

    pub fn set_accepting(&mut self, id: &str, accepting: bool) -> EngineResult<()> {
        let node = self.node(id)?;
        self.graph[node].accepting = accepting;
        Ok(())
    }

    /// Flips the accepting flag of a state and returns the new value.
    pub fn toggle_accepting(&mut self, id: &str) -> EngineResult<bool> {
        let node = self.node(id)?;
        let state = &mut self.graph[node];
        state.accepting = !state.accepting;
        Ok(state.accepting)
    }

    pub fn set_start(&mut self, id: &str) -> EngineResult<()> {
        let node = self.node(id)?;
        self.start = Some(node);
        Ok(())
    }

    pub fn clear_start(&mut self) {
        self.start = None;
    }

    pub fn start_state(&self) -> Option<&State> {
        self.start.map(|node| &self.graph[node])
    }

    pub fn is_start(&self, id: &str) -> bool {
        self.start.is_some() && self.start == self.index_of(id)
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.index_of(id).map(|node| &self.graph[node])
    }

    pub fn contains_state(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// All states, in the order they were added.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.ordered_nodes().into_iter().map(|node| &self.graph[node])
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = &State> {
        self.states().filter(|state| state.accepting)
    }

    /// All transitions, in the order they were added.
    pub fn transitions(&self) -> Vec<Transition<'_>> {
        self.graph
            .edge_indices()
            .filter_map(|edge| {
                let (source, target) = self.graph.edge_endpoints(edge)?;
                Some((&self.graph[edge], source, target))
            })
            .sorted_by_key(|(data, _, _)| data.seq)
            .map(|(data, source, target)| Transition {
                source: &self.graph[source],
                target: &self.graph[target],
                symbol: data.symbol,
            })
            .collect_vec()
    }

    /// Adds a transition after checking it against the invariants of the
    /// current machine kind.
    pub fn add_transition(
        &mut self,
        source: &str,
        target: &str,
        symbol: Symbol,
    ) -> EngineResult<()> {
        let from = self.node(source)?;
        let to = self.node(target)?;

        if self
            .graph
            .edges_directed(from, Direction::Outgoing)
            .any(|edge| edge.target() == to && edge.weight().symbol == symbol)
        {
            return Err(InvariantViolation::DuplicateTransition {
                source_id: source.to_string(),
                target_id: target.to_string(),
                symbol: symbol.to_string(),
            }
            .into());
        }

        if self.is_deterministic_kind() {
            match symbol {
                Symbol::Epsilon => {
                    return Err(InvariantViolation::EpsilonOnDeterministic {
                        state: source.to_string(),
                    }
                    .into());
                }
                Symbol::Char(c) => {
                    if self.successor(from, c).is_some() {
                        return Err(InvariantViolation::DuplicateDeterministicTransition {
                            state: source.to_string(),
                            symbol: c,
                        }
                        .into());
                    }
                }
            }
        }

        let seq = self.next_seq();
        self.graph.add_edge(from, to, TransitionData { symbol, seq });

        Ok(())
    }

    /// Like [`Automaton::add_transition`], parsing the symbol from an editor
    /// label first.
    pub fn add_labeled_transition(
        &mut self,
        source: &str,
        target: &str,
        label: &str,
    ) -> EngineResult<()> {
        let symbol = label.parse::<Symbol>()?;
        self.add_transition(source, target, symbol)
    }

    pub fn remove_transition(
        &mut self,
        source: &str,
        target: &str,
        symbol: Symbol,
    ) -> EngineResult<()> {
        let from = self.node(source)?;
        let to = self.node(target)?;

        let edge = self
            .graph
            .edges_directed(from, Direction::Outgoing)
            .find(|edge| edge.target() == to && edge.weight().symbol == symbol)
            .map(|edge| edge.id())
            .ok_or_else(|| StructuralError::UnknownTransition {
                source_id: source.to_string(),
                target_id: target.to_string(),
                symbol: symbol.to_string(),
            })?;

        self.graph.remove_edge(edge);

        Ok(())
    }

    /// The set of non-epsilon symbols used by any transition, sorted.
    pub fn alphabet(&self) -> Vec<char> {
        self.graph
            .edge_indices()
            .filter_map(|edge| self.graph[edge].symbol.as_char())
            .sorted()
            .dedup()
            .collect_vec()
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    pub(crate) fn node(&self, id: &str) -> EngineResult<NodeIndex> {
        self.index_of(id)
            .ok_or_else(|| StructuralError::UnknownState(id.to_string()).into())
    }

    pub(crate) fn start_index(&self) -> Option<NodeIndex> {
        self.start
    }

    pub(crate) fn state_at(&self, node: NodeIndex) -> &State {
        &self.graph[node]
    }

    /// Node indices in insertion order.
    pub(crate) fn ordered_nodes(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .sorted_by_key(|node| self.graph[*node].seq)
            .collect_vec()
    }

    /// Outgoing transitions of a node as `(symbol, target)`, in insertion
    /// order.
    pub(crate) fn outgoing(&self, node: NodeIndex) -> Vec<(Symbol, NodeIndex)> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .sorted_by_key(|edge| edge.weight().seq)
            .map(|edge| (edge.weight().symbol, edge.target()))
            .collect_vec()
    }

    /// The first stored transition target for a character, if any.
    pub(crate) fn successor(&self, node: NodeIndex, letter: char) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|edge| edge.weight().symbol.matches(letter))
            .min_by_key(|edge| edge.weight().seq)
            .map(|edge| edge.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_nodes_survive_slot_reuse() {
        let mut automaton = Automaton::nondeterministic();
        automaton.add_state("a", "a").unwrap();
        automaton.add_state("b", "b").unwrap();
        automaton.remove_state("a").unwrap();
        automaton.add_state("c", "c").unwrap();

        let ids = automaton.states().map(|s| s.id.clone()).collect_vec();
        assert_eq!(ids, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn successor_prefers_first_stored_transition() {
        let mut automaton = Automaton::nondeterministic();
        automaton.add_state("q0", "q0").unwrap();
        automaton.add_state("q1", "q1").unwrap();
        automaton.add_state("q2", "q2").unwrap();
        automaton.add_transition("q0", "q2", 'a'.into()).unwrap();
        automaton.add_transition("q0", "q1", 'a'.into()).unwrap();

        let q0 = automaton.index_of("q0").unwrap();
        let q2 = automaton.index_of("q2").unwrap();
        assert_eq!(automaton.successor(q0, 'a'), Some(q2));
    }
}
