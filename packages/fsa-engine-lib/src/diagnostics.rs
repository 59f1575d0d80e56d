use std::collections::VecDeque;

use hashbrown::HashSet;
use itertools::Itertools;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, symbol::Symbol},
    error::{EngineResult, InvariantViolation},
};

/// Summary numbers about a machine, as shown in the editor's statistics
/// panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatistics {
    pub total_states: usize,
    pub accepting_states: usize,
    pub total_transitions: usize,
    /// Transitions per ordered pair of states, `0` without states.
    pub density: f64,
    pub connected: bool,
    pub deterministic: bool,
}

impl NetworkStatistics {
    pub fn of(automaton: &Automaton) -> Self {
        let total_states = automaton.state_count();
        let total_transitions = automaton.transition_count();
        let density = if total_states == 0 {
            0.0
        } else {
            total_transitions as f64 / (total_states * total_states) as f64
        };

        NetworkStatistics {
            total_states,
            accepting_states: automaton.accepting_states().count(),
            total_transitions,
            density,
            connected: is_connected(automaton),
            deterministic: is_deterministic(automaton),
        }
    }
}

/// Checks that every state can be reached by forward transitions from the
/// first state that was added. An automaton without states is connected.
pub fn is_connected(automaton: &Automaton) -> bool {
    match automaton.ordered_nodes().first() {
        Some(&reference) => reachable_from(automaton, reference).len() == automaton.state_count(),
        None => true,
    }
}

/// Like [`is_connected`], with the reference state given by id.
pub fn is_connected_from(automaton: &Automaton, reference: &str) -> EngineResult<bool> {
    let node = automaton.node(reference)?;
    Ok(reachable_from(automaton, node).len() == automaton.state_count())
}

/// Ids of the states that cannot be reached from the given state.
pub fn unreachable_states(automaton: &Automaton, reference: &str) -> EngineResult<Vec<String>> {
    let node = automaton.node(reference)?;
    let reachable = reachable_from(automaton, node);

    Ok(automaton
        .ordered_nodes()
        .into_iter()
        .filter(|node| !reachable.contains(node))
        .map(|node| automaton.state_at(node).id.clone())
        .collect_vec())
}

fn reachable_from(automaton: &Automaton, reference: NodeIndex) -> HashSet<NodeIndex> {
    let mut visited: HashSet<NodeIndex> = HashSet::from([reference]);
    let mut queue = VecDeque::from([reference]);

    while let Some(node) = queue.pop_front() {
        for (_, target) in automaton.outgoing(node) {
            if visited.insert(target) {
                queue.push_back(target);
            }
        }
    }

    visited
}

/// Checks that the machine is labelled deterministic and that its
/// transitions really are: no epsilon moves and at most one transition per
/// state and symbol.
pub fn is_deterministic(automaton: &Automaton) -> bool {
    automaton.is_deterministic_kind() && determinism_conflicts(automaton).is_empty()
}

/// The `(state id, symbol)` pairs that break determinism, in stored order.
/// An epsilon transition is always a conflict.
pub fn determinism_conflicts(automaton: &Automaton) -> Vec<(String, Symbol)> {
    let mut seen = HashSet::new();
    let mut conflicts = vec![];

    for transition in automaton.transitions() {
        let key = (transition.source.id.as_str(), transition.symbol);
        if transition.symbol.is_epsilon() || !seen.insert(key) {
            conflicts.push((transition.source.id.clone(), transition.symbol));
        }
    }

    conflicts
}

/// Fails with the first entry of [`determinism_conflicts`], if any.
pub fn ensure_deterministic(automaton: &Automaton) -> EngineResult<()> {
    match determinism_conflicts(automaton).into_iter().next() {
        Some((state, symbol)) => {
            Err(InvariantViolation::ConflictingTransitions { state, symbol }.into())
        }
        None => Ok(()),
    }
}
