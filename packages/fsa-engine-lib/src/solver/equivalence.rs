use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, MachineKind, state::State},
    diagnostics::ensure_deterministic,
    error::{EngineResult, InvariantViolation, StructuralError},
    solver::{SolverResult, SolverStatus},
};

/// A state of the symmetric difference product. It is accepting iff exactly
/// one of the two paired states is accepting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductState {
    /// `"id1,id2"`
    pub id: String,
    /// `"label1,label2"`
    pub label: String,
    pub accepting: bool,
    /// Which machine accepts, if exactly one does.
    pub accepted_by: Option<u8>,
}

impl ProductState {
    fn join(first: &State, second: &State) -> Self {
        let accepted_by = match (first.accepting, second.accepting) {
            (true, false) => Some(1),
            (false, true) => Some(2),
            _ => None,
        };

        ProductState {
            id: format!("{},{}", first.id, second.id),
            label: format!("{},{}", first.label, second.label),
            accepting: accepted_by.is_some(),
            accepted_by,
        }
    }
}

/// The symmetric difference product of two deterministic machines, holding
/// only the pairs reachable from the pair of start states.
#[derive(Debug, Clone)]
pub struct ProductAutomaton {
    pub graph: DiGraph<ProductState, char>,
    start: NodeIndex,
}

impl ProductAutomaton {
    pub fn start(&self) -> &ProductState {
        &self.graph[self.start]
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn state(&self, id: &str) -> Option<&ProductState> {
        self.graph
            .node_indices()
            .map(|node| &self.graph[node])
            .find(|state| state.id == id)
    }

    /// Breadth first search from the start pair for an accepting pair.
    /// Returns the first one found together with the word leading to it,
    /// which is a shortest distinguishing word.
    pub fn find_accepting(&self) -> Option<(NodeIndex, String)> {
        let mut queue = VecDeque::from([self.start]);
        let mut visited: HashSet<NodeIndex> = HashSet::from([self.start]);
        let mut parents: HashMap<NodeIndex, (NodeIndex, char)> = HashMap::new();

        while let Some(node) = queue.pop_front() {
            if self.graph[node].accepting {
                return Some((node, self.word_to(node, &parents)));
            }

            for edge in self
                .graph
                .edges_directed(node, Direction::Outgoing)
                .sorted_by_key(|edge| *edge.weight())
            {
                if visited.insert(edge.target()) {
                    parents.insert(edge.target(), (node, *edge.weight()));
                    queue.push_back(edge.target());
                }
            }
        }

        None
    }

    fn word_to(&self, node: NodeIndex, parents: &HashMap<NodeIndex, (NodeIndex, char)>) -> String {
        let mut letters = vec![];
        let mut current = node;

        while let Some(&(parent, letter)) = parents.get(&current) {
            letters.push(letter);
            current = parent;
        }

        letters.iter().rev().collect()
    }
}

/// Evidence that two machines differ: a reachable product state where
/// exactly one machine accepts, and an input that leads there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub state_id: String,
    pub state_label: String,
    pub word: String,
    /// 1 or 2, the machine that accepts `word`.
    pub accepted_by: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceStatistics {
    pub alphabet_size: usize,
    pub product_states: usize,
    pub product_transitions: usize,
}

pub type EquivalenceResult = SolverResult<(), Witness, EquivalenceStatistics>;

impl EquivalenceResult {
    pub fn is_equivalent(&self) -> bool {
        self.is_success()
    }

    pub fn witness(&self) -> Option<&Witness> {
        match &self.status {
            SolverStatus::True(_) => None,
            SolverStatus::False(witness) => Some(witness),
        }
    }

    pub fn message(&self) -> String {
        match &self.status {
            SolverStatus::True(_) => "Analysis complete. The DFAs are equivalent.".to_string(),
            SolverStatus::False(witness) => format!(
                "DFAs are not equivalent - Found distinguishing state: {}",
                witness.state_label
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableEquivalenceResult {
    pub equivalent: bool,
    pub message: String,
    pub witness: Option<Witness>,
    pub statistics: EquivalenceStatistics,
}

impl From<&EquivalenceResult> for SerializableEquivalenceResult {
    fn from(result: &EquivalenceResult) -> Self {
        SerializableEquivalenceResult {
            equivalent: result.is_equivalent(),
            message: result.message(),
            witness: result.witness().cloned(),
            statistics: result.statistics.clone(),
        }
    }
}

/// Decides whether two deterministic machines accept the same language.
///
/// Both machines have to be complete over the union of their alphabets, which
/// is checked while the product is built.
#[derive(Debug)]
pub struct EquivalenceChecker<'a> {
    first: &'a Automaton,
    second: &'a Automaton,
    first_start: NodeIndex,
    second_start: NodeIndex,
    alphabet: Vec<char>,
}

impl<'a> EquivalenceChecker<'a> {
    pub fn new(first: &'a Automaton, second: &'a Automaton) -> EngineResult<Self> {
        if first.kind() != MachineKind::Deterministic
            || second.kind() != MachineKind::Deterministic
        {
            return Err(InvariantViolation::NotBothDeterministic.into());
        }
        ensure_deterministic(first)?;
        ensure_deterministic(second)?;

        let first_start = first
            .start_index()
            .ok_or(StructuralError::MissingStartState)?;
        let second_start = second
            .start_index()
            .ok_or(StructuralError::MissingStartState)?;

        let alphabet = first
            .alphabet()
            .into_iter()
            .chain(second.alphabet())
            .sorted()
            .dedup()
            .collect_vec();

        Ok(EquivalenceChecker {
            first,
            second,
            first_start,
            second_start,
            alphabet,
        })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Builds the reachable part of the product with a worklist, starting at
    /// the pair of start states.
    pub fn build_product(&self) -> EngineResult<ProductAutomaton> {
        let mut graph = DiGraph::new();
        let mut state_map = HashMap::new();

        let start = graph.add_node(ProductState::join(
            self.first.state_at(self.first_start),
            self.second.state_at(self.second_start),
        ));
        state_map.insert((self.first_start, self.second_start), start);

        let mut stack = vec![(self.first_start, self.second_start)];

        while let Some((state1, state2)) = stack.pop() {
            let current = state_map[&(state1, state2)];

            for &letter in &self.alphabet {
                let target1 = self.step(self.first, 1, state1, letter)?;
                let target2 = self.step(self.second, 2, state2, letter)?;

                let next = *state_map.entry((target1, target2)).or_insert_with(|| {
                    stack.push((target1, target2));
                    graph.add_node(ProductState::join(
                        self.first.state_at(target1),
                        self.second.state_at(target2),
                    ))
                });

                graph.add_edge(current, next, letter);
            }
        }

        tracing::debug!(
            states = graph.node_count(),
            transitions = graph.edge_count(),
            "built symmetric difference product"
        );

        Ok(ProductAutomaton { graph, start })
    }

    pub fn check(&self) -> EngineResult<EquivalenceResult> {
        let product = self.build_product()?;

        let statistics = EquivalenceStatistics {
            alphabet_size: self.alphabet.len(),
            product_states: product.state_count(),
            product_transitions: product.transition_count(),
        };

        let status = match product.find_accepting() {
            Some((node, word)) => {
                let state = &product.graph[node];
                tracing::info!(state = %state.label, word = %word, "machines are not equivalent");
                SolverStatus::False(Witness {
                    state_id: state.id.clone(),
                    state_label: state.label.clone(),
                    word,
                    accepted_by: state.accepted_by.unwrap_or_default(),
                })
            }
            None => {
                tracing::info!("machines are equivalent");
                SolverStatus::True(())
            }
        };

        Ok(EquivalenceResult::new(status, statistics))
    }

    fn step(
        &self,
        automaton: &Automaton,
        machine: u8,
        node: NodeIndex,
        letter: char,
    ) -> EngineResult<NodeIndex> {
        automaton.successor(node, letter).ok_or_else(|| {
            StructuralError::IncompleteDfa {
                machine,
                state: automaton.state_at(node).label.clone(),
                symbol: letter,
            }
            .into()
        })
    }
}

/// Checks two deterministic machines for language equivalence.
pub fn check_equivalence(first: &Automaton, second: &Automaton) -> EngineResult<EquivalenceResult> {
    EquivalenceChecker::new(first, second)?.check()
}
