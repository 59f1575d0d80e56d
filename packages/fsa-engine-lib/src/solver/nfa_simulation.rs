use itertools::Itertools;
use petgraph::stable_graph::NodeIndex;

use crate::{
    automaton::{Automaton, MachineKind, symbol::Symbol},
    error::{EngineResult, InvariantViolation, StructuralError},
    solver::{Rejection, SimulationResult, SimulationStatistics},
};

/// One point of the search: the current state, how much input has been read
/// and how we got here.
#[derive(Debug, Clone)]
struct Configuration {
    node: NodeIndex,
    position: usize,
    path: Vec<NodeIndex>,
    /// States entered on this branch since the last consumed symbol. Together
    /// with `position` these are exactly the configurations this branch has
    /// already been in, so an epsilon move into one of them is refused.
    closure: Vec<NodeIndex>,
}

/// Depth first search over all move sequences of a machine with epsilon
/// transitions.
///
/// The search uses an explicit stack. Candidate moves of a configuration are
/// the transitions on the next input symbol in stored order, followed by the
/// epsilon transitions in stored order, and they are explored in that order.
/// The first accepting path found is returned, which need not be the
/// shortest.
#[derive(Debug)]
pub struct NondeterministicSimulator<'a> {
    automaton: &'a Automaton,
    start: NodeIndex,
}

impl<'a> NondeterministicSimulator<'a> {
    pub fn new(automaton: &'a Automaton) -> EngineResult<Self> {
        if automaton.kind() != MachineKind::Nondeterministic {
            return Err(InvariantViolation::KindMismatch {
                expected: MachineKind::Nondeterministic,
                found: automaton.kind(),
            }
            .into());
        }

        let start = automaton
            .start_index()
            .ok_or(StructuralError::MissingStartState)?;

        Ok(NondeterministicSimulator { automaton, start })
    }

    pub fn run(&self, input: &str) -> EngineResult<SimulationResult> {
        let symbols = input.chars().collect_vec();
        let mut explored = 0u64;

        let mut stack = vec![Configuration {
            node: self.start,
            position: 0,
            path: vec![self.start],
            closure: vec![self.start],
        }];

        while let Some(configuration) = stack.pop() {
            explored += 1;

            if configuration.position == symbols.len()
                && self.automaton.state_at(configuration.node).accepting
            {
                let path = self.labels(&configuration.path);
                tracing::info!(input, explored, "nondeterministic run accepted");

                return Ok(SimulationResult::accepted(
                    path,
                    SimulationStatistics {
                        consumed: symbols.len(),
                        explored_configurations: explored,
                    },
                ));
            }

            let moves = self.candidate_moves(&configuration, &symbols);
            // reversed, so the first candidate is popped first
            stack.extend(moves.into_iter().rev());
        }

        tracing::info!(input, explored, "nondeterministic run rejected");

        Ok(SimulationResult::rejected(
            Rejection::NoAcceptingPath,
            vec![],
            SimulationStatistics {
                consumed: 0,
                explored_configurations: explored,
            },
        ))
    }

    fn candidate_moves(
        &self,
        configuration: &Configuration,
        symbols: &[char],
    ) -> Vec<Configuration> {
        let outgoing = self.automaton.outgoing(configuration.node);
        let mut moves = Vec::new();

        if let Some(&letter) = symbols.get(configuration.position) {
            for (_, target) in outgoing.iter().filter(|(symbol, _)| symbol.matches(letter)) {
                let mut path = configuration.path.clone();
                path.push(*target);
                moves.push(Configuration {
                    node: *target,
                    position: configuration.position + 1,
                    path,
                    closure: vec![*target],
                });
            }
        }

        for (_, target) in outgoing.iter().filter(|(symbol, _)| *symbol == Symbol::Epsilon) {
            if configuration.closure.contains(target) {
                tracing::debug!(
                    state = %self.automaton.state_at(*target).label,
                    position = configuration.position,
                    "skipping epsilon move into a configuration already on this branch"
                );
                continue;
            }

            let mut path = configuration.path.clone();
            path.push(*target);
            let mut closure = configuration.closure.clone();
            closure.push(*target);
            moves.push(Configuration {
                node: *target,
                position: configuration.position,
                path,
                closure,
            });
        }

        moves
    }

    fn labels(&self, path: &[NodeIndex]) -> Vec<String> {
        path.iter()
            .map(|node| self.automaton.state_at(*node).label.clone())
            .collect_vec()
    }
}
