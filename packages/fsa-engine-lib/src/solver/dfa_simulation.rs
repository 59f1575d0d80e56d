use petgraph::stable_graph::NodeIndex;

use crate::{
    automaton::{Automaton, MachineKind},
    diagnostics::ensure_deterministic,
    error::{EngineResult, InvariantViolation, StructuralError},
    solver::{Rejection, SimulationResult, SimulationStatistics},
};

/// Walks the single path a deterministic machine takes on an input.
#[derive(Debug)]
pub struct DeterministicSimulator<'a> {
    automaton: &'a Automaton,
    start: NodeIndex,
}

impl<'a> DeterministicSimulator<'a> {
    pub fn new(automaton: &'a Automaton) -> EngineResult<Self> {
        if automaton.kind() != MachineKind::Deterministic {
            return Err(InvariantViolation::KindMismatch {
                expected: MachineKind::Deterministic,
                found: automaton.kind(),
            }
            .into());
        }
        ensure_deterministic(automaton)?;

        let start = automaton
            .start_index()
            .ok_or(StructuralError::MissingStartState)?;

        Ok(DeterministicSimulator { automaton, start })
    }

    /// Runs the input and stops at the first symbol that has no transition.
    /// The returned path then holds one label per consumed symbol plus the
    /// start state.
    pub fn run(&self, input: &str) -> EngineResult<SimulationResult> {
        let mut current = self.start;
        let mut path = vec![self.label(current)];
        let mut statistics = SimulationStatistics {
            consumed: 0,
            explored_configurations: 1,
        };

        for symbol in input.chars() {
            let Some(next) = self.automaton.successor(current, symbol) else {
                let rejection = Rejection::NoTransition {
                    state: self.label(current),
                    symbol,
                };
                tracing::debug!(consumed = statistics.consumed, "{}", rejection);
                return Ok(SimulationResult::rejected(rejection, path, statistics));
            };

            current = next;
            path.push(self.label(current));
            statistics.consumed += 1;
            statistics.explored_configurations += 1;
        }

        let end = self.automaton.state_at(current);
        let result = if end.accepting {
            SimulationResult::accepted(path, statistics)
        } else {
            SimulationResult::rejected(
                Rejection::NonAcceptingState {
                    state: end.label.clone(),
                },
                path,
                statistics,
            )
        };

        tracing::info!(input, accepted = result.is_accepted(), "deterministic run finished");

        Ok(result)
    }

    fn label(&self, node: NodeIndex) -> String {
        self.automaton.state_at(node).label.clone()
    }
}
