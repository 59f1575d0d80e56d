use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, MachineKind},
    error::EngineResult,
};

pub mod dfa_simulation;
pub mod equivalence;
pub mod nfa_simulation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverStatus<T = (), F = ()> {
    True(T),
    False(F),
}

impl<T, F> SolverStatus<T, F> {
    pub fn is_success(&self) -> bool {
        matches!(self, SolverStatus::True(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SolverStatus::False(_))
    }

    pub fn unwrap_success(self) -> T {
        match self {
            SolverStatus::True(t) => t,
            _ => panic!("Called unwrap_success on a non-successful SolverStatus"),
        }
    }

    pub fn unwrap_failure(self) -> F {
        match self {
            SolverStatus::False(f) => f,
            _ => panic!("Called unwrap_failure on a non-failure SolverStatus"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverResult<T = (), F = (), Statistics = ()> {
    pub status: SolverStatus<T, F>,
    pub statistics: Statistics,
}

impl<T, F, Statistics> SolverResult<T, F, Statistics> {
    pub fn new(status: SolverStatus<T, F>, statistics: Statistics) -> Self {
        Self { status, statistics }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }

    pub fn unwrap_success(self) -> T {
        self.status.unwrap_success()
    }

    pub fn unwrap_failure(self) -> F {
        self.status.unwrap_failure()
    }
}

/// Why a simulation rejected its input. Rejection is an ordinary outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// The deterministic walk found no transition for the next symbol.
    NoTransition { state: String, symbol: char },
    /// The input was consumed but the final state is not accepting.
    NonAcceptingState { state: String },
    /// No branch of the nondeterministic search accepts.
    NoAcceptingPath,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NoTransition { state, symbol } => write!(
                f,
                "Rejected: No transition found from state {} with symbol {}",
                state, symbol
            ),
            Rejection::NonAcceptingState { .. } => {
                write!(f, "Rejected: Ended in non-accepting state")
            }
            Rejection::NoAcceptingPath => write!(f, "Rejected: No accepting path found"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    /// Number of symbols taken from the input along the returned path.
    pub consumed: usize,
    /// Number of configurations the search looked at. For the deterministic
    /// walk this is the number of states visited.
    pub explored_configurations: u64,
}

/// The outcome of running an input through an automaton, together with the
/// labels of the visited states for highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    pub result: SolverResult<(), Rejection, SimulationStatistics>,
    pub path: Vec<String>,
}

impl SimulationResult {
    pub fn accepted(path: Vec<String>, statistics: SimulationStatistics) -> Self {
        SimulationResult {
            result: SolverResult::new(SolverStatus::True(()), statistics),
            path,
        }
    }

    pub fn rejected(
        rejection: Rejection,
        path: Vec<String>,
        statistics: SimulationStatistics,
    ) -> Self {
        SimulationResult {
            result: SolverResult::new(SolverStatus::False(rejection), statistics),
            path,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.result.is_success()
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.result.status {
            SolverStatus::True(_) => None,
            SolverStatus::False(rejection) => Some(rejection),
        }
    }

    pub fn message(&self) -> String {
        match &self.result.status {
            SolverStatus::True(_) => "Accepted".to_string(),
            SolverStatus::False(rejection) => rejection.to_string(),
        }
    }

    pub fn statistics(&self) -> &SimulationStatistics {
        &self.result.statistics
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableSimulationResult {
    pub accepted: bool,
    pub message: String,
    pub path: Vec<String>,
    pub statistics: SimulationStatistics,
}

impl From<&SimulationResult> for SerializableSimulationResult {
    fn from(result: &SimulationResult) -> Self {
        SerializableSimulationResult {
            accepted: result.is_accepted(),
            message: result.message(),
            path: result.path.clone(),
            statistics: result.statistics().clone(),
        }
    }
}

impl From<SimulationResult> for SerializableSimulationResult {
    fn from(result: SimulationResult) -> Self {
        SerializableSimulationResult::from(&result)
    }
}

/// Runs the simulator that matches the machine's kind.
pub fn simulate(automaton: &Automaton, input: &str) -> EngineResult<SimulationResult> {
    match automaton.kind() {
        MachineKind::Deterministic => {
            dfa_simulation::DeterministicSimulator::new(automaton)?.run(input)
        }
        MachineKind::Nondeterministic => {
            nfa_simulation::NondeterministicSimulator::new(automaton)?.run(input)
        }
    }
}
