use thiserror::Error;

use crate::automaton::{MachineKind, symbol::Symbol};

/// A reference into the automaton that does not resolve, or a precondition on
/// the automaton's structure that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("unknown state `{0}`")]
    UnknownState(String),
    #[error("a state with id `{0}` already exists")]
    DuplicateState(String),
    #[error("no transition from `{source_id}` to `{target_id}` with symbol {symbol}")]
    UnknownTransition {
        source_id: String,
        target_id: String,
        symbol: String,
    },
    #[error("start state not defined")]
    MissingStartState,
    /// A state of one of the machines lacks a transition for a symbol of the
    /// shared alphabet. `machine` is 1 or 2.
    #[error(
        "incomplete DFA: state {state} of machine {machine} has no transition for symbol {symbol}"
    )]
    IncompleteDfa {
        machine: u8,
        state: String,
        symbol: char,
    },
}

/// An operation that would break the transition invariants of the machine
/// kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("state {state} already has a transition with symbol {symbol}")]
    DuplicateDeterministicTransition { state: String, symbol: char },
    #[error(
        "epsilon transitions are not allowed in a deterministic machine (from state {state})"
    )]
    EpsilonOnDeterministic { state: String },
    #[error("transition from `{source_id}` to `{target_id}` with symbol {symbol} already exists")]
    DuplicateTransition {
        source_id: String,
        target_id: String,
        symbol: String,
    },
    #[error("invalid transition symbol {0:?}, expected a single character or ε")]
    InvalidSymbol(String),
    #[error("expected a {expected} machine, found a {found} machine")]
    KindMismatch {
        expected: MachineKind,
        found: MachineKind,
    },
    #[error("both machines must be deterministic")]
    NotBothDeterministic,
    /// The machine is labelled deterministic but its transitions are not,
    /// which can happen after a kind change. Names the first offending pair.
    #[error("deterministic machine has conflicting transitions from state {state} on {symbol}")]
    ConflictingTransitions { state: String, symbol: Symbol },
}

/// A persisted machine payload that cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("malformed machine payload: {0}")]
    Malformed(String),
    #[error("machine payload has no machineType")]
    MissingMachineType,
    #[error("unknown machineType {0:?}, expected \"DFA\" or \"NFA\"")]
    UnknownMachineType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error(transparent)]
    Input(#[from] InputError),
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        EngineError::Input(InputError::Malformed(error.to_string()))
    }
}

impl EngineError {
    pub fn is_structural(&self) -> bool {
        matches!(self, EngineError::Structural(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, EngineError::Invariant(_))
    }

    pub fn is_input(&self) -> bool {
        matches!(self, EngineError::Input(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
