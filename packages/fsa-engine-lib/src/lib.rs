pub mod automaton;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod solver;
pub mod validation;
