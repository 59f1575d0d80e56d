use std::{fmt::Display, str::FromStr};

use crate::error::InvariantViolation;

/// The literal used for epsilon moves in labels and in the persisted format.
pub const EPSILON: &str = "ε";

/// The label of a transition. Either a single input character or the epsilon
/// symbol, which consumes no input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Char(char),
    Epsilon,
}

impl Symbol {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Checks whether this symbol can be taken on the given input character.
    /// Epsilon never matches an input character, not even a literal 'ε'.
    pub fn matches(&self, letter: char) -> bool {
        match self {
            Symbol::Char(c) => *c == letter,
            Symbol::Epsilon => false,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Symbol::Char(c) => Some(*c),
            Symbol::Epsilon => None,
        }
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Symbol::Char(value)
    }
}

impl FromStr for Symbol {
    type Err = InvariantViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == EPSILON {
            return Ok(Symbol::Epsilon);
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Symbol::Char(c)),
            _ => Err(InvariantViolation::InvalidSymbol(s.to_string())),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{}", c),
            Symbol::Epsilon => write!(f, "{}", EPSILON),
        }
    }
}
