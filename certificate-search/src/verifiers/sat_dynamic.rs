//! The input-dependent SAT verifier: the variable index of each literal is read into the finite
//! control, so the state set grows with the largest index on the tape.

use super::VerifierSpec;
use crate::core::{
    digit_value, is_digit, ConfigurationError, Dir, Symbol, BLANK, DIGITS, FALSE, FIELD_SEP, GROUP_SEP,
    MAX_STATES, NEGATION, TERMINATOR, TRUE,
};
use std::fmt::{Display, Formatter};

/// Marks the first cell of a positive literal once its index has been read.
const POSITIVE: Symbol = b'?';
/// Marks the first cell of a negated literal.
const NEGATIVE: Symbol = b'!';

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum State {
    Check,
    Not,
    Skip,
    /// Reading an index; holds the digits read so far.
    Inc(u64),
    /// Carrying an index to the certificate.
    Forward(u64),
    /// Counting down certificate cells.
    Dec(u64),
    /// Carrying a certificate value back to the marked literal.
    Backward(bool),
    /// The index points past the certificate: the literal is false whatever its sign.
    Missing,
    Accept,
    Reject,
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            State::Inc(n) => write!(f, "Inc.{n}"),
            State::Forward(n) => write!(f, "Forward.{n}"),
            State::Dec(n) => write!(f, "Dec.{n}"),
            State::Backward(true) => write!(f, "Backward.T"),
            State::Backward(false) => write!(f, "Backward.F"),
            q => write!(f, "{:?}", q),
        }
    }
}

/// The verifier for formulas whose variable indices are at most `magnitude`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SatDynamic {
    magnitude: u64,
}

impl SatDynamic {
    /// The states that do not depend on the magnitude.
    const FIXED_STATES: u64 = 8;

    pub fn new(magnitude: u64) -> Result<SatDynamic, ConfigurationError> {
        let states = magnitude
            .checked_add(1)
            .and_then(|n| n.checked_mul(3))
            .and_then(|n| n.checked_add(Self::FIXED_STATES))
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
        if states > MAX_STATES {
            return Err(ConfigurationError::TooManyStates {
                states,
                limit: MAX_STATES,
            });
        }
        Ok(SatDynamic { magnitude })
    }

    pub fn magnitude(&self) -> u64 {
        self.magnitude
    }

    /// Continue reading an index, or reject one above the magnitude.
    fn read_index(&self, n: u64, mark: Symbol) -> (State, Symbol, Dir) {
        if n <= self.magnitude {
            (State::Inc(n), mark, Dir::R)
        } else {
            (State::Reject, FIELD_SEP, Dir::L)
        }
    }

    /// Step onto the certificate with index `n`. Index 0 names no cell.
    fn enter_certificate(n: u64) -> (State, Symbol, Dir) {
        match n.checked_sub(1) {
            Some(n) => (State::Dec(n), TERMINATOR, Dir::R),
            None => (State::Reject, FIELD_SEP, Dir::L),
        }
    }
}

impl VerifierSpec for SatDynamic {
    type State = State;

    fn name(&self) -> String {
        format!("sat-dynamic-{}", self.magnitude)
    }

    fn alphabet(&self) -> Vec<Symbol> {
        let mut symbols = DIGITS.to_vec();
        symbols.extend([FIELD_SEP, NEGATION, GROUP_SEP, TERMINATOR, TRUE, FALSE]);
        symbols.extend([POSITIVE, NEGATIVE]);
        symbols
    }

    fn states(&self) -> Vec<State> {
        use State::*;
        let mut states = vec![Check, Not, Skip, Backward(true), Backward(false), Missing, Accept, Reject];
        for n in 0..=self.magnitude {
            states.extend([Inc(n), Dec(n), Forward(n)]);
        }
        states
    }

    fn start(&self) -> State {
        State::Check
    }

    fn accept(&self) -> State {
        State::Accept
    }

    fn reject(&self) -> State {
        State::Reject
    }

    fn delta(&self, q: State, r: Symbol) -> Option<(State, Symbol, Dir)> {
        use State::*;
        let (left, right) = (Dir::L, Dir::R);
        let digit = is_digit(r);
        Some(match (q, r) {
            (Check, FIELD_SEP) => (Check, r, right),
            (Check, NEGATION) => (Not, r, right),
            (Check, _) if digit => self.read_index(digit_value(r) as u64, POSITIVE),
            (Check, GROUP_SEP | TERMINATOR) => (Reject, FIELD_SEP, right),
            (Not, _) if digit => self.read_index(digit_value(r) as u64, NEGATIVE),
            (Skip, GROUP_SEP) => (Check, FIELD_SEP, right),
            (Skip, TERMINATOR) => (Accept, FIELD_SEP, right),
            (Skip, _) if r != BLANK => (Skip, FIELD_SEP, right),
            (Inc(n), FIELD_SEP | GROUP_SEP) => (Forward(n), r, right),
            (Inc(n), _) if digit => self.read_index(10 * n + digit_value(r) as u64, FIELD_SEP),
            (Inc(n) | Forward(n), TERMINATOR) => Self::enter_certificate(n),
            (Forward(n), _) if r != BLANK => (Forward(n), r, right),
            (Dec(0), TRUE | FALSE) => (Backward(r == TRUE), r, left),
            (Dec(n), TRUE | FALSE) => (Dec(n - 1), r, right),
            (Dec(_), BLANK) => (Missing, r, left),
            (Backward(true), POSITIVE) | (Backward(false), NEGATIVE) => (Skip, FIELD_SEP, right),
            (Backward(true), NEGATIVE) | (Backward(false), POSITIVE) => (Check, FIELD_SEP, right),
            (Backward(v), _) if r != BLANK => (Backward(v), r, left),
            (Missing, POSITIVE | NEGATIVE) => (Check, FIELD_SEP, right),
            (Missing, _) if r != BLANK => (Missing, r, left),
            _ => return None,
        })
    }

    fn label(&self, q: State) -> String {
        q.to_string()
    }
}
