//! The fixed-state SAT verifier.
//!
//! The machine never stores a variable index in its control. Instead every round consumes the
//! next certificate symbol and decrements every index left on the formula; the literals that reach
//! zero are replaced by the symbol just consumed. A sweep over the formula then erases the
//! satisfied clauses. The round after a sweep that found every clause satisfied never comes:
//! that sweep accepts.

use super::VerifierSpec;
use crate::core::{
    digit_value, is_digit, Dir, Symbol, BLANK, DIGITS, FALSE, FIELD_SEP, GROUP_SEP, NEGATION,
    TERMINATOR, TRUE,
};

/// Whether every clause seen so far in the current sweep was satisfied.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Sweep {
    Satisfied,
    Pending,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum State {
    /// Looking for a true literal in a clause whose literals all were assigned so far.
    Check(Sweep),
    CheckNot(Sweep),
    /// The clause has a literal whose variable is not assigned yet.
    Unknown(Sweep),
    UnknownNot(Sweep),
    UnknownTerm(Sweep),
    /// The clause is satisfied: erase it.
    Skip(Sweep),
    /// Consume the next certificate symbol.
    Fetch,
    /// Decrement the indices right to left, carrying the consumed value.
    Backward(bool),
    Borrow(bool),
    BackwardFrom1(bool),
    BackwardInTerm(bool),
    /// The index just decremented to zero: substitute the value.
    Assign(bool),
    Accept,
    Reject,
}

pub struct SatFixed;

impl SatFixed {
    const SWEEPS: [Sweep; 2] = [Sweep::Satisfied, Sweep::Pending];
}

fn decrement(digit: Symbol) -> Symbol {
    DIGITS[digit_value(digit) as usize - 1]
}

fn value_symbol(value: bool) -> Symbol {
    if value {
        TRUE
    } else {
        FALSE
    }
}

impl VerifierSpec for SatFixed {
    type State = State;

    fn name(&self) -> String {
        "sat-fixed".to_string()
    }

    fn alphabet(&self) -> Vec<Symbol> {
        let mut symbols = DIGITS.to_vec();
        symbols.extend([FIELD_SEP, GROUP_SEP, TERMINATOR, NEGATION, TRUE, FALSE]);
        symbols
    }

    fn states(&self) -> Vec<State> {
        use State::*;
        let mut states = vec![];
        for sweep in Self::SWEEPS {
            states.extend([
                Check(sweep),
                CheckNot(sweep),
                Unknown(sweep),
                UnknownNot(sweep),
                UnknownTerm(sweep),
                Skip(sweep),
            ]);
        }
        states.push(Fetch);
        for value in [true, false] {
            states.extend([
                Backward(value),
                Borrow(value),
                BackwardFrom1(value),
                BackwardInTerm(value),
                Assign(value),
            ]);
        }
        states.extend([Accept, Reject]);
        states
    }

    fn start(&self) -> State {
        State::Check(Sweep::Satisfied)
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
        Some(match (q, r) {
            // The forward sweep over the formula.
            (Check(s), FIELD_SEP) => (Check(s), r, right),
            (Check(s), NEGATION) => (CheckNot(s), r, right),
            (Check(s) | CheckNot(s) | Unknown(s) | UnknownNot(s), b'0') => {
                (Unknown(s), FIELD_SEP, right)
            }
            (Check(s) | CheckNot(s) | Unknown(s) | UnknownNot(s) | UnknownTerm(s), _)
                if is_digit(r) =>
            {
                (UnknownTerm(s), r, right)
            }
            (Check(s), TRUE) => (Skip(s), r, right),
            (Check(s), FALSE) => (Check(s), r, right),
            (Check(_), GROUP_SEP | TERMINATOR) => (Reject, FIELD_SEP, right),
            (CheckNot(s), FIELD_SEP) => (CheckNot(s), r, right),
            (CheckNot(s), TRUE) => (Check(s), r, right),
            (CheckNot(s), FALSE) => (Skip(s), r, right),
            (Unknown(s), FIELD_SEP) => (Unknown(s), r, right),
            (Unknown(s), TRUE) => (Skip(s), r, right),
            (Unknown(s), FALSE) => (Unknown(s), r, right),
            (Unknown(s), NEGATION) => (UnknownNot(s), r, right),
            (Unknown(_) | UnknownTerm(_), GROUP_SEP) => (Check(Sweep::Pending), r, right),
            (Unknown(_) | UnknownTerm(_), TERMINATOR) => (Fetch, r, right),
            (UnknownTerm(s), FIELD_SEP) => (Unknown(s), r, right),
            (UnknownNot(s), FIELD_SEP) => (UnknownNot(s), r, right),
            (UnknownNot(s), TRUE) => (Unknown(s), r, right),
            (UnknownNot(s), FALSE) => (Skip(s), r, right),
            (Skip(s), GROUP_SEP) => (Check(s), r, right),
            (Skip(Sweep::Satisfied), TERMINATOR) => (Accept, r, right),
            (Skip(Sweep::Pending), TERMINATOR) => (Fetch, r, right),
            (Skip(s), _) if r != BLANK => (Skip(s), FIELD_SEP, right),

            // Consume a certificate symbol.
            (Fetch, FIELD_SEP) => (Fetch, r, right),
            (Fetch, TRUE | FALSE) => (Backward(r == TRUE), FIELD_SEP, left),

            // The backward pass: decrement every index, then start a new sweep.
            (Backward(v), b'1') => (BackwardFrom1(v), b'0', left),
            (Backward(v), b'0') => (Borrow(v), b'9', left),
            (Backward(v), _) if is_digit(r) => (BackwardInTerm(v), decrement(r), left),
            (Backward(_), BLANK) => (Check(Sweep::Satisfied), r, right),
            (Backward(v), _) => (Backward(v), r, left),
            (Borrow(v), b'0') => (Borrow(v), b'9', left),
            (Borrow(v), _) if is_digit(r) => (BackwardInTerm(v), decrement(r), left),
            (BackwardFrom1(v), _) if is_digit(r) => (BackwardInTerm(v), r, left),
            (BackwardFrom1(v), FIELD_SEP | NEGATION | GROUP_SEP | BLANK) => (Assign(v), r, right),
            (BackwardInTerm(v), _) if is_digit(r) => (BackwardInTerm(v), r, left),
            (BackwardInTerm(v), FIELD_SEP | GROUP_SEP | NEGATION) => (Backward(v), r, left),
            (BackwardInTerm(_), BLANK) => (Check(Sweep::Satisfied), r, right),
            (Assign(v), b'0') => (Backward(v), value_symbol(v), left),
            _ => return None,
        })
    }
}
