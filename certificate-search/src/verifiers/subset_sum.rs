//! The Subset-Sum verifier, for tapes `e1_e2_..._ek&target#bits`.
//!
//! Each round consumes the next inclusion bit. An excluded element is erased; an included one is
//! subtracted from the target one digit at a time, least significant first. Target digits already
//! settled in the current subtraction are held as marks (`a` = 0 ... `j` = 9) so the next digit
//! can be found from the terminator. Erased elements and consumed bits read `x`.

use super::VerifierSpec;
use crate::core::{
    digit_value, is_digit, Dir, Symbol, BLANK, DIGITS, FALSE, FIELD_SEP, GROUP_SEP, TERMINATOR,
    TRUE,
};

const CONSUMED: Symbol = b'x';
const MARKS: [Symbol; 10] = *b"abcdefghij";

fn is_mark(s: Symbol) -> bool {
    MARKS.contains(&s)
}

fn unmark(s: Symbol) -> Symbol {
    DIGITS[(s - MARKS[0]) as usize]
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum State {
    /// Return to the left end, then look for the next element.
    Rewind,
    Scan,
    ToCert,
    /// Consume the next inclusion bit.
    Bit,
    RewindErase,
    EraseSeek,
    Erase,
    RewindSub,
    SubSeek,
    SubEnd,
    /// Take the last digit of the element.
    SubPick,
    /// Whether the element has digits left, for digit `d`.
    Peek(u8),
    /// Carry digit `d` to the target; `bool` is "the element has more digits".
    Carry(u8, bool),
    TgtEnd(u8, bool),
    TgtDigit(u8, bool),
    Borrow(bool),
    Back(bool),
    /// The element is fully subtracted: turn the marks back into digits.
    UnmarkSeek,
    Unmark,
    /// Every element is consumed: the target must read zero and no bits may remain.
    Final,
    CertRest,
    Accept,
    Reject,
}

pub struct SubsetSum;

impl VerifierSpec for SubsetSum {
    type State = State;

    fn name(&self) -> String {
        "subset-sum".to_string()
    }

    fn alphabet(&self) -> Vec<Symbol> {
        let mut symbols = DIGITS.to_vec();
        symbols.extend([FIELD_SEP, GROUP_SEP, TERMINATOR, TRUE, FALSE, CONSUMED]);
        symbols.extend(MARKS);
        symbols
    }

    fn states(&self) -> Vec<State> {
        use State::*;
        let mut states = vec![
            Rewind,
            Scan,
            ToCert,
            Bit,
            RewindErase,
            EraseSeek,
            Erase,
            RewindSub,
            SubSeek,
            SubEnd,
            SubPick,
        ];
        states.extend((0..10).map(Peek));
        for carry in [Carry, TgtEnd, TgtDigit] {
            for more in [true, false] {
                states.extend((0..10).map(|d| carry(d, more)));
            }
        }
        for more in [true, false] {
            states.extend([Borrow(more), Back(more)]);
        }
        states.extend([UnmarkSeek, Unmark, Final, CertRest, Accept, Reject]);
        states
    }

    fn start(&self) -> State {
        State::Rewind
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
            (Rewind, BLANK) => (Scan, r, right),
            (Rewind, _) => (Rewind, r, left),
            (Scan, CONSUMED | FIELD_SEP) => (Scan, r, right),
            (Scan, _) if digit => (ToCert, r, right),
            (Scan, GROUP_SEP) => (Final, r, right),
            (ToCert, TERMINATOR) => (Bit, r, right),
            (ToCert, _) if r != BLANK => (ToCert, r, right),
            (Bit, CONSUMED) => (Bit, r, right),
            (Bit, TRUE) => (RewindSub, CONSUMED, left),
            (Bit, FALSE) => (RewindErase, CONSUMED, left),

            // Excluded: erase the element.
            (RewindErase, BLANK) => (EraseSeek, r, right),
            (RewindErase, _) => (RewindErase, r, left),
            (EraseSeek, CONSUMED | FIELD_SEP) => (EraseSeek, r, right),
            (EraseSeek | Erase, _) if digit => (Erase, CONSUMED, right),
            (Erase, FIELD_SEP | GROUP_SEP) => (Rewind, r, left),

            // Included: subtract it from the target, one digit per trip.
            (RewindSub, BLANK) => (SubSeek, r, right),
            (RewindSub, _) => (RewindSub, r, left),
            (SubSeek, CONSUMED | FIELD_SEP) => (SubSeek, r, right),
            (SubSeek | SubEnd, _) if digit => (SubEnd, r, right),
            (SubEnd, CONSUMED | FIELD_SEP | GROUP_SEP) => (SubPick, r, left),
            (SubPick, _) if digit => (Peek(digit_value(r)), CONSUMED, left),
            (Peek(d), _) => (Carry(d, digit), r, right),
            (Carry(d, more), GROUP_SEP) => (TgtEnd(d, more), r, right),
            (Carry(d, more), _) if r != BLANK => (Carry(d, more), r, right),
            (TgtEnd(d, more), TERMINATOR) => (TgtDigit(d, more), r, left),
            (TgtEnd(d, more), _) if digit || is_mark(r) => (TgtEnd(d, more), r, right),
            (TgtDigit(d, more), _) if is_mark(r) => (TgtDigit(d, more), r, left),
            (TgtDigit(d, more), _) if digit => {
                let t = digit_value(r);
                if t >= d {
                    (Back(more), MARKS[(t - d) as usize], left)
                } else {
                    (Borrow(more), MARKS[(t + 10 - d) as usize], left)
                }
            }
            (TgtDigit(..) | Borrow(_), GROUP_SEP) => (Reject, r, left),
            (Borrow(more), b'0') => (Borrow(more), b'9', left),
            (Borrow(more), _) if digit => (Back(more), DIGITS[digit_value(r) as usize - 1], left),
            (Back(true), _) => (RewindSub, r, left),
            (Back(false), _) => (UnmarkSeek, r, right),
            (UnmarkSeek, TERMINATOR) => (Unmark, r, left),
            (UnmarkSeek, _) if r != BLANK => (UnmarkSeek, r, right),
            (Unmark, _) if is_mark(r) => (Unmark, unmark(r), left),
            (Unmark, _) if digit => (Unmark, r, left),
            (Unmark, GROUP_SEP) => (Rewind, r, left),

            // Accept iff the target reached zero and every bit was consumed.
            (Final, b'0') => (Final, r, right),
            (Final, TERMINATOR) => (CertRest, r, right),
            (CertRest, CONSUMED) => (CertRest, r, right),
            (CertRest, BLANK) => (Accept, r, left),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Outcome, Tape, Walk};
    use crate::verifiers::build;

    fn run(tape: &str) -> Walk {
        build(&SubsetSum).unwrap().run(Tape::from(tape), 100_000)
    }

    #[test]
    fn test_state_set() {
        let machine = build(&SubsetSum).unwrap();
        assert_eq!(machine.table.len(), 91);
        assert_eq!(machine.table.alphabet().len(), 27);
        assert_eq!(machine.table.label(machine.start), "Rewind");
    }

    #[test]
    fn test_accepting_selection() {
        let accept = Walk {
            outcome: Outcome::Accept,
            steps: 130,
        };
        assert_eq!(run("3_7_2&5#TFT"), accept);
        assert_eq!(run("3_7_2&5#TTF").outcome, Outcome::Reject);
        assert_eq!(run("235_2&235#TF").outcome, Outcome::Accept);
        assert_eq!(run("10_25_7&32#FTT").outcome, Outcome::Accept);
        assert_eq!(run("10_5&5#FT").outcome, Outcome::Accept);
    }

    #[test]
    fn test_empty_and_zero() {
        assert_eq!(run("&0#").outcome, Outcome::Accept);
        assert_eq!(run("&3#").outcome, Outcome::Reject);
        assert_eq!(run("0&0#T").outcome, Outcome::Accept);
        assert_eq!(run("0&0#F").outcome, Outcome::Accept);
    }

    #[test]
    fn test_bit_count_mismatch() {
        assert_eq!(run("1&1#").outcome, Outcome::Reject);
        assert_eq!(run("3_7_2&5#TF").outcome, Outcome::Reject);
        assert_eq!(run("3_7_2&5#TFTT").outcome, Outcome::Reject);
    }

    #[test]
    fn test_underflow() {
        assert_eq!(run("100&1#T").outcome, Outcome::Reject);
        assert_eq!(run("9&10#T").outcome, Outcome::Reject);
    }
}
