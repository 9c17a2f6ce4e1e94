//! A two-way unbounded tape and the configuration a walk mutates.

use super::{LeftEdge, Machine, StateId, Symbol, BLANK};
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

/// Tape cells, addressed by signed position. Cell 0 holds the first input symbol.
/// Only the visited or written span is stored; everything else reads as `BLANK`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tape {
    cells: VecDeque<Symbol>,
    /// `cells[origin]` is position 0.
    origin: usize,
}

impl Tape {
    pub fn new(input: &[Symbol]) -> Tape {
        Tape {
            cells: input.iter().copied().collect(),
            origin: 0,
        }
    }

    /// The leftmost stored position (0 unless the tape grew to the left).
    pub fn leftmost(&self) -> i64 {
        -(self.origin as i64)
    }

    fn index(&self, pos: i64) -> Option<usize> {
        let i = pos + self.origin as i64;
        (0..self.cells.len() as i64).contains(&i).then_some(i as usize)
    }

    pub fn read(&self, pos: i64) -> Symbol {
        self.index(pos).map_or(BLANK, |i| self.cells[i])
    }

    /// Write a symbol, growing the stored span with blanks in either direction as needed.
    pub fn write(&mut self, pos: i64, s: Symbol) {
        while pos < self.leftmost() {
            self.cells.push_front(BLANK);
            self.origin += 1;
        }
        while self.index(pos).is_none() {
            self.cells.push_back(BLANK);
        }
        if let Some(i) = self.index(pos) {
            self.cells[i] = s;
        }
    }

    /// The stored span with leading and trailing blanks removed.
    pub fn contents(&self) -> Vec<Symbol> {
        let cells: Vec<Symbol> = self.cells.iter().copied().collect();
        let start = cells.iter().position(|&s| s != BLANK).unwrap_or(cells.len());
        let end = cells.iter().rposition(|&s| s != BLANK).map_or(start, |i| i + 1);
        cells[start..end].to_vec()
    }
}

impl From<&str> for Tape {
    fn from(text: &str) -> Self {
        Tape::new(text.as_bytes())
    }
}

impl Display for Tape {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.contents()))
    }
}

/// The state of one walk: current state, tape, head position and step counter.
#[derive(Clone, Debug)]
pub struct Configuration {
    pub state: StateId,
    pub tape: Tape,
    pub head: i64,
    pub steps: u64,
}

impl Configuration {
    pub fn new(start: StateId, tape: Tape) -> Configuration {
        Configuration {
            state: start,
            tape,
            head: 0,
            steps: 0,
        }
    }

    /// Apply one transition. An undefined transition, or (under `LeftEdge::Reject`) a move
    /// left of cell 0 into a non-halting state, sends the machine to its reject state.
    pub fn step(&mut self, machine: &Machine) {
        self.steps += 1;
        let r = self.tape.read(self.head);
        let Some((t, w, d)) = machine.table.get(self.state, r) else {
            self.state = machine.reject;
            return;
        };
        self.tape.write(self.head, w);
        let head = self.head + d.offset();
        if head < 0 && machine.left_edge == LeftEdge::Reject && !machine.is_halting(t) {
            self.state = machine.reject;
        } else {
            self.head = head;
            self.state = t;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth() {
        let mut tape = Tape::from("ab");
        assert_eq!(tape.read(-3), BLANK);
        assert_eq!(tape.read(1), b'b');
        assert_eq!(tape.read(2), BLANK);
        tape.write(-2, b'x');
        assert_eq!(tape.leftmost(), -2);
        assert_eq!(tape.read(-2), b'x');
        assert_eq!(tape.read(-1), BLANK);
        assert_eq!(tape.read(0), b'a');
        tape.write(4, b'y');
        assert_eq!(tape.read(3), BLANK);
        assert_eq!(tape.read(4), b'y');
        assert_eq!(tape.to_string(), "x ab  y");
        tape.write(-2, BLANK);
        tape.write(4, BLANK);
        assert_eq!(tape.contents(), b"ab");
        assert_eq!(Tape::from("").contents(), b"");
    }
}
