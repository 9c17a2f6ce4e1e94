//! A Turing machine definition: a dense, read-only transition table plus its designated states.

use super::{ConfigurationError, StateId, Symbol, BLANK, MAX_STATES};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt::{Display, Formatter};
use std::hash::Hasher;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

/// A low-level transition. `next == 0` means undefined; otherwise the target is state `next - 1`.
#[derive(AsBytes, FromBytes, FromZeroes, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(C)]
struct Trans {
    next: u16,
    write: u8,
    dir: u8,
}

/// A head move.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Dir {
    L,
    R,
    S,
}

impl Dir {
    fn code(self) -> u8 {
        match self {
            Dir::R => 0,
            Dir::L => 1,
            Dir::S => 2,
        }
    }

    fn from_code(code: u8) -> Dir {
        match code {
            0 => Dir::R,
            1 => Dir::L,
            _ => Dir::S,
        }
    }

    /// The change in head position.
    pub fn offset(self) -> i64 {
        match self {
            Dir::L => -1,
            Dir::R => 1,
            Dir::S => 0,
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// What happens when the head moves left of the first input cell.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LeftEdge {
    /// The tape grows to the left with blanks.
    #[default]
    Extend,
    /// The walk halts in the reject state.
    Reject,
}

/// A higher-level transition, as a tagged enum. Conventions: "f"rom, "r"ead, "t"o, "w"rite.
/// `Halt` marks an undefined transition, which the interpreter treats as a rejection.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum Rule {
    Move { f: StateId, r: Symbol, w: Symbol, d: Dir, t: StateId },
    Halt { f: StateId, r: Symbol },
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const NO_COLUMN: u8 = u8::MAX;

/// A partial map `(state, symbol) -> (state, symbol, move)` over a declared alphabet.
/// Symbols outside the alphabet have no transitions at all.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransitionTable {
    alphabet: Vec<Symbol>,
    columns: Vec<u8>,
    labels: Vec<String>,
    code: Vec<Trans>,
}

impl TransitionTable {
    /// An empty table over the given state labels and alphabet (the blank is always included).
    pub fn new(labels: Vec<String>, alphabet: &[Symbol]) -> Result<Self, ConfigurationError> {
        if labels.len() > MAX_STATES {
            return Err(ConfigurationError::TooManyStates {
                states: labels.len(),
                limit: MAX_STATES,
            });
        }
        let mut symbols = vec![BLANK];
        symbols.extend(alphabet.iter().copied().filter(|&s| s != BLANK));
        let mut columns = vec![NO_COLUMN; 256];
        let mut kept = Vec::with_capacity(symbols.len());
        for s in symbols {
            if columns[s as usize] == NO_COLUMN {
                columns[s as usize] = kept.len() as u8;
                kept.push(s);
            }
        }
        let code = vec![Trans::new_zeroed(); labels.len() * kept.len()];
        Ok(TransitionTable {
            alphabet: kept,
            columns,
            labels,
            code,
        })
    }

    /// The number of states.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The declared tape alphabet, blank first.
    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    /// A state's human-readable name.
    pub fn label(&self, q: StateId) -> &str {
        &self.labels[q as usize]
    }

    /// The state with a given label, if any.
    pub fn state(&self, label: &str) -> Option<StateId> {
        self.labels.iter().position(|l| l == label).map(|q| q as StateId)
    }

    fn slot(&self, q: StateId, r: Symbol) -> Option<usize> {
        match self.columns[r as usize] {
            NO_COLUMN => None,
            c => Some(q as usize * self.alphabet.len() + c as usize),
        }
    }

    /// Define the transition for `(f, r)`. Symbols outside the alphabet are ignored.
    pub fn set(&mut self, f: StateId, r: Symbol, w: Symbol, d: Dir, t: StateId) {
        if let Some(i) = self.slot(f, r) {
            self.code[i] = Trans {
                next: t + 1,
                write: w,
                dir: d.code(),
            };
        }
    }

    /// The transition for `(q, r)`, or `None` if it is undefined.
    pub fn get(&self, q: StateId, r: Symbol) -> Option<(StateId, Symbol, Dir)> {
        let trans = self.code[self.slot(q, r)?];
        if trans.next == 0 {
            None
        } else {
            Some((trans.next - 1, trans.write, Dir::from_code(trans.dir)))
        }
    }

    /// Every `(state, alphabet symbol)` pair, as a `Rule`.
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.code.iter().enumerate().map(|(fr, trans)| {
            let n = self.alphabet.len();
            let (f, r) = ((fr / n) as StateId, self.alphabet[fr % n]);
            if trans.next == 0 {
                Rule::Halt { f, r }
            } else {
                let (w, d, t) = (trans.write, Dir::from_code(trans.dir), trans.next - 1);
                Rule::Move { f, r, w, d, t }
            }
        })
    }

    /// The packed transition records. Equal bytes (and labels) mean an identical machine.
    pub fn as_bytes(&self) -> &[u8] {
        self.code.as_slice().as_bytes()
    }

    /// A hash of the alphabet and the packed transitions, for comparing builds across runs.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        hasher.write(&self.alphabet);
        hasher.write(self.as_bytes());
        hasher.finish()
    }

    /// Render a rule with state labels, e.g. `Inc.3 '5' -> Inc.35 '_' R`.
    pub fn describe(&self, rule: &Rule) -> String {
        match *rule {
            Rule::Move { f, r, w, d, t } => format!(
                "{} {:?} -> {} {:?} {}",
                self.label(f),
                r as char,
                self.label(t),
                w as char,
                d
            ),
            Rule::Halt { f, r } => format!("{} {:?} -> (reject)", self.label(f), r as char),
        }
    }
}

/// A verifier machine: its table, designated states and left-overrun policy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Machine {
    pub name: String,
    pub table: TransitionTable,
    pub start: StateId,
    pub accept: StateId,
    pub reject: StateId,
    pub left_edge: LeftEdge,
}

impl Machine {
    pub fn is_halting(&self, q: StateId) -> bool {
        q == self.accept || q == self.reject
    }

    /// The rules of the non-halting states.
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.table.rules().filter(|rule| match *rule {
            Rule::Move { f, .. } | Rule::Halt { f, .. } => !self.is_halting(f),
        })
    }
}

impl Display for Machine {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "{}: {} states, start {}, accept {}, reject {}",
            self.name,
            self.table.len(),
            self.table.label(self.start),
            self.table.label(self.accept),
            self.table.label(self.reject)
        )?;
        for rule in self.rules().filter(|rule| matches!(rule, Rule::Move { .. })) {
            writeln!(f, "  {}", self.table.describe(&rule))?;
        }
        Ok(())
    }
}
