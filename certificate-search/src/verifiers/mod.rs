//! Verifier machines, described as typed state spaces and interned into dense transition tables.
//!
//! Each verifier reads the tape `instance#certificate` with the head on cell 0 and halts in its
//! accept state iff the certificate witnesses the instance.

mod cache;
mod certificate_check;
mod input_check;
mod sat_dynamic;
mod sat_fixed;
mod subset_sum;

pub use cache::*;
pub use certificate_check::*;
pub use input_check::*;
pub use sat_dynamic::SatDynamic;
pub use sat_fixed::SatFixed;
pub use subset_sum::SubsetSum;

use crate::codec::Family;
use crate::core::{
    ConfigurationError, Dir, LeftEdge, Machine, StateId, Symbol, TransitionTable, MAX_STATES,
};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;
use std::str::FromStr;
use tracing::debug;

/// A machine description: a finite state type and a transition function over it.
pub trait VerifierSpec {
    type State: Copy + Eq + Hash + Debug;

    fn name(&self) -> String;
    /// The symbols the machine may read. The blank is implied.
    fn alphabet(&self) -> Vec<Symbol>;
    /// Every state, in table order.
    fn states(&self) -> Vec<Self::State>;
    fn start(&self) -> Self::State;
    fn accept(&self) -> Self::State;
    fn reject(&self) -> Self::State;
    /// The transition for `(q, r)`; `None` leaves it undefined (an implicit rejection).
    fn delta(&self, q: Self::State, r: Symbol) -> Option<(Self::State, Symbol, Dir)>;

    fn label(&self, q: Self::State) -> String {
        format!("{:?}", q)
    }
}

/// Enumerate `states x alphabet` and intern the result into a dense table.
pub fn build<V: VerifierSpec>(spec: &V) -> Result<Machine, ConfigurationError> {
    let states = spec.states();
    if states.len() > MAX_STATES {
        return Err(ConfigurationError::TooManyStates {
            states: states.len(),
            limit: MAX_STATES,
        });
    }
    let ids: HashMap<V::State, StateId> = states
        .iter()
        .enumerate()
        .map(|(i, &q)| (q, i as StateId))
        .collect();
    let id = |from: &str, q: V::State| {
        ids.get(&q)
            .copied()
            .ok_or_else(|| ConfigurationError::DanglingState {
                from: from.to_string(),
                to: spec.label(q),
            })
    };
    let name = spec.name();
    let (start, accept, reject) = (
        id(&name, spec.start())?,
        id(&name, spec.accept())?,
        id(&name, spec.reject())?,
    );
    let labels = states.iter().map(|&q| spec.label(q)).collect();
    let mut table = TransitionTable::new(labels, &spec.alphabet())?;
    let alphabet = table.alphabet().to_vec();
    for (f, &q) in states.iter().enumerate() {
        let f = f as StateId;
        if f == accept || f == reject {
            continue;
        }
        for &r in &alphabet {
            if let Some((t, w, d)) = spec.delta(q, r) {
                let t = id(table.label(f), t)?;
                table.set(f, r, w, d, t);
            }
        }
    }
    debug!(machine = %name, states = table.len(), symbols = alphabet.len(), "built transition table");
    Ok(Machine {
        name,
        table,
        start,
        accept,
        reject,
        left_edge: LeftEdge::Extend,
    })
}

/// The shipped verifiers.
#[derive(SerializeDisplay, DeserializeFromStr, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProblemKind {
    SatFixed,
    SatDynamic,
    SubsetSum,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 3] = [
        ProblemKind::SatFixed,
        ProblemKind::SatDynamic,
        ProblemKind::SubsetSum,
    ];

    /// The instance family the verifier reads.
    pub fn family(self) -> Family {
        match self {
            ProblemKind::SatFixed | ProblemKind::SatDynamic => Family::Sat,
            ProblemKind::SubsetSum => Family::SubsetSum,
        }
    }

    /// Whether the state set depends on the tape's magnitude.
    pub fn is_dynamic(self) -> bool {
        self == ProblemKind::SatDynamic
    }
}

impl Display for ProblemKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            ProblemKind::SatFixed => "sat-fixed",
            ProblemKind::SatDynamic => "sat-dynamic",
            ProblemKind::SubsetSum => "subset-sum",
        })
    }
}

impl FromStr for ProblemKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProblemKind::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| ConfigurationError::UnknownProblemKind(s.to_string()))
    }
}

/// Parse a magnitude given as text. Only integers are accepted; the sign is checked when building.
pub fn parse_magnitude(text: &str) -> Result<i64, ConfigurationError> {
    text.trim()
        .parse()
        .map_err(|_| ConfigurationError::NonIntegralMagnitude(text.to_string()))
}

fn assemble<V: VerifierSpec>(spec: V, input_check: bool) -> Result<Machine, ConfigurationError> {
    if input_check {
        build(&InputCheck::new(spec))
    } else {
        build(&spec)
    }
}

/// Build the verifier for `kind`, optionally behind the input-check phase.
/// Fixed kinds ignore `magnitude`; `sat-dynamic` requires a non-negative one.
pub fn build_verifier(
    kind: ProblemKind,
    magnitude: Option<i64>,
    input_check: bool,
) -> Result<Machine, ConfigurationError> {
    match kind {
        ProblemKind::SatFixed => assemble(SatFixed, input_check),
        ProblemKind::SubsetSum => assemble(SubsetSum, input_check),
        ProblemKind::SatDynamic => {
            let magnitude = magnitude.ok_or(ConfigurationError::MissingMagnitude("sat-dynamic"))?;
            let magnitude =
                u64::try_from(magnitude).map_err(|_| ConfigurationError::NegativeMagnitude(magnitude))?;
            assemble(SatDynamic::new(magnitude)?, input_check)
        }
    }
}

/// Build the plain verifier for `kind`.
pub fn build_machine(kind: ProblemKind, magnitude: Option<i64>) -> Result<Machine, ConfigurationError> {
    build_verifier(kind, magnitude, false)
}
