//! The input-check phase: validate the certificate segment, then hand over to a base verifier.

use super::VerifierSpec;
use crate::core::{Dir, Symbol, BLANK, CERTIFICATE_SYMBOLS, TERMINATOR};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Checked<S> {
    /// Scan right to the terminator.
    InputCheck,
    /// Only certificate symbols may follow it.
    CertificateCheck,
    /// Rewind to the left blank.
    BackToBeginning,
    Base(S),
}

/// `base`, preceded by a scan that rejects any tape whose certificate segment holds a symbol
/// other than `T`/`F`. The base machine starts on cell 0, as if it had been started directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InputCheck<V> {
    base: V,
}

impl<V: VerifierSpec> InputCheck<V> {
    pub fn new(base: V) -> Self {
        InputCheck { base }
    }

    pub fn base(&self) -> &V {
        &self.base
    }
}

impl<V: VerifierSpec> VerifierSpec for InputCheck<V> {
    type State = Checked<V::State>;

    fn name(&self) -> String {
        format!("{}+input-check", self.base.name())
    }

    fn alphabet(&self) -> Vec<Symbol> {
        let mut symbols = self.base.alphabet();
        symbols.extend(CERTIFICATE_SYMBOLS);
        symbols.push(TERMINATOR);
        symbols
    }

    fn states(&self) -> Vec<Self::State> {
        let mut states = vec![
            Checked::InputCheck,
            Checked::CertificateCheck,
            Checked::BackToBeginning,
        ];
        states.extend(self.base.states().into_iter().map(Checked::Base));
        states
    }

    fn start(&self) -> Self::State {
        Checked::InputCheck
    }

    fn accept(&self) -> Self::State {
        Checked::Base(self.base.accept())
    }

    fn reject(&self) -> Self::State {
        Checked::Base(self.base.reject())
    }

    fn delta(&self, q: Self::State, r: Symbol) -> Option<(Self::State, Symbol, Dir)> {
        match q {
            Checked::InputCheck => match r {
                TERMINATOR => Some((Checked::CertificateCheck, r, Dir::R)),
                BLANK => None,
                _ => Some((q, r, Dir::R)),
            },
            Checked::CertificateCheck => match r {
                BLANK => Some((Checked::BackToBeginning, r, Dir::L)),
                _ if CERTIFICATE_SYMBOLS.contains(&r) => Some((q, r, Dir::R)),
                _ => Some((self.reject(), r, Dir::L)),
            },
            Checked::BackToBeginning => match r {
                BLANK => Some((Checked::Base(self.base.start()), r, Dir::R)),
                _ => Some((q, r, Dir::L)),
            },
            Checked::Base(q) => self
                .base
                .delta(q, r)
                .map(|(t, w, d)| (Checked::Base(t), w, d)),
        }
    }

    fn label(&self, q: Self::State) -> String {
        match q {
            Checked::Base(q) => self.base.label(q),
            q => format!("{:?}", q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Outcome, Tape};
    use crate::verifiers::{build, SatDynamic, SatFixed, SubsetSum};

    #[test]
    fn test_wrapped_tables() {
        let base = build(&SubsetSum).unwrap();
        let checked = build(&InputCheck::new(SubsetSum)).unwrap();
        assert_eq!(checked.table.len(), base.table.len() + 3);
        assert_eq!(checked.table.label(checked.start), "InputCheck");
        assert_eq!(checked.table.label(checked.accept), "Accept");
        assert_eq!(checked.name, "subset-sum+input-check");
        let dynamic = build(&InputCheck::new(SatDynamic::new(4).unwrap())).unwrap();
        assert_eq!(dynamic.table.state("Dec.4"), Some(3 + 8 + 13));
    }

    #[test]
    fn test_same_verdicts() {
        let machine = build(&InputCheck::new(SatFixed)).unwrap();
        let run = |tape| machine.run(Tape::from(tape), 100_000);
        assert_eq!(run("1_2#TF").outcome, Outcome::Accept);
        assert_eq!(run("1_2#TF").steps, 30);
        assert_eq!(run("1&-1#T").outcome, Outcome::Reject);
        let machine = build(&InputCheck::new(SubsetSum)).unwrap();
        assert_eq!(machine.run(Tape::from("3_7_2&5#TFT"), 100_000).outcome, Outcome::Accept);
    }

    #[test]
    fn test_bad_certificate_symbols() {
        let machine = build(&InputCheck::new(SatFixed)).unwrap();
        // `2` is in the machine alphabet; `X` is not. Both reject before verification starts.
        for tape in ["1_2#T2", "1_2#TX", "1_2"] {
            let walk = machine.run(Tape::from(tape), 100_000);
            assert_eq!(walk.outcome, Outcome::Reject, "{tape}");
            assert!(walk.steps <= tape.len() as u64 + 1);
        }
    }
}
