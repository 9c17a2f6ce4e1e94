//! Errors raised to the immediate caller. None of them is transient: they all indicate bad input.

use thiserror::Error;

/// A problem with how a machine or a search was configured.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown problem kind {0:?} (expected sat-fixed, sat-dynamic or subset-sum)")]
    UnknownProblemKind(String),
    #[error("the {0} verifier needs the tape's maximum magnitude")]
    MissingMagnitude(&'static str),
    #[error("magnitude {0} is negative")]
    NegativeMagnitude(i64),
    #[error("magnitude {0:?} is not an integer")]
    NonIntegralMagnitude(String),
    #[error("{states} states do not fit a transition table (limit {limit})")]
    TooManyStates { states: usize, limit: usize },
    #[error("transition from {from} leads to {to}, which is not a declared state")]
    DanglingState { from: String, to: String },
    #[error("the {kind} verifier cannot read a {family} instance")]
    InstanceMismatch { kind: String, family: &'static str },
    #[error("step policy coefficient must be positive")]
    BadStepPolicy,
    #[error("certificates of length {length} are too long to search (limit {limit})")]
    CertificateTooLong { length: usize, limit: usize },
}

/// A malformed tape string or CNF file. Reported before any walk begins.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TapeFormatError {
    #[error("tape is not terminated by `#`")]
    Unterminated,
    #[error("unexpected `#` at position {0}; a tape has exactly one terminator")]
    ExtraTerminator(usize),
    #[error("symbol {symbol:?} at position {position} is outside the {family} alphabet")]
    BadSymbol {
        symbol: char,
        position: usize,
        family: &'static str,
    },
    #[error("certificate symbol {symbol:?} at position {position} is neither `T` nor `F`")]
    BadCertificateSymbol { symbol: char, position: usize },
    #[error("empty field at position {0} (doubled or dangling separator)")]
    EmptyField(usize),
    #[error("malformed number {text:?} at position {position}")]
    BadNumber { text: String, position: usize },
    #[error("literal 0 at position {0} does not name a variable")]
    ZeroLiteral(usize),
    #[error("a subset-sum tape holds elements `&` target, found {0} group(s)")]
    BadGroupCount(usize),
    #[error("DIMACS line {line}: {reason}")]
    BadDimacs { line: usize, reason: String },
}

/// Everything the library can fail with.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    TapeFormat(#[from] TapeFormatError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("bad configuration file: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = TapeFormatError::BadSymbol {
            symbol: 'x',
            position: 3,
            family: "SAT",
        };
        assert_eq!(e.to_string(), "symbol 'x' at position 3 is outside the SAT alphabet");
        let e: Error = ConfigurationError::NegativeMagnitude(-2).into();
        assert_eq!(e.to_string(), "magnitude -2 is negative");
        assert!(matches!(Error::from(TapeFormatError::Unterminated), Error::TapeFormat(_)));
    }
}
