//! Define the tape alphabet, the state index type, and the hard limits on tables and searches.

/// A TM tape symbol: one byte of the tape string.
pub type Symbol = u8;
/// A number indexing a TM state in a `TransitionTable`.
pub type StateId = u16;

/// The blank symbol filling the tape outside the input. It never occurs in a tape string.
pub const BLANK: Symbol = b' ';
/// Separates the numbers of a group (the literals of a clause, or the subset-sum elements).
pub const FIELD_SEP: Symbol = b'_';
/// Separates groups (clauses, or the element list from the target).
pub const GROUP_SEP: Symbol = b'&';
/// Ends the instance segment; the certificate segment follows it.
pub const TERMINATOR: Symbol = b'#';
/// Marks a negated literal.
pub const NEGATION: Symbol = b'-';
/// Certificate symbol for "false" / "excluded".
pub const FALSE: Symbol = b'F';
/// Certificate symbol for "true" / "included".
pub const TRUE: Symbol = b'T';
/// The certificate alphabet, in search order: every position tries `F` before `T`.
pub const CERTIFICATE_SYMBOLS: [Symbol; 2] = [FALSE, TRUE];
/// The decimal digits, in value order.
pub const DIGITS: [Symbol; 10] = *b"0123456789";

/// The maximum number of states a table can index.
/// (Entry value 0 is reserved for "undefined", see `Trans`.)
pub const MAX_STATES: usize = StateId::MAX as usize;

/// The longest certificate a search will enumerate. The search keeps one summary per position.
pub const MAX_CERTIFICATE_LENGTH: usize = 1 << 16;

/// Whether `s` is a decimal digit.
pub fn is_digit(s: Symbol) -> bool {
    s.is_ascii_digit()
}

/// The value of a decimal digit symbol.
pub fn digit_value(s: Symbol) -> u8 {
    s - b'0'
}
