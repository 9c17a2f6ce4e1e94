//! Read DIMACS CNF files into a `CnfFormula`.

use super::CnfFormula;
use crate::core::TapeFormatError;
use tracing::{debug, warn};

/// The `p cnf <variables> <clauses>` header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Header {
    variables: u64,
    clauses: usize,
}

fn bad(line: usize, reason: impl Into<String>) -> TapeFormatError {
    TapeFormatError::BadDimacs {
        line,
        reason: reason.into(),
    }
}

fn parse_header(line: usize, text: &str) -> Result<Header, TapeFormatError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    match words[..] {
        ["p", "cnf", variables, clauses] => {
            let variables = variables
                .parse()
                .map_err(|_| bad(line, format!("bad variable count {variables:?}")))?;
            let clauses = clauses
                .parse()
                .map_err(|_| bad(line, format!("bad clause count {clauses:?}")))?;
            Ok(Header { variables, clauses })
        }
        _ => Err(bad(line, "expected `p cnf <variables> <clauses>`")),
    }
}

/// Whether `name`/`text` should be read as DIMACS: a `.cnf` file name, or a `p cnf` header
/// as the first line that is not a comment.
pub fn looks_like_dimacs(name: &str, text: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".cnf")
        || text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('c'))
            .is_some_and(|l| l.to_ascii_lowercase().starts_with("p cnf"))
}

/// Parse a DIMACS CNF file. Clauses end with `0` and may span lines; a `%` line ends the input.
/// A final clause missing its `0` is kept. Header counts that disagree with the body are logged.
pub fn parse_dimacs(text: &str) -> Result<CnfFormula, TapeFormatError> {
    let mut header = None;
    let mut clauses = vec![];
    let mut clause = vec![];
    let mut last_line = 0;
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        last_line = line;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('c') {
            continue;
        } else if content.starts_with('%') {
            break;
        } else if content.starts_with('p') {
            if header.is_some() || !clauses.is_empty() || !clause.is_empty() {
                return Err(bad(line, "header must come before the clauses"));
            }
            header = Some(parse_header(line, content)?);
            continue;
        }
        for word in content.split_whitespace() {
            let literal: i64 = word
                .parse()
                .map_err(|_| bad(line, format!("bad literal {word:?}")))?;
            if literal != 0 {
                clause.push(literal);
            } else if clause.is_empty() {
                return Err(bad(line, "empty clause"));
            } else {
                clauses.push(std::mem::take(&mut clause));
            }
        }
    }
    if !clause.is_empty() {
        clauses.push(clause);
    }
    if clauses.is_empty() {
        return Err(bad(last_line, "no clauses"));
    }
    let cnf = CnfFormula::new(clauses);
    if let Some(h) = header {
        if h.clauses != cnf.clauses.len() {
            warn!(declared = h.clauses, found = cnf.clauses.len(), "DIMACS clause count mismatch");
        }
        if cnf.max_variable() > h.variables {
            warn!(declared = h.variables, found = cnf.max_variable(), "DIMACS variable count mismatch");
        }
    }
    debug!(clauses = cnf.clauses.len(), variables = cnf.max_variable(), "read DIMACS formula");
    Ok(cnf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let text = "c example\np cnf 3 2\n1 -2\n 3 0\n-1 2 0\n%\n0\n";
        let cnf = parse_dimacs(text).unwrap();
        assert_eq!(cnf.clauses, vec![vec![1, -2, 3], vec![-1, 2]]);
        // No header, no final 0.
        assert_eq!(parse_dimacs("1 2 0 -1").unwrap().clauses, vec![vec![1, 2], vec![-1]]);
    }

    #[test]
    fn test_errors() {
        let err = |text| match parse_dimacs(text).unwrap_err() {
            TapeFormatError::BadDimacs { line, .. } => line,
            e => panic!("unexpected error {e}"),
        };
        assert_eq!(err("p cnf 2 1\n1 x 0\n"), 2);
        assert_eq!(err("1 0\n0\n"), 2);
        assert_eq!(err("p cnf two 1\n"), 1);
        assert_eq!(err("1 0\np cnf 1 1\n"), 2);
        assert_eq!(err("c nothing\n\n"), 2);
    }

    #[test]
    fn test_detection() {
        assert!(looks_like_dimacs("uf20.CNF", "1 0"));
        assert!(looks_like_dimacs("input.txt", "c hi\n\np cnf 1 1\n1 0\n"));
        assert!(!looks_like_dimacs("input.txt", "1_2&-1#\n"));
    }
}
