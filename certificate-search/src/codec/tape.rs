//! The tape string format: `instance#certificate`.
//!
//! SAT instances are clauses of signed literals, `1_2&-1_3#TFT`: literals separated by `_`,
//! clauses by `&`. Subset-Sum instances are the element list and the target, `3_7_2&5#TFT`.
//! The certificate is one `T`/`F` per variable (SAT) or per element (Subset-Sum).

use crate::core::{
    Symbol, TapeFormatError, CERTIFICATE_SYMBOLS, FALSE, FIELD_SEP, GROUP_SEP, NEGATION,
    TERMINATOR, TRUE,
};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which kind of instance a tape encodes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Family {
    Sat,
    SubsetSum,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Family::Sat => "SAT",
            Family::SubsetSum => "Subset-Sum",
        }
    }

    /// Whether `c` may appear in the instance segment of this family's tapes.
    fn allows(self, c: char) -> bool {
        match c {
            '0'..='9' | '_' | '&' => true,
            '-' => self == Family::Sat,
            _ => false,
        }
    }
}

/// A candidate witness: one certificate symbol per variable or element.
#[derive(SerializeDisplay, DeserializeFromStr, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Certificate {
    symbols: Vec<Symbol>,
}

impl Certificate {
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Certificate {
        Certificate {
            symbols: bits.into_iter().map(|b| if b { TRUE } else { FALSE }).collect(),
        }
    }

    /// A certificate from indices into `CERTIFICATE_SYMBOLS`.
    pub fn from_digits(digits: &[u8]) -> Certificate {
        Certificate {
            symbols: digits.iter().map(|&d| CERTIFICATE_SYMBOLS[d as usize]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The value at position `i` (variable `i+1`, or element `i`), if the certificate covers it.
    pub fn bit(&self, i: usize) -> Option<bool> {
        self.symbols.get(i).map(|&s| s == TRUE)
    }
}

impl FromStr for Certificate {
    type Err = TapeFormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let symbols = text
            .char_indices()
            .map(|(position, c)| match c {
                'T' | 'F' => Ok(c as Symbol),
                symbol => Err(TapeFormatError::BadCertificateSymbol { symbol, position }),
            })
            .collect::<Result<_, _>>()?;
        Ok(Certificate { symbols })
    }
}

impl Display for Certificate {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.symbols))
    }
}

/// A CNF formula: a conjunction of clauses, each a disjunction of literals.
/// Literal `v` is variable `v` (1-based); `-v` is its negation.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct CnfFormula {
    pub clauses: Vec<Vec<i64>>,
}

impl CnfFormula {
    pub fn new(clauses: Vec<Vec<i64>>) -> CnfFormula {
        CnfFormula { clauses }
    }

    /// The largest variable index mentioned.
    pub fn max_variable(&self) -> u64 {
        self.clauses
            .iter()
            .flatten()
            .map(|l| l.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Whether every clause has a true literal. Variables the certificate does not cover
    /// make no literal true.
    pub fn evaluate(&self, certificate: &Certificate) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&l| {
                let value = certificate.bit(l.unsigned_abs() as usize - 1);
                value.is_some_and(|v| v == (l > 0))
            })
        })
    }
}

/// A Subset-Sum instance: is there a sub-multiset of `elements` summing to `target`?
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct SubsetSumInstance {
    pub elements: Vec<u64>,
    pub target: u64,
}

impl SubsetSumInstance {
    pub fn new(elements: Vec<u64>, target: u64) -> SubsetSumInstance {
        SubsetSumInstance { elements, target }
    }

    /// Whether the certificate has one bit per element and the selected elements hit the target.
    pub fn evaluate(&self, certificate: &Certificate) -> bool {
        certificate.len() == self.elements.len()
            && self
                .elements
                .iter()
                .enumerate()
                .filter(|&(i, _)| certificate.bit(i) == Some(true))
                .map(|(_, &e)| e as u128)
                .sum::<u128>()
                == self.target as u128
    }
}

/// A problem instance of either family.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum Instance {
    Sat(CnfFormula),
    SubsetSum(SubsetSumInstance),
}

impl Instance {
    pub fn family(&self) -> Family {
        match self {
            Instance::Sat(_) => Family::Sat,
            Instance::SubsetSum(_) => Family::SubsetSum,
        }
    }

    /// The largest absolute number on the instance tape.
    pub fn magnitude(&self) -> u64 {
        match self {
            Instance::Sat(cnf) => cnf.max_variable(),
            Instance::SubsetSum(ss) => ss.elements.iter().copied().chain([ss.target]).max().unwrap_or(0),
        }
    }

    /// The certificate length the verifiers expect: one symbol per variable or element.
    pub fn certificate_length(&self) -> usize {
        match self {
            Instance::Sat(cnf) => cnf.max_variable() as usize,
            Instance::SubsetSum(ss) => ss.elements.len(),
        }
    }

    /// Evaluate a certificate directly, without a machine.
    pub fn evaluate(&self, certificate: &Certificate) -> bool {
        match self {
            Instance::Sat(cnf) => cnf.evaluate(certificate),
            Instance::SubsetSum(ss) => ss.evaluate(certificate),
        }
    }

    /// The full tape string for this instance and a certificate.
    pub fn tape(&self, certificate: &Certificate) -> String {
        format!("{}{}", self, certificate)
    }
}

fn join<T: Display>(items: &[T], sep: Symbol) -> String {
    let parts: Vec<String> = items.iter().map(|x| x.to_string()).collect();
    parts.join(&(sep as char).to_string())
}

/// The instance segment, `#` included.
impl Display for Instance {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Instance::Sat(cnf) => {
                let clauses: Vec<String> = cnf.clauses.iter().map(|c| join(c, FIELD_SEP)).collect();
                write!(f, "{}", clauses.join(&(GROUP_SEP as char).to_string()))?;
            }
            Instance::SubsetSum(ss) => {
                write!(f, "{}{}{}", join(&ss.elements, FIELD_SEP), GROUP_SEP as char, ss.target)?;
            }
        }
        write!(f, "{}", TERMINATOR as char)
    }
}

/// Split `text` (starting at byte `offset` of the tape) on `sep`, keeping positions.
fn split(text: &str, offset: usize, sep: Symbol) -> Vec<(usize, &str)> {
    let mut start = 0;
    let mut parts = vec![];
    for (i, b) in text.bytes().enumerate() {
        if b == sep {
            parts.push((offset + start, &text[start..i]));
            start = i + 1;
        }
    }
    parts.push((offset + start, &text[start..]));
    parts
}

/// The fields of a non-empty group; empty fields are doubled or dangling separators.
fn fields(group: &str, offset: usize) -> Result<Vec<(usize, &str)>, TapeFormatError> {
    let fields = split(group, offset, FIELD_SEP);
    match fields.iter().find(|(_, text)| text.is_empty()) {
        Some(&(position, _)) => Err(TapeFormatError::EmptyField(position)),
        None => Ok(fields),
    }
}

fn unsigned(position: usize, text: &str) -> Result<u64, TapeFormatError> {
    let bad = || TapeFormatError::BadNumber {
        text: text.to_string(),
        position,
    };
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    text.parse().map_err(|_| bad())
}

fn literal(position: usize, text: &str) -> Result<i64, TapeFormatError> {
    let (negated, digits) = match text.strip_prefix(NEGATION as char) {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let v = unsigned(position, digits).map_err(|_| TapeFormatError::BadNumber {
        text: text.to_string(),
        position,
    })?;
    match i64::try_from(v) {
        Ok(0) => Err(TapeFormatError::ZeroLiteral(position)),
        Ok(v) => Ok(if negated { -v } else { v }),
        Err(_) => Err(TapeFormatError::BadNumber {
            text: text.to_string(),
            position,
        }),
    }
}

fn decode_sat(text: &str) -> Result<CnfFormula, TapeFormatError> {
    let clauses = split(text, 0, GROUP_SEP)
        .into_iter()
        .map(|(offset, group)| {
            if group.is_empty() {
                return Err(TapeFormatError::EmptyField(offset));
            }
            fields(group, offset)?
                .into_iter()
                .map(|(position, field)| literal(position, field))
                .collect()
        })
        .collect::<Result<_, _>>()?;
    Ok(CnfFormula { clauses })
}

fn decode_subset_sum(text: &str) -> Result<SubsetSumInstance, TapeFormatError> {
    let groups = split(text, 0, GROUP_SEP);
    let [(element_offset, elements), (target_offset, target)] = groups[..] else {
        return Err(TapeFormatError::BadGroupCount(groups.len()));
    };
    let elements = if elements.is_empty() {
        vec![]
    } else {
        fields(elements, element_offset)?
            .into_iter()
            .map(|(position, field)| unsigned(position, field))
            .collect::<Result<_, _>>()?
    };
    let target = unsigned(target_offset, target)?;
    Ok(SubsetSumInstance { elements, target })
}

/// Decode and validate a tape string. The certificate segment may be empty.
pub fn decode(family: Family, text: &str) -> Result<(Instance, Certificate), TapeFormatError> {
    let end = text.find(TERMINATOR as char).ok_or(TapeFormatError::Unterminated)?;
    let (instance, certificate) = (&text[..end], &text[end + 1..]);
    if let Some(extra) = certificate.find(TERMINATOR as char) {
        return Err(TapeFormatError::ExtraTerminator(end + 1 + extra));
    }
    if let Some((position, symbol)) = instance.char_indices().find(|&(_, c)| !family.allows(c)) {
        return Err(TapeFormatError::BadSymbol {
            symbol,
            position,
            family: family.name(),
        });
    }
    let certificate = Certificate::from_str(certificate).map_err(|e| match e {
        TapeFormatError::BadCertificateSymbol { symbol, position } => {
            TapeFormatError::BadCertificateSymbol {
                symbol,
                position: end + 1 + position,
            }
        }
        e => e,
    })?;
    let instance = match family {
        Family::Sat => Instance::Sat(decode_sat(instance)?),
        Family::SubsetSum => Instance::SubsetSum(decode_subset_sum(instance)?),
    };
    Ok((instance, certificate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sat_encoding() {
        let (instance, cert) = decode(Family::Sat, "-1_3_5&5_2_1&7_9_10&-6_1_-4&2_-6_1#TTF").unwrap();
        let cnf = CnfFormula::new(vec![
            vec![-1, 3, 5],
            vec![5, 2, 1],
            vec![7, 9, 10],
            vec![-6, 1, -4],
            vec![2, -6, 1],
        ]);
        assert_eq!(instance, Instance::Sat(cnf));
        assert_eq!(cert, Certificate::from_bits([true, true, false]));
        assert_eq!(instance.magnitude(), 10);
        assert_eq!(instance.certificate_length(), 10);
        assert_eq!(instance.tape(&cert), "-1_3_5&5_2_1&7_9_10&-6_1_-4&2_-6_1#TTF");
        // Leading zeros are accepted and dropped on re-encoding.
        let (instance, _) = decode(Family::Sat, "01_-002#").unwrap();
        assert_eq!(instance.to_string(), "1_-2#");
    }

    #[test]
    fn test_subset_sum_encoding() {
        let (instance, cert) = decode(Family::SubsetSum, "3_7_2&5#TFT").unwrap();
        assert_eq!(instance, Instance::SubsetSum(SubsetSumInstance::new(vec![3, 7, 2], 5)));
        assert!(instance.evaluate(&cert));
        assert_eq!(instance.magnitude(), 7);
        let (empty, cert) = decode(Family::SubsetSum, "&0#").unwrap();
        assert_eq!(empty, Instance::SubsetSum(SubsetSumInstance::new(vec![], 0)));
        assert!(empty.evaluate(&cert));
        assert_eq!(empty.to_string(), "&0#");
    }

    #[test]
    fn test_format_errors() {
        use TapeFormatError::*;
        let sat = |text| decode(Family::Sat, text).unwrap_err();
        let ss = |text| decode(Family::SubsetSum, text).unwrap_err();
        assert_eq!(sat("1_2&-1_3"), Unterminated);
        assert_eq!(sat("1_2#TF#"), ExtraTerminator(6));
        assert_eq!(
            sat("1_x#"),
            BadSymbol {
                symbol: 'x',
                position: 2,
                family: "SAT"
            }
        );
        assert_eq!(
            sat("1_2#TX"),
            BadCertificateSymbol {
                symbol: 'X',
                position: 5
            }
        );
        assert_eq!(sat("1__2#"), EmptyField(2));
        assert_eq!(sat("1_2&&3#"), EmptyField(4));
        assert_eq!(sat("1_2&#"), EmptyField(4));
        assert_eq!(
            sat("1-2#"),
            BadNumber {
                text: "1-2".to_string(),
                position: 0
            }
        );
        assert_eq!(sat("3_-0#"), ZeroLiteral(2));
        assert_eq!(
            ss("-3&5#"),
            BadSymbol {
                symbol: '-',
                position: 0,
                family: "Subset-Sum"
            }
        );
        assert_eq!(ss("3_7_2#"), BadGroupCount(1));
        assert_eq!(ss("3&7&2#"), BadGroupCount(3));
        assert_eq!(ss("3_&5#"), EmptyField(2));
        assert_eq!(
            ss("3&5_1#"),
            BadNumber {
                text: "5_1".to_string(),
                position: 2
            }
        );
    }

    #[test]
    fn test_evaluate() {
        let cnf = CnfFormula::new(vec![vec![1, 2], vec![-1, 3]]);
        assert!(cnf.evaluate(&"TFT".parse().unwrap()));
        assert!(!cnf.evaluate(&"TFF".parse().unwrap()));
        // Uncovered variables make no literal true.
        assert!(!CnfFormula::new(vec![vec![2]]).evaluate(&"T".parse().unwrap()));
        let ss = SubsetSumInstance::new(vec![3, 7, 2], 5);
        assert!(!ss.evaluate(&"TF".parse().unwrap()));
        assert!(!ss.evaluate(&"TTF".parse().unwrap()));
        let cert: Certificate = serde_json::from_str(r#""FTT""#).unwrap();
        assert_eq!(serde_json::to_string(&cert).unwrap(), r#""FTT""#);
        assert!(serde_json::from_str::<Certificate>(r#""FTX""#).is_err());
    }
}
