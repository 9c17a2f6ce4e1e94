//! Feasibility policies: incremental summaries of certificate prefixes, and the test that discards
//! a prefix once no completion of it can be accepted.

use crate::codec::{CnfFormula, SubsetSumInstance};
use crate::core::{Symbol, TRUE};
use std::collections::HashMap;

/// A pruning policy over certificate prefixes.
///
/// `extend` returns `None` exactly when the extended prefix is infeasible; it must only do so when
/// the verifier rejects every completion of that prefix.
pub trait Feasibility {
    type Summary: Clone;

    fn name(&self) -> &'static str;
    /// The summary of the empty prefix, or `None` if nothing at all can be accepted.
    fn root(&self) -> Option<Self::Summary>;
    /// The summary after writing `symbol` at `position`.
    fn extend(&self, parent: &Self::Summary, position: usize, symbol: Symbol) -> Option<Self::Summary>;
}

/// Never prunes. The reference policy for comparisons.
pub struct Exhaustive;

impl Feasibility for Exhaustive {
    type Summary = ();

    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn root(&self) -> Option<()> {
        Some(())
    }

    fn extend(&self, _: &(), _: usize, _: Symbol) -> Option<()> {
        Some(())
    }
}

/// Per clause: whether some assigned literal is true, and how many occurrences are unassigned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClauseStatus {
    pub satisfied: Vec<bool>,
    pub unassigned: Vec<usize>,
}

/// Prunes as soon as some clause has all of its literals assigned false.
pub struct SatFeasibility {
    /// Certificate position `p` (variable `p+1`) -> its occurrences as (clause, is-positive).
    occurrences: HashMap<usize, Vec<(usize, bool)>>,
    sizes: Vec<usize>,
}

impl SatFeasibility {
    pub fn new(cnf: &CnfFormula) -> Self {
        let mut occurrences: HashMap<usize, Vec<(usize, bool)>> = HashMap::new();
        for (c, clause) in cnf.clauses.iter().enumerate() {
            for &l in clause {
                let position = l.unsigned_abs() as usize - 1;
                occurrences.entry(position).or_default().push((c, l > 0));
            }
        }
        let sizes = cnf.clauses.iter().map(Vec::len).collect();
        SatFeasibility { occurrences, sizes }
    }
}

impl Feasibility for SatFeasibility {
    type Summary = ClauseStatus;

    fn name(&self) -> &'static str {
        "sat"
    }

    fn root(&self) -> Option<ClauseStatus> {
        // Empty clauses are rejected by the codec; an empty one here could never be satisfied.
        if self.sizes.contains(&0) {
            return None;
        }
        Some(ClauseStatus {
            satisfied: vec![false; self.sizes.len()],
            unassigned: self.sizes.clone(),
        })
    }

    fn extend(&self, parent: &ClauseStatus, position: usize, symbol: Symbol) -> Option<ClauseStatus> {
        let Some(occurrences) = self.occurrences.get(&position) else {
            return Some(parent.clone());
        };
        let value = symbol == TRUE;
        let mut status = parent.clone();
        for &(c, positive) in occurrences {
            status.unassigned[c] -= 1;
            status.satisfied[c] |= positive == value;
        }
        let falsified = occurrences
            .iter()
            .any(|&(c, _)| !status.satisfied[c] && status.unassigned[c] == 0);
        (!falsified).then_some(status)
    }
}

/// Prunes when the target is out of reach of the remaining elements, or past the last element.
pub struct SubsetSumFeasibility {
    elements: Vec<i128>,
    target: i128,
    /// `[p]`: the sum of the negative (resp. positive) elements from position `p` on.
    negative_suffix: Vec<i128>,
    positive_suffix: Vec<i128>,
}

impl SubsetSumFeasibility {
    pub fn new(instance: &SubsetSumInstance) -> Self {
        let elements: Vec<i128> = instance.elements.iter().map(|&e| e as i128).collect();
        let mut negative_suffix = vec![0; elements.len() + 1];
        let mut positive_suffix = vec![0; elements.len() + 1];
        for (p, &e) in elements.iter().enumerate().rev() {
            negative_suffix[p] = negative_suffix[p + 1] + e.min(0);
            positive_suffix[p] = positive_suffix[p + 1] + e.max(0);
        }
        SubsetSumFeasibility {
            elements,
            target: instance.target as i128,
            negative_suffix,
            positive_suffix,
        }
    }

    fn reachable(&self, partial: i128, from: usize) -> bool {
        (partial + self.negative_suffix[from]..=partial + self.positive_suffix[from]).contains(&self.target)
    }
}

impl Feasibility for SubsetSumFeasibility {
    type Summary = i128;

    fn name(&self) -> &'static str {
        "subset-sum"
    }

    fn root(&self) -> Option<i128> {
        self.reachable(0, 0).then_some(0)
    }

    fn extend(&self, partial: &i128, position: usize, symbol: Symbol) -> Option<i128> {
        let &element = self.elements.get(position)?;
        let partial = if symbol == TRUE { partial + element } else { *partial };
        self.reachable(partial, position + 1).then_some(partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FALSE;

    #[test]
    fn test_sat_pruning() {
        // (x1 v x2) ^ (~x1)
        let f = SatFeasibility::new(&CnfFormula::new(vec![vec![1, 2], vec![-1]]));
        let root = f.root().unwrap();
        assert_eq!(root.unassigned, [2, 1]);
        assert_eq!(f.extend(&root, 0, TRUE), None);
        let x1 = f.extend(&root, 0, FALSE).unwrap();
        assert_eq!(x1.satisfied, [false, true]);
        assert_eq!(f.extend(&x1, 1, FALSE), None);
        let x2 = f.extend(&x1, 1, TRUE).unwrap();
        assert_eq!(x2.satisfied, [true, true]);
        // Positions past the last variable change nothing.
        assert_eq!(f.extend(&x2, 2, FALSE), Some(x2));
    }

    #[test]
    fn test_sat_repeated_variables() {
        // (x1 v ~x1) is a tautology; (x2 v x2) needs x2.
        let f = SatFeasibility::new(&CnfFormula::new(vec![vec![1, -1], vec![2, 2]]));
        let root = f.root().unwrap();
        let x1 = f.extend(&root, 0, FALSE).unwrap();
        assert_eq!(x1.satisfied, [true, false]);
        assert_eq!(f.extend(&x1, 1, FALSE), None);
        assert!(f.extend(&x1, 1, TRUE).is_some());
    }

    #[test]
    fn test_subset_sum_pruning() {
        let f = SubsetSumFeasibility::new(&SubsetSumInstance::new(vec![3, 7, 2], 5));
        let root = f.root().unwrap();
        // Excluding 3 and 7 leaves at most 2.
        let without_3 = f.extend(&root, 0, FALSE).unwrap();
        assert_eq!(f.extend(&without_3, 1, FALSE), None);
        // Including 3 and 7 overshoots.
        let with_3 = f.extend(&root, 0, TRUE).unwrap();
        assert_eq!(f.extend(&with_3, 1, TRUE), None);
        let with_3_only = f.extend(&with_3, 1, FALSE).unwrap();
        assert_eq!(f.extend(&with_3_only, 2, TRUE), Some(5));
        // No fourth element to decide.
        assert_eq!(f.extend(&5, 3, FALSE), None);
    }

    #[test]
    fn test_infeasible_root() {
        let f = SubsetSumFeasibility::new(&SubsetSumInstance::new(vec![1, 2], 4));
        assert_eq!(f.root(), None);
        assert_eq!(Exhaustive.root(), Some(()));
    }
}
