//! A per-process cache of built verifier tables.

use super::{build_verifier, ProblemKind};
use crate::core::{ConfigurationError, Machine};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Built machines, per problem kind, input-check flag and (for the dynamic kind) magnitude.
/// Tables are immutable once built, so sequential runs in one process share them.
#[derive(Default)]
pub struct TableCache {
    machines: HashMap<(ProblemKind, bool, Option<i64>), Rc<Machine>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        kind: ProblemKind,
        magnitude: Option<i64>,
        input_check: bool,
    ) -> Result<Rc<Machine>, ConfigurationError> {
        let key = (kind, input_check, magnitude.filter(|_| kind.is_dynamic()));
        if let Some(machine) = self.machines.get(&key) {
            return Ok(machine.clone());
        }
        let machine = Rc::new(build_verifier(kind, magnitude, input_check)?);
        debug!(%kind, input_check, ?magnitude, cached = self.machines.len(), "caching new table");
        self.machines.insert(key, machine.clone());
        Ok(machine)
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuse() {
        let mut cache = TableCache::new();
        let a = cache.get(ProblemKind::SatFixed, Some(3), false).unwrap();
        let b = cache.get(ProblemKind::SatFixed, Some(9), false).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        let c = cache.get(ProblemKind::SatFixed, None, true).unwrap();
        assert!(!Rc::ptr_eq(&a, &c));
        let d3 = cache.get(ProblemKind::SatDynamic, Some(3), false).unwrap();
        let d4 = cache.get(ProblemKind::SatDynamic, Some(4), false).unwrap();
        assert!(!Rc::ptr_eq(&d3, &d4));
        assert!(Rc::ptr_eq(&d3, &cache.get(ProblemKind::SatDynamic, Some(3), false).unwrap()));
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = TableCache::new();
        assert!(cache.get(ProblemKind::SatDynamic, None, false).is_err());
        assert!(cache.get(ProblemKind::SatDynamic, Some(-5), false).is_err());
        assert!(cache.is_empty());
    }
}
