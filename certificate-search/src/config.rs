//! Search settings, loadable from a JSON file. Every field has a default.

use crate::core::Error;
use crate::verifiers::StepPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// How the step bound grows with the tape length.
    pub step_policy: StepPolicy,
    /// Feasibility pruning; off means exhaustive enumeration.
    pub pruning: bool,
    /// Run the input-check phase before each verification.
    pub input_check: bool,
    /// Defaults to one symbol per variable (SAT) or element (Subset-Sum).
    pub certificate_length: Option<usize>,
    /// A fixed step bound, overriding `step_policy`.
    pub step_bound: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            step_policy: StepPolicy::default(),
            pruning: true,
            input_check: false,
            certificate_length: None,
            step_bound: None,
        }
    }
}

impl SearchConfig {
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: SearchConfig = serde_json::from_str(text)?;
        config.step_policy.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
