//! Checking one certificate against a verifier machine under a step budget.

use crate::codec::{decode, Certificate, Family, Instance};
use crate::core::{walk, ConfigurationError, Error, Machine, Tape, Walk};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

/// The step bound of a walk over a tape of length `n`: `coefficient * n^exponent + offset`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StepPolicy {
    pub coefficient: u64,
    pub exponent: u32,
    pub offset: u64,
}

impl Default for StepPolicy {
    fn default() -> Self {
        StepPolicy {
            coefficient: 4,
            exponent: 2,
            offset: 16,
        }
    }
}

impl StepPolicy {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.coefficient == 0 {
            return Err(ConfigurationError::BadStepPolicy);
        }
        Ok(())
    }

    /// The bound for a tape of `n` cells. Saturates rather than overflowing.
    pub fn bound(&self, n: usize) -> u64 {
        (n as u64)
            .saturating_pow(self.exponent)
            .saturating_mul(self.coefficient)
            .saturating_add(self.offset)
    }
}

/// A verifier machine bound to the instance family it reads and to a step budget.
#[derive(Clone, Debug)]
pub struct CertificateVerifier {
    machine: Rc<Machine>,
    family: Family,
    policy: StepPolicy,
    step_bound: Option<u64>,
}

impl CertificateVerifier {
    pub fn new(machine: Rc<Machine>, family: Family) -> Self {
        CertificateVerifier {
            machine,
            family,
            policy: StepPolicy::default(),
            step_bound: None,
        }
    }

    pub fn with_policy(mut self, policy: StepPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// A fixed bound overrides the policy.
    pub fn with_step_bound(mut self, step_bound: Option<u64>) -> Self {
        self.step_bound = step_bound;
        self
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn step_bound(&self, tape_len: usize) -> u64 {
        self.step_bound.unwrap_or_else(|| self.policy.bound(tape_len))
    }

    /// Check that this verifier reads `instance`'s family.
    pub fn accepts_family(&self, instance: &Instance) -> Result<(), ConfigurationError> {
        if instance.family() == self.family {
            Ok(())
        } else {
            Err(ConfigurationError::InstanceMismatch {
                kind: self.machine.name.clone(),
                family: instance.family().name(),
            })
        }
    }

    /// Walk the machine over `instance#certificate`.
    pub fn verify(&self, instance: &Instance, certificate: &Certificate) -> Result<Walk, ConfigurationError> {
        self.accepts_family(instance)?;
        Ok(self.run(instance, certificate))
    }

    /// `verify`, for callers that already checked the instance family.
    pub fn run(&self, instance: &Instance, certificate: &Certificate) -> Walk {
        let tape = instance.tape(certificate);
        let bound = self.step_bound(tape.len());
        walk(&self.machine, Tape::from(tape.as_str()), self.machine.start, bound)
    }

    /// Decode and validate a raw tape string, then walk its canonical form.
    pub fn verify_tape(&self, text: &str) -> Result<Walk, Error> {
        let (instance, certificate) = decode(self.family, text)?;
        let walk = self.verify(&instance, &certificate)?;
        debug!(machine = %self.machine.name, outcome = %walk.outcome, steps = walk.steps, "verified tape");
        Ok(walk)
    }
}
