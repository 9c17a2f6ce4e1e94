//! The verification walk: run one machine on one tape until it halts or runs out of steps.

use super::{Configuration, Machine, StateId, Tape};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::trace;

/// How a walk ended. `StepBoundExceeded` is inconclusive, not an error.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Accept,
    Reject,
    StepBoundExceeded,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The result of a walk.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub struct Walk {
    pub outcome: Outcome,
    pub steps: u64,
}

/// Run `machine` on `tape` from `start`, with the head on cell 0.
/// The bound is checked before every step, so a looping table cannot hang the caller.
pub fn walk(machine: &Machine, tape: Tape, start: StateId, step_bound: u64) -> Walk {
    let mut config = Configuration::new(start, tape);
    trace!(
        machine = %machine.name,
        start = machine.table.label(start),
        step_bound,
        "walk started"
    );
    let outcome = loop {
        if config.state == machine.accept {
            break Outcome::Accept;
        } else if config.state == machine.reject {
            break Outcome::Reject;
        } else if config.steps >= step_bound {
            break Outcome::StepBoundExceeded;
        }
        config.step(machine);
    };
    trace!(
        machine = %machine.name,
        %outcome,
        steps = config.steps,
        head = config.head,
        "walk halted"
    );
    Walk {
        outcome,
        steps: config.steps,
    }
}

impl Machine {
    /// Walk from the machine's own start state.
    pub fn run(&self, tape: Tape, step_bound: u64) -> Walk {
        walk(self, tape, self.start, step_bound)
    }
}
