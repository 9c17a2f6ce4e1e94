//! Simulated Turing-machine verifiers for SAT and Subset-Sum, and a pruned search over their
//! certificates.
//!
//! A verifier reads `instance#certificate` and halts in its accept state iff the certificate
//! witnesses the instance. [`decide`] asks whether any certificate of a given length is accepted.

pub mod codec;
pub mod config;
pub mod core;
pub mod search;
pub mod verifiers;

pub use crate::codec::{Certificate, Instance};
pub use crate::config::SearchConfig;
pub use crate::core::{ConfigurationError, Error, Outcome, TapeFormatError, Walk};
pub use crate::search::{decide, decide_with, Decision, Search, SearchReport, SearchStats};
pub use crate::verifiers::{build_machine, ProblemKind, TableCache};
