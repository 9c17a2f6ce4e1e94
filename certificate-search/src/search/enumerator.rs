//! The certificate enumerator: depth-first over certificate prefixes, pruned by a feasibility
//! policy, verifying every complete candidate that survives.

use super::{Exhaustive, Feasibility, PrefixIterator, SatFeasibility, SubsetSumFeasibility};
use crate::codec::{decode, Certificate, Instance};
use crate::config::SearchConfig;
use crate::core::{ConfigurationError, Error, Outcome, CERTIFICATE_SYMBOLS, MAX_CERTIFICATE_LENGTH};
use crate::verifiers::{CertificateVerifier, ProblemKind, TableCache};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::{debug, info, trace};

/// The answer to "does some certificate of the given length make the verifier accept?"
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum Decision {
    /// The first accepted certificate in search order.
    Yes(Certificate),
    No,
}

impl Decision {
    pub fn is_yes(&self) -> bool {
        matches!(self, Decision::Yes(_))
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        match self {
            Decision::Yes(certificate) => Some(certificate),
            Decision::No => None,
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Decision::Yes(certificate) => write!(f, "Yes {}", certificate),
            Decision::No => write!(f, "No"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Complete certificates walked by the verifier.
    pub candidates: u64,
    /// Prefixes discarded by the feasibility policy (their subtrees are never visited).
    pub pruned: u64,
    /// Walks that hit the step bound; they count as rejections.
    pub exceeded: u64,
    pub total_steps: u64,
    pub max_steps: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct SearchReport {
    pub machine: String,
    /// The canonical instance segment of the tape.
    pub instance: String,
    pub certificate_length: usize,
    pub feasibility: String,
    pub decision: Decision,
    pub stats: SearchStats,
}

/// One search: a verifier, an instance and the certificate space to cover.
pub struct Search<'a> {
    verifier: CertificateVerifier,
    instance: &'a Instance,
    length: usize,
    pruning: bool,
}

impl<'a> Search<'a> {
    /// A pruned search over certificates of the instance's natural length.
    pub fn new(verifier: CertificateVerifier, instance: &'a Instance) -> Result<Self, ConfigurationError> {
        verifier.accepts_family(instance)?;
        Search {
            verifier,
            instance,
            length: 0,
            pruning: true,
        }
        .with_length(instance.certificate_length())
    }

    /// Set up a search as `config` describes, taking the verifier table from `cache`.
    pub fn configure(
        cache: &mut TableCache,
        kind: ProblemKind,
        instance: &'a Instance,
        config: &SearchConfig,
    ) -> Result<Self, Error> {
        config.step_policy.validate()?;
        let magnitude = i64::try_from(instance.magnitude()).unwrap_or(i64::MAX);
        let machine = cache.get(kind, Some(magnitude), config.input_check)?;
        let verifier = CertificateVerifier::new(machine, kind.family())
            .with_policy(config.step_policy)
            .with_step_bound(config.step_bound);
        let search = Search::new(verifier, instance)?.with_pruning(config.pruning);
        Ok(match config.certificate_length {
            Some(length) => search.with_length(length)?,
            None => search,
        })
    }

    /// Fails for lengths above `MAX_CERTIFICATE_LENGTH`.
    pub fn with_length(mut self, length: usize) -> Result<Self, ConfigurationError> {
        if length > MAX_CERTIFICATE_LENGTH {
            return Err(ConfigurationError::CertificateTooLong {
                length,
                limit: MAX_CERTIFICATE_LENGTH,
            });
        }
        self.length = length;
        Ok(self)
    }

    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn run(&self) -> SearchReport {
        match (self.pruning, self.instance) {
            (false, _) => self.explore(&Exhaustive),
            (true, Instance::Sat(cnf)) => self.explore(&SatFeasibility::new(cnf)),
            (true, Instance::SubsetSum(ss)) => self.explore(&SubsetSumFeasibility::new(ss)),
        }
    }

    fn explore<F: Feasibility>(&self, feasibility: &F) -> SearchReport {
        let mut stats = SearchStats::default();
        let decision = self.find(feasibility, &mut stats);
        info!(
            machine = %self.verifier.machine().name,
            length = self.length,
            feasibility = feasibility.name(),
            %decision,
            candidates = stats.candidates,
            pruned = stats.pruned,
            exceeded = stats.exceeded,
            max_steps = stats.max_steps,
            "search finished"
        );
        SearchReport {
            machine: self.verifier.machine().name.clone(),
            instance: self.instance.to_string(),
            certificate_length: self.length,
            feasibility: feasibility.name().to_string(),
            decision,
            stats,
        }
    }

    fn find<F: Feasibility>(&self, feasibility: &F, stats: &mut SearchStats) -> Decision {
        let Some(root) = feasibility.root() else {
            debug!(instance = %self.instance, "no certificate can be accepted");
            return Decision::No;
        };
        if self.length == 0 {
            let certificate = Certificate::default();
            if self.check(&certificate, stats) {
                return Decision::Yes(certificate);
            }
            return Decision::No;
        }
        // `summaries[p]` summarizes the current prefix of length `p`.
        let mut summaries = vec![root];
        let mut prefixes = PrefixIterator::new(self.length, CERTIFICATE_SYMBOLS.len() as u8);
        while let Some(p) = prefixes.next() {
            let symbol = CERTIFICATE_SYMBOLS[prefixes.digits[p] as usize];
            summaries.truncate(p + 1);
            let Some(summary) = feasibility.extend(&summaries[p], p, symbol) else {
                stats.pruned += 1;
                trace!(prefix = %Certificate::from_digits(&prefixes.digits), "pruned");
                prefixes.skip_current_subtree();
                continue;
            };
            summaries.push(summary);
            if prefixes.is_complete() {
                let certificate = Certificate::from_digits(&prefixes.digits);
                if self.check(&certificate, stats) {
                    return Decision::Yes(certificate);
                }
            }
        }
        Decision::No
    }

    fn check(&self, certificate: &Certificate, stats: &mut SearchStats) -> bool {
        let walk = self.verifier.run(self.instance, certificate);
        stats.candidates += 1;
        stats.total_steps = stats.total_steps.saturating_add(walk.steps);
        stats.max_steps = stats.max_steps.max(walk.steps);
        if walk.outcome == Outcome::StepBoundExceeded {
            stats.exceeded += 1;
            debug!(%certificate, steps = walk.steps, "step bound exceeded");
        }
        trace!(%certificate, outcome = %walk.outcome, steps = walk.steps, "candidate verified");
        walk.outcome == Outcome::Accept
    }
}

/// Decide an instance given as a tape string, with one table cache shared across calls.
/// A certificate segment on the tape is ignored.
pub fn decide_with(
    cache: &mut TableCache,
    kind: ProblemKind,
    tape: &str,
    config: &SearchConfig,
) -> Result<SearchReport, Error> {
    let (instance, certificate) = decode(kind.family(), tape)?;
    if !certificate.is_empty() {
        debug!(%certificate, "ignoring the certificate on the input tape");
    }
    Ok(Search::configure(cache, kind, &instance, config)?.run())
}

/// Decide the instance on `tape` with the default configuration, optionally overriding the
/// certificate length and the step bound.
pub fn decide(
    kind: ProblemKind,
    tape: &str,
    certificate_length: Option<usize>,
    step_bound: Option<u64>,
) -> Result<Decision, Error> {
    let config = SearchConfig {
        certificate_length,
        step_bound,
        ..SearchConfig::default()
    };
    Ok(decide_with(&mut TableCache::new(), kind, tape, &config)?.decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TapeFormatError;

    fn yes(certificate: &str) -> Decision {
        Decision::Yes(certificate.parse().unwrap())
    }

    #[test]
    fn test_sat() {
        for kind in [ProblemKind::SatFixed, ProblemKind::SatDynamic] {
            assert_eq!(decide(kind, "1_2#", None, None).unwrap(), yes("FT"));
            assert_eq!(decide(kind, "1&-1#", Some(1), None).unwrap(), Decision::No);
            assert_eq!(decide(kind, "1_-2&2_3&-1_-3#", None, None).unwrap(), yes("FFT"));
        }
    }

    #[test]
    fn test_subset_sum() {
        let kind = ProblemKind::SubsetSum;
        assert_eq!(decide(kind, "3_7_2&5#", None, None).unwrap(), yes("TFT"));
        assert_eq!(decide(kind, "3_7_2&6#", None, None).unwrap(), Decision::No);
        assert_eq!(decide(kind, "&0#", None, None).unwrap(), yes(""));
        assert_eq!(decide(kind, "&4#", None, None).unwrap(), Decision::No);
        // A certificate of the wrong length is always rejected.
        assert_eq!(decide(kind, "3_7_2&5#", Some(2), None).unwrap(), Decision::No);
        assert_eq!(decide(kind, "3_7_2&5#", Some(4), None).unwrap(), Decision::No);
    }

    #[test]
    fn test_stats() {
        let mut cache = TableCache::new();
        let config = SearchConfig::default();
        let report = decide_with(&mut cache, ProblemKind::SubsetSum, "3_7_2&5#", &config).unwrap();
        assert_eq!(report.feasibility, "subset-sum");
        assert_eq!(report.instance, "3_7_2&5#");
        assert_eq!(report.decision, yes("TFT"));
        // FF and FT cannot reach 5, TFF falls short: TFT is the only walk.
        assert_eq!(report.stats.candidates, 1);
        assert_eq!(report.stats.pruned, 3);
        let exhaustive = SearchConfig {
            pruning: false,
            ..config
        };
        let report = decide_with(&mut cache, ProblemKind::SubsetSum, "3_7_2&5#", &exhaustive).unwrap();
        assert_eq!(report.feasibility, "exhaustive");
        assert_eq!(report.stats.pruned, 0);
        assert_eq!(report.stats.candidates, 6);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_infeasible_root_needs_no_walks() {
        let report = decide_with(
            &mut TableCache::new(),
            ProblemKind::SubsetSum,
            "1_2&4#",
            &SearchConfig::default(),
        )
        .unwrap();
        assert_eq!(report.decision, Decision::No);
        assert_eq!(report.stats, SearchStats::default());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            decide(ProblemKind::SatFixed, "1_2", None, None),
            Err(Error::TapeFormat(TapeFormatError::Unterminated))
        ));
        assert!(matches!(
            decide(ProblemKind::SubsetSum, "1&-1#", None, None),
            Err(Error::TapeFormat(TapeFormatError::BadSymbol { .. }))
        ));
    }

    #[test]
    fn test_certificate_length_limit() {
        let too_long = ConfigurationError::CertificateTooLong {
            length: 99_999_999_999_999,
            limit: MAX_CERTIFICATE_LENGTH,
        };
        assert!(matches!(
            decide(ProblemKind::SatFixed, "99999999999999#", None, None),
            Err(Error::Configuration(e)) if e == too_long
        ));
        assert!(matches!(
            decide(ProblemKind::SubsetSum, "1_2&3#", Some(MAX_CERTIFICATE_LENGTH + 1), None),
            Err(Error::Configuration(ConfigurationError::CertificateTooLong { .. }))
        ));
        // At the limit the search runs; no element exists past position 2, so nothing is walked.
        let report = decide_with(
            &mut TableCache::new(),
            ProblemKind::SubsetSum,
            "1_2&3#",
            &SearchConfig {
                certificate_length: Some(MAX_CERTIFICATE_LENGTH),
                ..SearchConfig::default()
            },
        )
        .unwrap();
        assert_eq!(report.decision, Decision::No);
        assert_eq!(report.stats.candidates, 0);
    }

    #[test]
    fn test_decision_json() {
        let text = serde_json::to_string(&yes("TFT")).unwrap();
        assert_eq!(text, r#"{"Yes":"TFT"}"#);
        assert_eq!(serde_json::to_string(&Decision::No).unwrap(), r#""No""#);
        assert_eq!(yes("TF").to_string(), "Yes TF");
    }
}
