use certificate_search::codec::{decode, parse_dimacs, Family, Instance};
use certificate_search::core::{Dir, LeftEdge, Machine, Outcome, TransitionTable};
use certificate_search::search::{decide, Decision, Search, SearchStats};
use certificate_search::verifiers::{build_machine, CertificateVerifier, ProblemKind, StepPolicy, TableCache};
use certificate_search::{Error, SearchConfig, TapeFormatError};
use std::rc::Rc;

fn yes(certificate: &str) -> Decision {
    Decision::Yes(certificate.parse().unwrap())
}

/// Moves right and left between two cells forever.
fn looping_machine() -> Machine {
    let labels = ["Right", "Left", "Accept", "Reject"].map(String::from).to_vec();
    let mut table = TransitionTable::new(labels, b"0123456789_&#-TF").unwrap();
    let alphabet = table.alphabet().to_vec();
    for s in alphabet {
        table.set(0, s, s, Dir::R, 1);
        table.set(1, s, s, Dir::L, 0);
    }
    Machine {
        name: "looping".to_string(),
        table,
        start: 0,
        accept: 2,
        reject: 3,
        left_edge: LeftEdge::Extend,
    }
}

#[test]
fn test_sat_accept() {
    for kind in [ProblemKind::SatFixed, ProblemKind::SatDynamic] {
        let machine = Rc::new(build_machine(kind, Some(2)).unwrap());
        let verifier = CertificateVerifier::new(machine, Family::Sat);
        assert_eq!(verifier.verify_tape("1_2#TF").unwrap().outcome, Outcome::Accept);
        assert_eq!(decide(kind, "1_2#", None, None).unwrap(), yes("FT"));
    }
}

#[test]
fn test_sat_reject() {
    for kind in [ProblemKind::SatFixed, ProblemKind::SatDynamic] {
        assert_eq!(decide(kind, "1&-1#", Some(1), None).unwrap(), Decision::No);
    }
}

#[test]
fn test_sat_kinds_agree_below_the_largest_index() {
    // x10 lies past a length-7 certificate, so only x7 can satisfy the clause.
    for kind in [ProblemKind::SatFixed, ProblemKind::SatDynamic] {
        assert_eq!(decide(kind, "10_7#", Some(7), None).unwrap(), yes("FFFFFFT"), "{kind}");
        assert_eq!(decide(kind, "-10_-7#", Some(7), None).unwrap(), yes("FFFFFFF"), "{kind}");
        assert_eq!(decide(kind, "-10#", Some(7), None).unwrap(), Decision::No, "{kind}");
    }
}

#[test]
fn test_subset_sum_accept() {
    assert_eq!(decide(ProblemKind::SubsetSum, "3_7_2&5#", None, None).unwrap(), yes("TFT"));
    // The certificate on the tape is ignored by the search.
    assert_eq!(decide(ProblemKind::SubsetSum, "3_7_2&5#TTT", None, None).unwrap(), yes("TFT"));
}

#[test]
fn test_step_bound_exhaustion() {
    let (instance, _) = decode(Family::Sat, "1_2#").unwrap();
    let verifier = CertificateVerifier::new(Rc::new(looping_machine()), Family::Sat);
    let report = Search::new(verifier.clone(), &instance).unwrap().run();
    assert_eq!(report.decision, Decision::No);
    // FF is pruned; FT, TF and TT are walked to the bound.
    let bound = StepPolicy::default().bound("1_2#FT".len());
    assert_eq!(
        report.stats,
        SearchStats {
            candidates: 3,
            pruned: 1,
            exceeded: 3,
            total_steps: 3 * bound,
            max_steps: bound,
        }
    );

    let report = Search::new(verifier.with_step_bound(Some(10)), &instance)
        .unwrap()
        .with_pruning(false)
        .run();
    assert_eq!(report.decision, Decision::No);
    assert_eq!(report.stats.candidates, 4);
    assert_eq!(report.stats.exceeded, 4);
    assert_eq!(report.stats.max_steps, 10);
}

#[test]
fn test_dimacs_instance() {
    let text = "c (x1 v x2) ^ (~x1 v x3)\np cnf 3 2\n1 2 0\n-1 3 0\n";
    let instance = Instance::Sat(parse_dimacs(text).unwrap());
    assert_eq!(instance.to_string(), "1_2&-1_3#");
    let mut cache = TableCache::new();
    for kind in [ProblemKind::SatFixed, ProblemKind::SatDynamic] {
        let report = Search::configure(&mut cache, kind, &instance, &SearchConfig::default())
            .unwrap()
            .run();
        assert_eq!(report.decision, yes("FTF"));
        assert_eq!(report.certificate_length, 3);
    }
    assert!(matches!(
        Search::configure(&mut cache, ProblemKind::SubsetSum, &instance, &SearchConfig::default()),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_input_check_search() {
    let config = SearchConfig {
        input_check: true,
        ..SearchConfig::default()
    };
    let mut cache = TableCache::new();
    let report =
        certificate_search::decide_with(&mut cache, ProblemKind::SubsetSum, "42_20_3_5&28#", &config).unwrap();
    assert_eq!(report.decision, yes("FTTT"));
    assert_eq!(report.machine, "subset-sum+input-check");
}

#[test]
fn test_malformed_tapes() {
    for (tape, expected) in [
        ("1_2", TapeFormatError::Unterminated),
        ("1__2#", TapeFormatError::EmptyField(2)),
        ("1_0#", TapeFormatError::ZeroLiteral(2)),
    ] {
        match decide(ProblemKind::SatFixed, tape, None, None) {
            Err(Error::TapeFormat(e)) => assert_eq!(e, expected, "{tape}"),
            other => panic!("{tape}: expected a tape format error, got {other:?}"),
        }
    }
}

#[test]
fn test_report_json() {
    let config = SearchConfig::default();
    let report =
        certificate_search::decide_with(&mut TableCache::new(), ProblemKind::SatFixed, "1_2#", &config).unwrap();
    let value: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["decision"], serde_json::json!({"Yes": "FT"}));
    assert_eq!(value["machine"], "sat-fixed");
    assert_eq!(value["feasibility"], "sat");
    assert_eq!(value["certificate_length"], 2);
}
