mod support;

use std::fs;
use std::sync::Arc;
use std::time::Duration;
use support::{GreedyLookahead, ME, Scripted, plays, table_with_hand};
use sushi_bot::ensemble::{EnsemblePlanner, HeuristicScorer};
use sushi_bot::heuristic::SushiHeuristic;
use sushi_bot::search::{RootStats, SearchError};
use sushi_bot::telemetry::{
    CsvDecisionLog, DecisionLogger, DecisionRecord, MemoryDecisionLog, NdjsonDecisionLog,
    TelemetryError,
};
use sushi_core::model::card::CardType;

const HAND: [CardType; 3] = [CardType::Tempura, CardType::Sashimi, CardType::Pudding];

struct BrokenSink;

impl DecisionLogger for BrokenSink {
    fn record(&self, _record: &DecisionRecord) -> Result<(), TelemetryError> {
        Err(TelemetryError::Io {
            context: "writing decision record",
            source: std::io::Error::other("disk full"),
        })
    }
}

#[test]
fn one_record_per_decision_in_legal_order() {
    let table = table_with_hand(21, &HAND);
    let legal = plays(&HAND);
    let best = legal[1];
    let log = Arc::new(MemoryDecisionLog::new(16));
    let mut planner = EnsemblePlanner::new(
        ME,
        Scripted::new(move |_, _: &_| Ok(RootStats::new().with_child(best, 3.0, 2))),
    )
    .with_logger(Arc::clone(&log))
    .with_seed(21);

    planner
        .decide_with(&table, &legal, 2, Duration::from_secs(5))
        .expect("first");
    planner
        .decide_with(&table, &legal, 2, Duration::from_secs(5))
        .expect("second");

    let records = log.snapshot();
    assert_eq!(records.len(), 2);
    let record = &records[1];
    assert_eq!(record.decision_index, 2);
    assert_eq!(record.agent, "Agent0");
    assert_eq!(record.round, 1);
    assert_eq!(record.player_count, 3);
    assert_eq!(record.chosen, "Sashimi");
    assert_eq!(record.completed_samples, 2);
    let actions: Vec<_> = record.candidates.iter().map(|c| c.action.as_str()).collect();
    assert_eq!(actions, vec!["Tempura", "Sashimi", "Pudding"]);
    assert_eq!(record.candidates[1].mean_value, Some(1.5));
    assert_eq!(record.candidates[0].mean_value, Some(0.0));
    assert!(record.candidates.iter().all(|c| c.heuristic.is_none()));
}

#[test]
fn logger_failure_never_changes_the_decision() {
    let table = table_with_hand(22, &HAND);
    let legal = plays(&HAND);
    let best = legal[2];
    let mut quiet = EnsemblePlanner::new(
        ME,
        Scripted::new(move |_, _: &_| Ok(RootStats::new().with_child(best, 1.0, 1))),
    )
    .with_seed(22);
    let mut noisy = EnsemblePlanner::new(
        ME,
        Scripted::new(move |_, _: &_| Ok(RootStats::new().with_child(best, 1.0, 1))),
    )
    .with_logger(BrokenSink)
    .with_seed(22);

    let expected = quiet
        .decide_with(&table, &legal, 3, Duration::from_secs(5))
        .expect("quiet");
    let chosen = noisy
        .decide_with(&table, &legal, 3, Duration::from_secs(5))
        .expect("noisy");
    assert_eq!(chosen, expected);
    assert_eq!(noisy.stats().log_failures, 1);
    assert_eq!(quiet.stats().log_failures, 0);
}

#[test]
fn fallback_decisions_are_recorded() {
    let table = table_with_hand(23, &HAND);
    let legal = plays(&HAND);
    let log = Arc::new(MemoryDecisionLog::new(4));
    let mut planner = EnsemblePlanner::new(
        ME,
        Scripted::new(|_, _: &_| Err(SearchError::failed("offline"))),
    )
    .with_logger(Arc::clone(&log))
    .with_seed(23);

    planner
        .decide_with(&table, &legal, 3, Duration::from_secs(5))
        .expect("decision");
    let records = log.snapshot();
    assert_eq!(records.len(), 1);
    assert!(records[0].fallback);
    assert_eq!(records[0].failed_samples, 3);
    assert!(records[0].candidates.iter().all(|c| c.mean_value.is_none()));
    assert_eq!(records[0].regret(), None);
}

#[test]
fn heuristic_scorer_fills_candidate_scores() {
    let table = table_with_hand(24, &HAND);
    let legal = plays(&HAND);
    let log = Arc::new(MemoryDecisionLog::new(4));
    let mut planner = EnsemblePlanner::new(ME, GreedyLookahead::new(ME))
        .with_logger(Arc::clone(&log))
        .with_scorer(HeuristicScorer::new(SushiHeuristic::default()))
        .with_seed(24);

    let chosen = planner
        .decide_with(&table, &legal, 2, Duration::from_secs(5))
        .expect("decision");
    let record = &log.snapshot()[0];
    assert_eq!(record.chosen, chosen.to_string());
    assert!(record.candidates.iter().all(|c| c.heuristic.is_some()));
    // One-ply lookahead scores the same post-action state the scorer does.
    for candidate in &record.candidates {
        let mean = candidate.mean_value.expect("mean");
        let heuristic = candidate.heuristic.expect("heuristic");
        assert!((mean - heuristic).abs() < 1e-12, "{}", candidate.action);
    }
    assert_eq!(record.regret(), Some(0.0));
}

#[test]
fn csv_and_ndjson_sinks_capture_decisions() {
    let dir = tempfile::tempdir().expect("temp dir");
    let table = table_with_hand(25, &HAND);
    let legal = plays(&HAND);

    let csv = CsvDecisionLog::open(dir.path(), "agent0").expect("csv");
    let trace_path = csv.trace_path().to_path_buf();
    let mut planner = EnsemblePlanner::new(ME, GreedyLookahead::new(ME))
        .with_logger(csv)
        .with_seed(25);
    planner
        .decide_with(&table, &legal, 2, Duration::from_secs(5))
        .expect("decision");
    drop(planner);
    let trace = fs::read_to_string(trace_path).expect("trace written");
    assert_eq!(trace.lines().count(), 1 + legal.len());
    assert_eq!(trace.lines().filter(|l| l.contains(",true,")).count(), 1);

    let ndjson_path = dir.path().join("decisions.jsonl");
    let ndjson = NdjsonDecisionLog::open(&ndjson_path).expect("ndjson");
    let mut planner = EnsemblePlanner::new(ME, GreedyLookahead::new(ME))
        .with_logger(ndjson)
        .with_seed(25);
    planner
        .decide_with(&table, &legal, 2, Duration::from_secs(5))
        .expect("decision");
    drop(planner);
    let contents = fs::read_to_string(ndjson_path).expect("ndjson written");
    let value: serde_json::Value =
        serde_json::from_str(contents.lines().next().expect("one line")).expect("json");
    assert_eq!(value["agent"], "Agent0");
    assert_eq!(value["candidates"].as_array().map(Vec::len), Some(legal.len()));
}

#[test]
fn short_circuit_emits_no_record() {
    let table = table_with_hand(26, &[CardType::Wasabi]);
    let legal = plays(&[CardType::Wasabi]);
    let log = Arc::new(MemoryDecisionLog::new(4));
    let mut planner =
        EnsemblePlanner::new(ME, GreedyLookahead::new(ME)).with_logger(Arc::clone(&log));

    planner.decide(&table, &legal).expect("decision");
    assert!(log.is_empty());
}
