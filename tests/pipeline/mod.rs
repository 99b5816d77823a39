//! Integration tests for single lines and whole files driven through the public API

use chrono::NaiveDate;
use movement_ingest::{
    AttributeValue, Config, IdWidth, LineError, Location, MemoryContentSource, MemoryRecordSink,
    MovementSummary, SourceError, SummaryFilter, TriggerEvent, derive_id, ingest,
};
use rust_decimal_macros::dec;

use crate::run_file;

#[test]
fn single_valid_line() {
    // Arrange
    let input = "U1,2024-03-15,42.50";
    let expected_id = derive_id("2024-03-15", "42.50", 1, IdWidth::DEFAULT);

    // Act
    let (stats, failures, sink) = run_file(input);

    // Assert
    assert!(failures.is_empty());
    assert_eq!(stats.success_count, 1);
    assert_eq!(sink.len(), 1);

    let item = sink.item(&expected_id).expect("record stored under its id");
    assert_eq!(item["id"], AttributeValue::S(expected_id.to_string()));
    assert_eq!(item["owner_ref"], AttributeValue::S("U1".to_string()));
    assert_eq!(item["date"], AttributeValue::S("2024-03-15".to_string()));
    assert_eq!(item["amount"], AttributeValue::N("42.50".to_string()));
    assert_eq!(item["processed"], AttributeValue::S("Ok".to_string()));
}

#[test]
fn id_is_stable_across_runs() {
    let input = "\n\n\n\n\n\nU1,2024-03-15,42.50\n";

    let (_, _, first) = run_file(input);
    let (_, _, second) = run_file(input);

    let expected_id = derive_id("2024-03-15", "42.50", 7, IdWidth::DEFAULT);
    assert_eq!(first.records(), second.records());
    assert_eq!(first.records()[0].id(), &expected_id);
    assert_eq!(expected_id.as_str().len(), 16);
}

#[test]
fn each_failure_kind_is_reported() {
    let input = [
        "U1,2024-03-15",
        "U1,15-03-2024,42.50",
        "U1,2024-03-15,abc",
        ",2024-03-15,1",
        "   ",
        "U1,2024-03-15,42.50",
    ]
    .join("\n");

    let (stats, failures, sink) = run_file(&input);

    let errors: Vec<(usize, LineError)> = failures
        .into_iter()
        .map(|failure| (failure.ordinal, failure.error))
        .collect();
    assert_eq!(
        errors,
        vec![
            (
                1,
                LineError::Malformed {
                    expected: 3,
                    actual: 2
                }
            ),
            (
                2,
                LineError::InvalidDate {
                    raw: "15-03-2024".to_string()
                }
            ),
            (
                3,
                LineError::InvalidAmount {
                    raw: "abc".to_string()
                }
            ),
            (4, LineError::EmptyOwnerRef),
        ]
    );
    assert_eq!(stats.total_lines, 6);
    assert_eq!(stats.error_count, 4);
    assert_eq!(stats.skipped_count, 1);
    assert_eq!(stats.success_count, 1);
    assert_eq!(sink.len(), 1);
}

#[test]
fn crlf_files_are_accepted() {
    let (stats, failures, sink) = run_file("U1,2024-03-15,1\r\nU2,2024-03-16,2\r\n");

    assert!(failures.is_empty());
    assert_eq!(stats.success_count, 2);
    assert_eq!(sink.len(), 2);
}

#[test]
fn event_reports_every_file_in_order() {
    let source = MemoryContentSource::new()
        .with_file("jan.csv", "U1,2024-01-10,100\nU1,2024-01-20,-20\n")
        .with_file("feb.csv", "U1,2024-02-05,50\nbroken\n");
    let sink = MemoryRecordSink::new();
    let event = TriggerEvent::new(["jan.csv", "absent.csv", "feb.csv"]);

    let reports = ingest(&source, &sink, &event, &Config::default(), |_, _| {});

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].location, Location::new("jan.csv"));
    assert_eq!(
        reports[0].outcome.statistics().map(|s| s.success_count),
        Some(2)
    );
    assert!(matches!(
        &reports[1].outcome,
        movement_ingest::FileOutcome::SourceFailed(SourceError::NotFound { .. })
    ));
    let feb = reports[2].outcome.statistics().expect("feb.csv completed");
    assert_eq!((feb.success_count, feb.error_count), (1, 1));

    // the persisted movements can be summarized afterwards
    let summary = MovementSummary::compute(
        &sink.records(),
        &SummaryFilter::all().owner("U1").between(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        ),
    )
    .expect("small amounts do not overflow");
    assert_eq!(summary.transaction_count, 3);
    assert_eq!(summary.total_balance, dec!(130));
    assert_eq!(summary.average_credit, dec!(75));
    assert_eq!(summary.average_debit, dec!(-20));
}
