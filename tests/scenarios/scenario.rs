//! Defines the `ScenarioLine` type and the logic for checking a processed file against the expectations of its lines.

use chrono::NaiveDate;
use movement_ingest::{
    IdWidth, LineFailure, MemoryRecordSink, RunStatistics, TransactionRecord, derive_id,
};
use rust_decimal::Decimal;

/// What the pipeline is expected to do with a line.
#[derive(Debug, Clone)]
pub enum Expected {
    Persisted {
        owner: String,
        date_text: String,
        amount_text: String,
        date: NaiveDate,
        amount: Decimal,
    },
    Rejected,
    Skipped,
}

/// One line of a generated file together with its expected outcome.
#[derive(Debug, Clone)]
pub struct ScenarioLine {
    pub text: String,
    pub expected: Expected,
}

/// A trait for line shapes that can be instantiated with random parameters.
pub trait LineShape {
    /// Build a concrete line for `owner` from generated random parameters.
    fn build(&self, owner: &str, random_parameters: &[u64]) -> ScenarioLine;

    /// How many random parameters this shape needs from proptest.
    fn num_random_parameters(&self) -> usize;
}

/// Joins the lines into the content of one file.
pub fn assemble(lines: &[ScenarioLine]) -> String {
    lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Asserts that the tally, the reported failures and the persisted records match the lines.
pub fn assert_outcome(
    lines: &[ScenarioLine],
    stats: &RunStatistics,
    failures: &[LineFailure],
    sink: &MemoryRecordSink,
) {
    let mut expected_stats = RunStatistics {
        total_lines: lines.len(),
        ..RunStatistics::default()
    };
    let mut expected_failures = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let ordinal = idx + 1;
        match &line.expected {
            Expected::Persisted {
                owner,
                date_text,
                amount_text,
                date,
                amount,
            } => {
                expected_stats.success_count += 1;

                let id = derive_id(date_text, amount_text, ordinal, IdWidth::DEFAULT);
                let record = sink
                    .get(&id)
                    .unwrap_or_else(|| panic!("no record for line {ordinal}: {:?}", line.text));
                assert_eq!(
                    record,
                    TransactionRecord::build(id, owner, *date, *amount),
                    "record mismatch for line {ordinal}"
                );
            }
            Expected::Rejected => {
                expected_stats.error_count += 1;
                expected_failures.push(ordinal);
            }
            Expected::Skipped => expected_stats.skipped_count += 1,
        }
    }

    assert_eq!(*stats, expected_stats, "tally mismatch");
    assert_eq!(sink.len(), expected_stats.success_count, "unexpected records");

    let actual_failures: Vec<usize> = failures.iter().map(|f| f.ordinal).collect();
    assert_eq!(actual_failures, expected_failures, "rejected line mismatch");
}
