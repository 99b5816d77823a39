//! Module aggregating persisted records into a per-owner movement summary.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Money, TransactionRecord};
use crate::error::SummaryError;


/// Restricts which records are summarized. The default filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    owner_ref: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl SummaryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owner(mut self, owner_ref: impl Into<String>) -> Self {
        self.owner_ref = Some(owner_ref.into());
        self
    }

    /// Keeps records dated within `from..=to`.
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    fn matches(&self, record: &TransactionRecord) -> bool {
        let owner_ok = self
            .owner_ref
            .as_deref()
            .is_none_or(|owner| owner == record.owner_ref());
        let from_ok = self.from.is_none_or(|from| record.date() >= from);
        let to_ok = self.to.is_none_or(|to| record.date() <= to);
        owner_ok && from_ok && to_ok
    }
}

/// Aggregate view over a set of movements.
///
/// Negative amounts are debits, everything else (zero included) is a credit. Averages are zero
/// when there is nothing to average.
///
/// Computing fails with [`SummaryError::Overflow`] when a running sum leaves the range of `Money`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovementSummary {
    pub total_balance: Money,
    pub transaction_count: usize,
    /// Number of movements per `YYYY-MM` month
    pub transactions_by_month: BTreeMap<String, usize>,
    pub average_debit: Money,
    pub average_credit: Money,
}

impl MovementSummary {
    pub fn compute<'a>(
        records: impl IntoIterator<Item = &'a TransactionRecord>,
        filter: &SummaryFilter,
    ) -> Result<Self, SummaryError> {
        let mut summary = Self::default();
        let mut debits = Running::default();
        let mut credits = Running::default();

        for record in records.into_iter().filter(|r| filter.matches(r)) {
            let amount = record.amount();
            summary.total_balance = checked_sum(summary.total_balance, amount)?;
            summary.transaction_count += 1;
            *summary
                .transactions_by_month
                .entry(record.date().format("%Y-%m").to_string())
                .or_default() += 1;

            if amount.is_sign_negative() && !amount.is_zero() {
                debits.add(amount)?;
            } else {
                credits.add(amount)?;
            }
        }

        summary.average_debit = debits.mean();
        summary.average_credit = credits.mean();
        Ok(summary)
    }
}

fn checked_sum(total: Money, amount: Money) -> Result<Money, SummaryError> {
    total
        .checked_add(amount)
        .ok_or(SummaryError::Overflow { total, amount })
}

#[derive(Default)]
struct Running {
    sum: Money,
    count: u64,
}

impl Running {
    fn add(&mut self, amount: Money) -> Result<(), SummaryError> {
        self.sum = checked_sum(self.sum, amount)?;
        self.count += 1;
        Ok(())
    }

    fn mean(&self) -> Money {
        if self.count == 0 {
            Decimal::ZERO
        } else {
            self.sum / Decimal::from(self.count)
        }
    }
}
