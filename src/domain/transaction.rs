//! Module defining the records persisted for every accepted movement line

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Money, TxId};

/// Status marker stored with every persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Processed {
    Ok,
}

impl Processed {
    pub fn as_str(self) -> &'static str {
        match self {
            Processed::Ok => "Ok",
        }
    }
}

/// A movement that passed validation, ready to be handed to the record sink.
///
/// Built once per accepted line and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    id: TxId,
    owner_ref: String,
    date: NaiveDate,
    amount: Money,
    processed: Processed,
}

impl TransactionRecord {
    pub fn build(id: TxId, owner_ref: &str, date: NaiveDate, amount: Money) -> Self {
        Self {
            id,
            owner_ref: owner_ref.to_string(),
            date,
            amount,
            processed: Processed::Ok,
        }
    }

    pub fn id(&self) -> &TxId {
        &self.id
    }

    pub fn owner_ref(&self) -> &str {
        &self.owner_ref
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn processed(&self) -> Processed {
        self.processed
    }
}
