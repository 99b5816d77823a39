//! Module deriving the deterministic identifiers under which records are persisted.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex characters of a full SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// The unique ID of a persisted record. Used as the write key of the record sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TxId> for String {
    fn from(value: TxId) -> Self {
        value.0
    }
}

/// How many hex characters of the digest are kept in an identifier.
///
/// 16 characters keep 64 bits of the digest. Large volumes can widen this up to the full digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdWidth(usize);

impl IdWidth {
    pub const DEFAULT: IdWidth = IdWidth(16);
    pub const FULL: IdWidth = IdWidth(DIGEST_HEX_LEN);

    /// Returns `None` unless `hex_len` is within `1..=64`.
    pub fn new(hex_len: usize) -> Option<Self> {
        (1..=DIGEST_HEX_LEN)
            .contains(&hex_len)
            .then_some(Self(hex_len))
    }

    pub fn hex_len(self) -> usize {
        self.0
    }
}

impl Default for IdWidth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Derives the identifier of the line at `ordinal` (1-based) from its raw date and amount text.
///
/// The same inputs always give the same identifier, so re-processing an unchanged file rewrites
/// the same keys instead of creating new records.
pub fn derive_id(date_text: &str, amount_text: &str, ordinal: usize, width: IdWidth) -> TxId {
    let canonical = format!("{date_text}|{amount_text}|{ordinal}");
    TxId(digest_prefix(&canonical, width))
}

fn digest_prefix(canonical: &str, width: IdWidth) -> String {
    let mut hex = hex::encode(Sha256::digest(canonical.as_bytes()));
    hex.truncate(width.hex_len());
    hex
}
