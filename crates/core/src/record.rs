//! Record envelope: identity and timestamps wrapped around schema fields.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::id::RecordId;

/// Timestamps are kept at microsecond precision, the finest a SQL
/// `TIMESTAMPTZ` column can hold, so a stored record reads back unchanged.
const TIMESTAMP_DIGITS: u16 = 6;

/// A persisted record of kind `T`.
///
/// Serializes flat, with the store-managed keys around the schema fields:
/// `{ "_id": ..., <fields>, "createdAt": ..., "updatedAt": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    #[serde(rename = "_id")]
    pub id: RecordId,

    #[serde(flatten)]
    pub fields: T,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl<T> Record<T> {
    /// Wrap freshly validated fields in a new identity.
    pub fn new(fields: T, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(TIMESTAMP_DIGITS);
        Self {
            id: RecordId::new(),
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the fields, keeping identity and creation time.
    pub fn revise(self, fields: T, now: DateTime<Utc>) -> Self {
        Self {
            fields,
            updated_at: now.trunc_subsecs(TIMESTAMP_DIGITS),
            ..self
        }
    }
}
