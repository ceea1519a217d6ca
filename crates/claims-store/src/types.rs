//! Core types for claim records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Identifier assigned to a claim when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub u64);

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClaimId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A stored claim as returned to callers.
///
/// The write timestamp embedded in the log line is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// Assigned identifier
    pub id: ClaimId,
    /// Caller-supplied date, stored verbatim
    pub claim_date: String,
    /// Claim category
    pub category: String,
    /// Free-text description
    pub description: String,
}

impl Claim {
    /// Builds a record from an id and its caller-supplied fields.
    #[must_use]
    pub fn new(id: ClaimId, fields: ClaimFields) -> Self {
        Self {
            id,
            claim_date: fields.claim_date,
            category: fields.category,
            description: fields.description,
        }
    }

    /// Returns the caller-supplied part of the record.
    #[must_use]
    pub fn fields(&self) -> ClaimFields {
        ClaimFields {
            claim_date: self.claim_date.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
        }
    }
}

/// The caller-supplied fields of a claim, used for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFields {
    /// Caller-supplied date
    pub claim_date: String,
    /// Claim category
    pub category: String,
    /// Free-text description
    pub description: String,
}

impl ClaimFields {
    /// Creates a new set of claim fields.
    pub fn new(
        claim_date: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            claim_date: claim_date.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    /// Checks that every field is present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.named() {
            if value.is_empty() {
                return Err(StoreError::Validation(format!("{name} is required")));
            }
        }
        Ok(())
    }

    /// Field values paired with their wire names, in line order.
    fn named(&self) -> [(&'static str, &str); 3] {
        [
            ("claimDate", self.claim_date.as_str()),
            ("category", self.category.as_str()),
            ("description", self.description.as_str()),
        ]
    }
}
