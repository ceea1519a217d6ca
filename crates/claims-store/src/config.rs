//! Configuration for the claim store.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::LineFormat;
use crate::error::{Result, StoreError};

/// Default store file name.
pub const DEFAULT_STORE_PATH: &str = "claims.log";

/// Default exclusive upper bound for randomly assigned ids.
pub const DEFAULT_ID_RANGE: u64 = 1_000_000;

/// How new claims get their ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Uniform over `[0, id_range)`, no check against stored ids.
    #[default]
    Random,
    /// One more than the highest stored id.
    Sequential,
}

impl IdStrategy {
    /// Returns the configuration name of this strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Sequential => "sequential",
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdStrategy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "sequential" => Ok(Self::Sequential),
            _ => Err(StoreError::InvalidConfig(format!("unknown id strategy: {s}"))),
        }
    }
}

/// Configuration for a [`ClaimStore`](crate::ClaimStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// The store file.
    pub path: PathBuf,
    /// On-disk line format.
    pub format: LineFormat,
    /// Id assignment for new claims.
    pub id_strategy: IdStrategy,
    /// Exclusive upper bound for [`IdStrategy::Random`].
    pub id_range: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
            format: LineFormat::default(),
            id_strategy: IdStrategy::default(),
            id_range: DEFAULT_ID_RANGE,
        }
    }
}

impl StoreConfig {
    /// Creates a config for the given store file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Sets the line format.
    #[must_use]
    pub const fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the id strategy.
    #[must_use]
    pub const fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Sets the random id range.
    #[must_use]
    pub const fn with_id_range(mut self, range: u64) -> Self {
        self.id_range = range;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the path is empty or the id
    /// range is zero.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(StoreError::InvalidConfig("path must not be empty".into()));
        }
        if self.id_range == 0 {
            return Err(StoreError::InvalidConfig("id_range must be > 0".into()));
        }
        Ok(())
    }
}
