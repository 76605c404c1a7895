//! Balance thresholds and the status they classify a balance into.
//!
//! Each person may have their own pair of thresholds. People without an entry
//! use [BalanceThresholds::DEFAULT]; the fallback happens on lookup and is
//! never written back to storage.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The balance levels below which a person's balance is considered low or
/// medium.
///
/// The fields are public so stored values load unchanged. Use
/// [BalanceThresholds::new] when accepting thresholds from a user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceThresholds {
    /// Balances below this are [BalanceStatus::Low].
    pub low: f64,
    /// Balances below this (and at least `low`) are [BalanceStatus::Medium].
    pub medium: f64,
}

impl BalanceThresholds {
    /// The thresholds used for anyone without their own.
    pub const DEFAULT: Self = Self {
        low: 500.0,
        medium: 3500.0,
    };

    /// Create a validated pair of thresholds.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidThresholds] if `low` is negative, `low` is greater
    /// than `medium`, or either value is NaN.
    pub fn new(low: f64, medium: f64) -> Result<Self, Error> {
        if low >= 0.0 && medium >= low {
            Ok(Self { low, medium })
        } else {
            Err(Error::InvalidThresholds { low, medium })
        }
    }
}

impl Default for BalanceThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How healthy a balance is relative to a person's thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// The balance is below the low threshold.
    Low,
    /// The balance is at least the low threshold, but below the medium one.
    Medium,
    /// The balance is at least the medium threshold.
    Good,
}

impl BalanceStatus {
    /// Classify `balance` against `thresholds`.
    ///
    /// If `low > medium` the medium band is empty and balances are either low
    /// or good. A NaN balance is not below either threshold, so it is good.
    pub fn classify(balance: f64, thresholds: &BalanceThresholds) -> Self {
        if balance < thresholds.low {
            BalanceStatus::Low
        } else if balance < thresholds.medium {
            BalanceStatus::Medium
        } else {
            BalanceStatus::Good
        }
    }
}

/// Looks up the thresholds that apply to a person.
pub trait ThresholdLookup {
    /// The thresholds for `person`, falling back to a default if unset.
    fn thresholds_for(&self, person: &str) -> BalanceThresholds;
}

/// The same thresholds for everyone.
impl ThresholdLookup for BalanceThresholds {
    fn thresholds_for(&self, _person: &str) -> BalanceThresholds {
        *self
    }
}

/// Thresholds keyed by person name.
///
/// Serialized as a JSON object, e.g. `{"Alice": {"low": 100, "medium": 900}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonThresholds(HashMap<String, BalanceThresholds>);

impl PersonThresholds {
    /// An empty mapping where everyone uses the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// The thresholds explicitly set for `person`, if any.
    pub fn get(&self, person: &str) -> Option<&BalanceThresholds> {
        self.0.get(person)
    }

    /// Set the thresholds for `person`, replacing any previous entry.
    pub fn set(&mut self, person: &str, thresholds: BalanceThresholds) {
        self.0.insert(person.to_owned(), thresholds);
    }

    /// The number of people with their own thresholds.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nobody has their own thresholds.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ThresholdLookup for PersonThresholds {
    fn thresholds_for(&self, person: &str) -> BalanceThresholds {
        self.0.get(person).copied().unwrap_or_default()
    }
}
