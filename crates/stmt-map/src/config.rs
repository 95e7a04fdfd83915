//! Review configuration and confidence categorisation.

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, Result};

/// Minimum confidence for auto-approval when a learned format was reused.
pub const DEFAULT_AUTO_APPROVE_THRESHOLD: f64 = 0.9;

/// Confidence level categories for mapping quality assessment.
///
/// These levels help categorize suggestions by their reliability:
/// - `High`: near-certain matches
/// - `Medium`: good matches that should be verified
/// - `Low`: weak matches requiring manual confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Configurable thresholds for confidence level categorization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Minimum score for high confidence.
    pub high: f64,
    /// Minimum score for medium confidence.
    pub medium: f64,
    /// Minimum score for low confidence.
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.90,
            medium: 0.70,
            low: 0.50,
        }
    }
}

impl ConfidenceThresholds {
    /// Categorizes a confidence score into a confidence level.
    ///
    /// Returns `None` if the score is below the low threshold.
    #[must_use]
    pub fn categorize(&self, confidence: f64) -> Option<ConfidenceLevel> {
        if confidence >= self.high {
            Some(ConfidenceLevel::High)
        } else if confidence >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if confidence >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }

    fn validate(&self) -> Result<()> {
        for value in [self.high, self.medium, self.low] {
            check_unit(value)?;
        }
        if !(self.low <= self.medium && self.medium <= self.high) {
            return Err(MappingError::InvalidThreshold(self.medium));
        }
        Ok(())
    }
}

/// Settings that shape a review session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Rows at or above this confidence start approved when the batch
    /// reuses a learned format.
    pub auto_approve_threshold: f64,
    /// Display bands for confidence scores.
    pub confidence_thresholds: ConfidenceThresholds,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            auto_approve_threshold: DEFAULT_AUTO_APPROVE_THRESHOLD,
            confidence_thresholds: ConfidenceThresholds::default(),
        }
    }
}

impl ReviewConfig {
    /// Set the auto-approval threshold.
    #[must_use]
    pub fn with_auto_approve_threshold(mut self, threshold: f64) -> Self {
        self.auto_approve_threshold = threshold;
        self
    }

    /// Check every threshold lies in `[0, 1]` and the bands are ordered.
    pub fn validate(&self) -> Result<()> {
        check_unit(self.auto_approve_threshold)?;
        self.confidence_thresholds.validate()
    }

    /// Whether a row should start approved.
    #[must_use]
    pub fn auto_approves(&self, learned_format_used: bool, confidence: f64) -> bool {
        learned_format_used && confidence >= self.auto_approve_threshold
    }
}

fn check_unit(value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MappingError::InvalidThreshold(value))
    }
}
