//! The search-term row and the per-row metrics derived from it.

use serde::{Deserialize, Serialize};

use crate::metrics::{percent, safe_ratio};

/// One line of a search-terms report: a query that triggered an ad during
/// the reporting period, with its delivery and conversion counts.
///
/// Counts are validated at the parse boundary; the classifier takes them as
/// given (including `clicks > impressions`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchTermRow {
    pub term: String,
    pub impressions: u64,
    pub clicks: u64,
    /// Spend in account currency units.
    pub cost: f64,
    pub conversions: u64,
}

impl SearchTermRow {
    pub fn new(term: impl Into<String>, impressions: u64, clicks: u64, cost: f64, conversions: u64) -> Self {
        Self {
            term: term.into(),
            impressions,
            clicks,
            cost,
            conversions,
        }
    }

    /// Conversions per click as a percentage. `0.0` when there were no clicks.
    pub fn conv_rate(&self) -> f64 {
        percent(self.conversions as f64, self.clicks as f64)
    }

    /// Spend per conversion, or `None` when the term never converted.
    pub fn cost_per_conversion(&self) -> Option<f64> {
        if self.conversions == 0 {
            None
        } else {
            Some(safe_ratio(self.cost, self.conversions as f64))
        }
    }

    /// Clicks per impression as a percentage. `0.0` when never shown.
    pub fn click_through_rate(&self) -> f64 {
        percent(self.clicks as f64, self.impressions as f64)
    }

    pub fn has_conversions(&self) -> bool {
        self.conversions > 0
    }
}
