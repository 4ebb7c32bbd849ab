//! Search-term classification.
//!
//! Partitions the rows of a search-terms report into the buckets that drive
//! account optimization:
//! - converters: any row with at least one conversion (bid-increase candidates)
//! - wasted: competitor-brand terms that were shown but never clicked
//! - competitors: every competitor-brand term, whatever its outcome
//! - high intent: non-branded, purchase-intent terms shown but never clicked
//!
//! Conversions win over every other signal: a term that makes money is never
//! reported as waste. The competitor check runs before the high-intent check,
//! so a row can never be both wasted and high intent.
//!
//! Totals are summed over the whole input, including rows that land in no
//! bucket.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::metrics::{cmp_desc, safe_ratio};
use crate::row::SearchTermRow;
use crate::vocabulary::Vocabularies;

/// Signals detected on a single row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TermSignals {
    pub is_competitor: bool,
    /// Only ever set for rows that are not competitor terms.
    pub is_high_intent: bool,
}

/// The decision taken for a single row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermClass {
    /// Converted at least once. `competitor` marks a converting rival-brand
    /// term, which is kept rather than negated.
    Converter { competitor: bool },
    /// Competitor term with no clicks and no conversions.
    WastedCompetitor,
    /// Competitor term that drew clicks but no conversions.
    ClickedCompetitor,
    /// High-intent term shown without a single click.
    MissedHighIntent,
    /// Nothing actionable; only contributes to totals.
    Unremarkable,
}

/// Buckets and totals for one report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub total_clicks: u64,
    pub total_impressions: u64,
    pub total_cost: f64,
    pub total_conversions: u64,
    /// `total_cost / total_conversions`, `0.0` when nothing converted.
    pub cost_per_conversion: f64,
    /// Best first: conversion rate, then conversions, then clicks.
    pub converters: Vec<SearchTermRow>,
    /// Highest impressions first.
    pub wasted: Vec<SearchTermRow>,
    /// Highest impressions first.
    pub competitors: Vec<SearchTermRow>,
    /// Highest impressions first.
    pub high_intent: Vec<SearchTermRow>,
}

impl ClassificationResult {
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
            && self.wasted.is_empty()
            && self.competitors.is_empty()
            && self.high_intent.is_empty()
    }

    /// Competitor terms that never converted, in bucket order.
    pub fn non_converting_competitors(&self) -> impl Iterator<Item = &SearchTermRow> {
        self.competitors.iter().filter(|r| !r.has_conversions())
    }
}

/// Detect the competitor and high-intent signals for one row.
pub fn detect_signals(row: &SearchTermRow, vocabularies: &Vocabularies) -> TermSignals {
    let is_competitor = vocabularies.competitor_brands.matches(&row.term);
    let is_high_intent = !is_competitor && vocabularies.high_intent.matches(&row.term);
    TermSignals {
        is_competitor,
        is_high_intent,
    }
}

/// Classify a single row.
pub fn classify_term(row: &SearchTermRow, vocabularies: &Vocabularies) -> TermClass {
    let signals = detect_signals(row, vocabularies);

    if row.conversions > 0 {
        TermClass::Converter {
            competitor: signals.is_competitor,
        }
    } else if signals.is_competitor && row.clicks == 0 {
        TermClass::WastedCompetitor
    } else if signals.is_competitor {
        TermClass::ClickedCompetitor
    } else if signals.is_high_intent && row.clicks == 0 && row.impressions > 0 {
        TermClass::MissedHighIntent
    } else {
        TermClass::Unremarkable
    }
}

/// Classify every row of a report and compute its totals.
///
/// Pure: the same rows and vocabularies always produce the same result.
/// Bucket lists are complete; callers apply their own display limits.
pub fn classify(rows: &[SearchTermRow], vocabularies: &Vocabularies) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for row in rows {
        result.total_clicks = result.total_clicks.saturating_add(row.clicks);
        result.total_impressions = result.total_impressions.saturating_add(row.impressions);
        result.total_cost += row.cost;
        result.total_conversions = result.total_conversions.saturating_add(row.conversions);

        match classify_term(row, vocabularies) {
            TermClass::Converter { competitor } => {
                result.converters.push(row.clone());
                if competitor {
                    result.competitors.push(row.clone());
                }
            }
            TermClass::WastedCompetitor => {
                result.wasted.push(row.clone());
                result.competitors.push(row.clone());
            }
            TermClass::ClickedCompetitor => result.competitors.push(row.clone()),
            TermClass::MissedHighIntent => result.high_intent.push(row.clone()),
            TermClass::Unremarkable => {}
        }
    }

    result.cost_per_conversion = safe_ratio(result.total_cost, result.total_conversions as f64);

    // Stable sorts: ties keep report order.
    result.converters.sort_by(converter_order);
    result.wasted.sort_by(by_impressions_desc);
    result.competitors.sort_by(by_impressions_desc);
    result.high_intent.sort_by(by_impressions_desc);

    log::debug!(
        "classified {} rows: {} converters, {} wasted, {} competitors, {} high intent",
        rows.len(),
        result.converters.len(),
        result.wasted.len(),
        result.competitors.len(),
        result.high_intent.len()
    );

    result
}

fn converter_order(a: &SearchTermRow, b: &SearchTermRow) -> Ordering {
    cmp_desc(a.conv_rate(), b.conv_rate())
        .then_with(|| b.conversions.cmp(&a.conversions))
        .then_with(|| b.clicks.cmp(&a.clicks))
}

fn by_impressions_desc(a: &SearchTermRow, b: &SearchTermRow) -> Ordering {
    b.impressions.cmp(&a.impressions)
}
