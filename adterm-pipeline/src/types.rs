use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use adterm_core::thresholds::DEFAULT_MIN_IMPRESSIONS;
use adterm_core::SearchTermRow;

use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Inclusive reporting window of the uploaded report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A request to turn a search-terms report into ranked recommendations.
#[derive(Clone, Debug)]
pub struct ReportQuery {
    pub request_id: String,
    /// Date the analysis is run for; anchors a missing period.
    pub as_of: NaiveDate,
    pub period: Option<ReportPeriod>,
    /// Restrict output to these kinds. `None` keeps every kind.
    pub kinds: Option<Vec<RecommendationKind>>,
    /// Non-converting terms below this many impressions are dropped.
    pub min_impressions: u64,
}

impl ReportQuery {
    /// A query with no period, every kind and the default volume floor.
    pub fn new(request_id: impl Into<String>, as_of: NaiveDate) -> Self {
        Self {
            request_id: request_id.into(),
            as_of,
            period: None,
            kinds: None,
            min_impressions: DEFAULT_MIN_IMPRESSIONS,
        }
    }
}

impl HasRequestId for ReportQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// What the advertiser should do about a term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RecommendationKind {
    /// Converting term: raise the bid.
    IncreaseBid,
    /// Competitor term shown without clicks: add as negative keyword.
    AddNegativeKeyword,
    /// Competitor term that draws clicks but no conversions.
    MonitorCompetitor,
    /// High-intent term shown without clicks: the ad copy is not landing.
    ImproveAdCopy,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationKind::IncreaseBid => write!(f, "Increase Bid"),
            RecommendationKind::AddNegativeKeyword => write!(f, "Add Negative"),
            RecommendationKind::MonitorCompetitor => write!(f, "Monitor Competitor"),
            RecommendationKind::ImproveAdCopy => write!(f, "Improve Ad Copy"),
        }
    }
}

impl std::str::FromStr for RecommendationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "increase_bid" | "bid" => Ok(RecommendationKind::IncreaseBid),
            "add_negative_keyword" | "negative" => Ok(RecommendationKind::AddNegativeKeyword),
            "monitor_competitor" | "monitor" => Ok(RecommendationKind::MonitorCompetitor),
            "improve_ad_copy" | "ad_copy" => Ok(RecommendationKind::ImproveAdCopy),
            other => Err(format!("unknown recommendation kind '{}'", other)),
        }
    }
}

/// A candidate recommendation flowing through the pipeline.
#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub kind: RecommendationKind,
    pub term: String,
    pub impressions: u64,
    pub clicks: u64,
    pub cost: f64,
    pub conversions: u64,
    pub conv_rate: f64,
    pub cost_per_conversion: Option<f64>,
    /// Only set for `IncreaseBid`.
    pub bid_delta_pct: Option<f64>,
    /// Converting or clicked rival-brand term.
    pub competitor: bool,
    /// Matched vocabulary phrase, if any.
    pub matched_phrase: Option<String>,

    // Populated by hydrators and scorers
    pub share_of_spend: Option<f64>,
    pub share_of_impressions: Option<f64>,
    pub priority_score: Option<f64>,
    pub note: Option<String>,
}

impl Recommendation {
    /// A bare candidate for `row`, before any enrichment.
    pub fn from_row(id: String, kind: RecommendationKind, row: &SearchTermRow) -> Self {
        Self {
            id,
            kind,
            term: row.term.clone(),
            impressions: row.impressions,
            clicks: row.clicks,
            cost: row.cost,
            conversions: row.conversions,
            conv_rate: row.conv_rate(),
            cost_per_conversion: row.cost_per_conversion(),
            ..Recommendation::default()
        }
    }
}

impl Default for Recommendation {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: RecommendationKind::IncreaseBid,
            term: String::new(),
            impressions: 0,
            clicks: 0,
            cost: 0.0,
            conversions: 0,
            conv_rate: 0.0,
            cost_per_conversion: None,
            bid_delta_pct: None,
            competitor: false,
            matched_phrase: None,
            share_of_spend: None,
            share_of_impressions: None,
            priority_score: None,
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_cli_spellings() {
        assert_eq!("increase-bid".parse::<RecommendationKind>(), Ok(RecommendationKind::IncreaseBid));
        assert_eq!("Negative".parse::<RecommendationKind>(), Ok(RecommendationKind::AddNegativeKeyword));
        assert_eq!("ad copy".parse::<RecommendationKind>(), Ok(RecommendationKind::ImproveAdCopy));
        assert!("pause".parse::<RecommendationKind>().is_err());
    }

    #[test]
    fn from_row_copies_metrics() {
        let row = SearchTermRow::new("windshield replacement", 120, 30, 450.0, 6);
        let rec = Recommendation::from_row("r-1".into(), RecommendationKind::IncreaseBid, &row);
        assert_eq!(rec.term, "windshield replacement");
        assert!((rec.conv_rate - 20.0).abs() < 1e-9);
        assert_eq!(rec.cost_per_conversion, Some(75.0));
        assert!(rec.priority_score.is_none());
    }

    #[test]
    fn recommendation_serializes_kind_and_options() {
        let row = SearchTermRow::new("safelite", 40, 0, 0.0, 0);
        let rec = Recommendation::from_row("r-2".into(), RecommendationKind::AddNegativeKeyword, &row);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["kind"], "AddNegativeKeyword");
        assert!(json["cost_per_conversion"].is_null());
        assert_eq!(json["impressions"], 40);
    }
}
