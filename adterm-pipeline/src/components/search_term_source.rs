use async_trait::async_trait;

use adterm_core::{classify, detect_signals, recommend_bid, SearchTermRow, Vocabularies};

use crate::source::Source;
use crate::types::{Recommendation, RecommendationKind, ReportQuery};

/// Source that classifies the uploaded report and emits one recommendation
/// per actionable bucket membership:
///
/// | bucket                              | kind                 |
/// |-------------------------------------|----------------------|
/// | converters                          | `IncreaseBid`        |
/// | wasted                              | `AddNegativeKeyword` |
/// | competitors, clicked, no conversion | `MonitorCompetitor`  |
/// | high intent                         | `ImproveAdCopy`      |
///
/// A converting competitor term only yields `IncreaseBid`.
pub struct SearchTermSource {
    rows: Vec<SearchTermRow>,
    vocabularies: Vocabularies,
}

impl SearchTermSource {
    pub fn new(rows: Vec<SearchTermRow>, vocabularies: Vocabularies) -> Self {
        Self { rows, vocabularies }
    }

    fn candidate(&self, id: String, kind: RecommendationKind, row: &SearchTermRow) -> Recommendation {
        let signals = detect_signals(row, &self.vocabularies);
        let matched_phrase = if signals.is_competitor {
            self.vocabularies.competitor_brands.first_match(&row.term)
        } else if signals.is_high_intent {
            self.vocabularies.high_intent.first_match(&row.term)
        } else {
            None
        };

        Recommendation {
            competitor: signals.is_competitor,
            matched_phrase: matched_phrase.map(str::to_string),
            ..Recommendation::from_row(id, kind, row)
        }
    }
}

#[async_trait]
impl Source<ReportQuery, Recommendation> for SearchTermSource {
    async fn get_candidates(&self, query: &ReportQuery) -> Result<Vec<Recommendation>, String> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }

        let result = classify(&self.rows, &self.vocabularies);
        let mut candidates = Vec::new();
        let id = |n: usize| format!("{}-{}", query.request_id, n + 1);

        for row in &result.converters {
            let mut rec = self.candidate(id(candidates.len()), RecommendationKind::IncreaseBid, row);
            if let Some(bid) = recommend_bid(row, result.cost_per_conversion, rec.competitor) {
                rec.bid_delta_pct = Some(bid.bid_delta_pct);
                rec.note = Some(bid.note);
            }
            candidates.push(rec);
        }
        for row in &result.wasted {
            candidates.push(self.candidate(id(candidates.len()), RecommendationKind::AddNegativeKeyword, row));
        }
        for row in result.competitors.iter().filter(|r| !r.has_conversions() && r.clicks > 0) {
            candidates.push(self.candidate(id(candidates.len()), RecommendationKind::MonitorCompetitor, row));
        }
        for row in &result.high_intent {
            candidates.push(self.candidate(id(candidates.len()), RecommendationKind::ImproveAdCopy, row));
        }

        log::debug!(
            "request_id={} classified {} rows: {} converters, {} wasted, {} competitors, {} high intent",
            query.request_id,
            self.rows.len(),
            result.converters.len(),
            result.wasted.len(),
            result.competitors.len(),
            result.high_intent.len()
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adterm_core::Vocabulary;
    use chrono::NaiveDate;

    fn query() -> ReportQuery {
        ReportQuery {
            request_id: "req".into(),
            as_of: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            period: None,
            kinds: None,
            min_impressions: 0,
        }
    }

    #[tokio::test]
    async fn emits_one_candidate_per_bucket_membership() {
        let rows = vec![
            SearchTermRow::new("rival brand x", 50, 0, 0.0, 0),
            SearchTermRow::new("windshield repair near me", 80, 0, 0.0, 0),
            SearchTermRow::new("windshield replacement", 120, 30, 450.0, 6),
            SearchTermRow::new("rival brand x reviews", 70, 9, 31.5, 0),
            SearchTermRow::new("rival brand x price", 30, 3, 12.0, 1),
        ];
        let vocab = Vocabularies::new(
            Vocabulary::new(["rival brand x"]),
            Vocabulary::new(["near me", "windshield repair"]),
        );
        let source = SearchTermSource::new(rows, vocab);
        let candidates = source.get_candidates(&query()).await.unwrap();

        let kinds: Vec<_> = candidates.iter().map(|c| (c.kind, c.term.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (RecommendationKind::IncreaseBid, "rival brand x price"),
                (RecommendationKind::IncreaseBid, "windshield replacement"),
                (RecommendationKind::AddNegativeKeyword, "rival brand x"),
                (RecommendationKind::MonitorCompetitor, "rival brand x reviews"),
                (RecommendationKind::ImproveAdCopy, "windshield repair near me"),
            ]
        );

        let converting_rival = &candidates[0];
        assert!(converting_rival.competitor);
        assert_eq!(converting_rival.matched_phrase.as_deref(), Some("rival brand x"));
        assert!(converting_rival.note.as_deref().unwrap().contains("keep"));

        assert_eq!(candidates[1].bid_delta_pct, Some(25.0));
        assert_eq!(candidates[4].matched_phrase.as_deref(), Some("windshield repair"));
        assert_eq!(candidates[0].id, "req-1");
        assert_eq!(candidates[4].id, "req-5");
    }

    #[tokio::test]
    async fn empty_report_yields_nothing() {
        let source = SearchTermSource::new(Vec::new(), Vocabularies::default());
        assert!(source.get_candidates(&query()).await.unwrap().is_empty());
    }
}
