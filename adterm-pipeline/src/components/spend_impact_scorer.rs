use async_trait::async_trait;

use crate::scorer::Scorer;
use crate::types::{Recommendation, RecommendationKind, ReportQuery};

/// Scores candidates by visibility, spend and conversions on a log scale,
/// times a per-kind weight.
pub struct SpendImpactScorer;

impl SpendImpactScorer {
    pub fn kind_weight(kind: RecommendationKind) -> f64 {
        match kind {
            RecommendationKind::IncreaseBid => 1.5,
            RecommendationKind::AddNegativeKeyword => 1.2,
            RecommendationKind::ImproveAdCopy => 1.0,
            RecommendationKind::MonitorCompetitor => 0.8,
        }
    }
}

#[async_trait]
impl Scorer<ReportQuery, Recommendation> for SpendImpactScorer {
    async fn score(
        &self,
        _query: &ReportQuery,
        candidates: &[Recommendation],
    ) -> Result<Vec<Recommendation>, String> {
        let scored = candidates
            .iter()
            .map(|c| {
                let visibility = (c.impressions as f64 + 1.0).ln();
                let spend = (c.cost + 1.0).ln();
                let outcome = 2.0 * (c.conversions as f64 + 1.0).ln();
                Recommendation {
                    priority_score: Some(
                        (visibility + spend + outcome) * Self::kind_weight(c.kind),
                    ),
                    ..Recommendation::default()
                }
            })
            .collect();

        Ok(scored)
    }

    fn update(&self, candidate: &mut Recommendation, scored: Recommendation) {
        candidate.priority_score = scored.priority_score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adterm_core::SearchTermRow;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn converters_outrank_equal_volume_waste() {
        let row = SearchTermRow::new("x", 100, 0, 0.0, 0);
        let converting = SearchTermRow::new("y", 100, 10, 50.0, 2);
        let candidates = vec![
            Recommendation::from_row("1".into(), RecommendationKind::AddNegativeKeyword, &row),
            Recommendation::from_row("2".into(), RecommendationKind::IncreaseBid, &converting),
            Recommendation::from_row("3".into(), RecommendationKind::MonitorCompetitor, &row),
        ];
        let query = ReportQuery::new("t", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let scored = SpendImpactScorer.score(&query, &candidates).await.unwrap();

        let s: Vec<f64> = scored.iter().map(|c| c.priority_score.unwrap()).collect();
        assert!(s[1] > s[0]);
        assert!(s[0] > s[2]);
        assert!((s[0] - 101f64.ln() * 1.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn zero_row_scores_zero() {
        let row = SearchTermRow::new("x", 0, 0, 0.0, 0);
        let candidates = vec![Recommendation::from_row(
            "1".into(),
            RecommendationKind::ImproveAdCopy,
            &row,
        )];
        let query = ReportQuery::new("t", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let scored = SpendImpactScorer.score(&query, &candidates).await.unwrap();
        assert_eq!(scored[0].priority_score, Some(0.0));
    }
}
