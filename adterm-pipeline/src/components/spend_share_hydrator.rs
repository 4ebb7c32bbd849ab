use async_trait::async_trait;

use adterm_core::metrics::safe_ratio;
use adterm_core::SearchTermRow;

use crate::hydrator::Hydrator;
use crate::types::{Recommendation, ReportQuery};

/// Attaches each candidate's share of account spend and impressions.
///
/// Totals are taken from the whole report, not just the candidates, so a
/// share reads as "fraction of the account".
pub struct SpendShareHydrator {
    total_cost: f64,
    total_impressions: u64,
}

impl SpendShareHydrator {
    pub fn new(total_cost: f64, total_impressions: u64) -> Self {
        Self {
            total_cost,
            total_impressions,
        }
    }

    pub fn from_rows(rows: &[SearchTermRow]) -> Self {
        Self::new(
            rows.iter().map(|r| r.cost).sum(),
            rows.iter().map(|r| r.impressions).sum(),
        )
    }
}

#[async_trait]
impl Hydrator<ReportQuery, Recommendation> for SpendShareHydrator {
    async fn hydrate(
        &self,
        _query: &ReportQuery,
        candidates: &[Recommendation],
    ) -> Result<Vec<Recommendation>, String> {
        let hydrated = candidates
            .iter()
            .map(|c| Recommendation {
                share_of_spend: Some(safe_ratio(c.cost, self.total_cost)),
                share_of_impressions: Some(safe_ratio(
                    c.impressions as f64,
                    self.total_impressions as f64,
                )),
                ..Recommendation::default()
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut Recommendation, hydrated: Recommendation) {
        candidate.share_of_spend = hydrated.share_of_spend;
        candidate.share_of_impressions = hydrated.share_of_impressions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecommendationKind;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn shares_are_fractions_of_report_totals() {
        let rows = vec![
            SearchTermRow::new("a", 300, 10, 75.0, 1),
            SearchTermRow::new("b", 100, 5, 25.0, 0),
        ];
        let hydrator = SpendShareHydrator::from_rows(&rows);
        let candidates = vec![Recommendation::from_row(
            "1".into(),
            RecommendationKind::IncreaseBid,
            &rows[0],
        )];
        let query = ReportQuery::new("t", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let hydrated = hydrator.hydrate(&query, &candidates).await.unwrap();
        assert_eq!(hydrated[0].share_of_spend, Some(0.75));
        assert_eq!(hydrated[0].share_of_impressions, Some(0.75));
    }

    #[tokio::test]
    async fn zero_totals_give_zero_shares() {
        let hydrator = SpendShareHydrator::new(0.0, 0);
        let row = SearchTermRow::new("a", 0, 0, 0.0, 0);
        let candidates = vec![Recommendation::from_row(
            "1".into(),
            RecommendationKind::ImproveAdCopy,
            &row,
        )];
        let query = ReportQuery::new("t", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let hydrated = hydrator.hydrate(&query, &candidates).await.unwrap();
        assert_eq!(hydrated[0].share_of_spend, Some(0.0));
    }
}
