use async_trait::async_trait;

use crate::filter::{Filter, FilterResult};
use crate::types::{Recommendation, ReportQuery};

/// Keeps only the recommendation kinds the query asks for.
pub struct KindFilter;

#[async_trait]
impl Filter<ReportQuery, Recommendation> for KindFilter {
    fn enable(&self, query: &ReportQuery) -> bool {
        query.kinds.is_some()
    }

    async fn filter(
        &self,
        query: &ReportQuery,
        candidates: Vec<Recommendation>,
    ) -> Result<FilterResult<Recommendation>, String> {
        let kinds = query
            .kinds
            .as_ref()
            .ok_or_else(|| "kind filter ran without requested kinds".to_string())?;

        let (kept, removed): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(|c| kinds.contains(&c.kind));

        Ok(FilterResult { kept, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecommendationKind;
    use adterm_core::SearchTermRow;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn keeps_requested_kinds() {
        let row = SearchTermRow::new("x", 10, 0, 0.0, 0);
        let candidates = vec![
            Recommendation::from_row("1".into(), RecommendationKind::AddNegativeKeyword, &row),
            Recommendation::from_row("2".into(), RecommendationKind::ImproveAdCopy, &row),
        ];
        let mut query = ReportQuery::new("t", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(!KindFilter.enable(&query));

        query.kinds = Some(vec![RecommendationKind::ImproveAdCopy]);
        assert!(KindFilter.enable(&query));

        let result = KindFilter.filter(&query, candidates).await.unwrap();
        assert_eq!(result.kept.len(), 1);
        assert_eq!(result.kept[0].kind, RecommendationKind::ImproveAdCopy);
        assert_eq!(result.removed[0].id, "1");
    }
}
