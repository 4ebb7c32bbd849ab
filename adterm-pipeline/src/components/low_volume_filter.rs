use async_trait::async_trait;

use crate::filter::{Filter, FilterResult};
use crate::types::{Recommendation, RecommendationKind, ReportQuery};

/// Drops candidates seen fewer than `query.min_impressions` times.
///
/// `IncreaseBid` candidates are exempt.
pub struct LowVolumeFilter;

#[async_trait]
impl Filter<ReportQuery, Recommendation> for LowVolumeFilter {
    fn enable(&self, query: &ReportQuery) -> bool {
        query.min_impressions > 0
    }

    async fn filter(
        &self,
        query: &ReportQuery,
        candidates: Vec<Recommendation>,
    ) -> Result<FilterResult<Recommendation>, String> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|c| {
            c.kind == RecommendationKind::IncreaseBid || c.impressions >= query.min_impressions
        });

        Ok(FilterResult { kept, removed })
    }
}
