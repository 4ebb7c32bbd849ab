use async_trait::async_trait;
use std::sync::Arc;

use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::{Recommendation, ReportQuery};

/// Logs the final selection, one line per recommendation at debug level.
pub struct ReportLogSideEffect;

#[async_trait]
impl SideEffect<ReportQuery, Recommendation> for ReportLogSideEffect {
    async fn run(
        &self,
        input: Arc<SideEffectInput<ReportQuery, Recommendation>>,
    ) -> Result<(), String> {
        let period = input
            .query
            .period
            .as_ref()
            .map(|p| format!("{}..{}", p.start, p.end))
            .unwrap_or_else(|| "unspecified".to_string());

        log::info!(
            "request_id={} period={} selected {} recommendations",
            input.query.request_id,
            period,
            input.selected_candidates.len()
        );
        for (rank, rec) in input.selected_candidates.iter().enumerate() {
            log::debug!(
                "request_id={} #{} {} '{}' score={:.3}",
                input.query.request_id,
                rank + 1,
                rec.kind,
                rec.term,
                rec.priority_score.unwrap_or(0.0)
            );
        }
        Ok(())
    }
}
