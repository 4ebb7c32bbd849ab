use async_trait::async_trait;

use crate::hydrator::Hydrator;
use crate::types::{Recommendation, RecommendationKind, ReportQuery};

/// Writes the human-readable note shown next to each selected
/// recommendation. Bid notes set by the source are kept as they are.
pub struct RecommendationNoteHydrator;

impl RecommendationNoteHydrator {
    fn note_for(candidate: &Recommendation) -> String {
        let phrase = candidate
            .matched_phrase
            .as_deref()
            .map(|p| format!(" ('{}')", p))
            .unwrap_or_default();

        match candidate.kind {
            RecommendationKind::IncreaseBid => format!(
                "converting at {:.1}%; raise bid",
                candidate.conv_rate
            ),
            RecommendationKind::AddNegativeKeyword => format!(
                "competitor term{} shown {} times without a click; add as negative keyword",
                phrase, candidate.impressions
            ),
            RecommendationKind::MonitorCompetitor => format!(
                "competitor term{} drew {} clicks (${:.2}) without converting; monitor",
                phrase, candidate.clicks, candidate.cost
            ),
            RecommendationKind::ImproveAdCopy => format!(
                "high-intent term{} shown {} times without a click; review ad copy",
                phrase, candidate.impressions
            ),
        }
    }
}

#[async_trait]
impl Hydrator<ReportQuery, Recommendation> for RecommendationNoteHydrator {
    async fn hydrate(
        &self,
        _query: &ReportQuery,
        candidates: &[Recommendation],
    ) -> Result<Vec<Recommendation>, String> {
        let hydrated = candidates
            .iter()
            .map(|c| Recommendation {
                note: Some(c.note.clone().unwrap_or_else(|| Self::note_for(c))),
                ..Recommendation::default()
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut Recommendation, hydrated: Recommendation) {
        candidate.note = hydrated.note;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adterm_core::SearchTermRow;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn notes_per_kind_and_existing_notes_kept() {
        let wasted = Recommendation {
            matched_phrase: Some("safelite".into()),
            ..Recommendation::from_row(
                "1".into(),
                RecommendationKind::AddNegativeKeyword,
                &SearchTermRow::new("safelite austin", 42, 0, 0.0, 0),
            )
        };
        let monitor = Recommendation::from_row(
            "2".into(),
            RecommendationKind::MonitorCompetitor,
            &SearchTermRow::new("glass doctor", 90, 6, 18.5, 0),
        );
        let bid = Recommendation {
            note: Some("strong converter at 20.0%".into()),
            ..Recommendation::from_row(
                "3".into(),
                RecommendationKind::IncreaseBid,
                &SearchTermRow::new("windshield replacement", 120, 30, 450.0, 6),
            )
        };

        let query = ReportQuery::new("t", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let hydrated = RecommendationNoteHydrator
            .hydrate(&query, &[wasted, monitor, bid])
            .await
            .unwrap();

        assert_eq!(
            hydrated[0].note.as_deref(),
            Some("competitor term ('safelite') shown 42 times without a click; add as negative keyword")
        );
        assert_eq!(
            hydrated[1].note.as_deref(),
            Some("competitor term drew 6 clicks ($18.50) without converting; monitor")
        );
        assert_eq!(hydrated[2].note.as_deref(), Some("strong converter at 20.0%"));
    }
}
