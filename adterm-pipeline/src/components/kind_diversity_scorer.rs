use async_trait::async_trait;
use std::collections::HashMap;

use adterm_core::metrics::cmp_desc;

use crate::scorer::Scorer;
use crate::types::{Recommendation, RecommendationKind, ReportQuery};

/// Attenuates scores for repeated recommendation kinds so the digest mixes
/// bid changes, negatives and ad-copy work instead of listing one kind.
///
/// Candidates are ranked by current score; the n-th candidate of a kind
/// (0-based) is multiplied by `(1 - floor) * decay^n + floor`. Kinds in
/// `exempt` keep their score: each bid change stands on its own term.
pub struct KindDiversityScorer {
    pub decay_factor: f64,
    pub floor: f64,
    pub exempt: Vec<RecommendationKind>,
}

impl Default for KindDiversityScorer {
    fn default() -> Self {
        Self {
            decay_factor: 0.7,
            floor: 0.1,
            exempt: vec![RecommendationKind::IncreaseBid],
        }
    }
}

impl KindDiversityScorer {
    fn multiplier(&self, position: usize) -> f64 {
        (1.0 - self.floor) * self.decay_factor.powf(position as f64) + self.floor
    }
}

#[async_trait]
impl Scorer<ReportQuery, Recommendation> for KindDiversityScorer {
    async fn score(
        &self,
        _query: &ReportQuery,
        candidates: &[Recommendation],
    ) -> Result<Vec<Recommendation>, String> {
        let mut kind_counts: HashMap<RecommendationKind, usize> = HashMap::new();
        let mut scored = vec![Recommendation::default(); candidates.len()];

        let mut ordered: Vec<(usize, &Recommendation)> = candidates.iter().enumerate().collect();
        ordered.sort_by(|(_, a), (_, b)| {
            cmp_desc(
                a.priority_score.unwrap_or(f64::NEG_INFINITY),
                b.priority_score.unwrap_or(f64::NEG_INFINITY),
            )
        });

        for (original_idx, candidate) in ordered {
            if self.exempt.contains(&candidate.kind) {
                scored[original_idx] = Recommendation {
                    priority_score: candidate.priority_score,
                    ..Recommendation::default()
                };
                continue;
            }
            let entry = kind_counts.entry(candidate.kind).or_insert(0);
            let position = *entry;
            *entry += 1;

            scored[original_idx] = Recommendation {
                priority_score: candidate.priority_score.map(|s| s * self.multiplier(position)),
                ..Recommendation::default()
            };
        }

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

    fn scored(id: &str, kind: RecommendationKind, score: f64) -> Recommendation {
        Recommendation {
            priority_score: Some(score),
            ..Recommendation::from_row(id.into(), kind, &SearchTermRow::new(id, 10, 0, 0.0, 0))
        }
    }

    #[tokio::test]
    async fn repeated_kinds_decay() {
        let candidates = vec![
            scored("a", RecommendationKind::AddNegativeKeyword, 10.0),
            scored("b", RecommendationKind::AddNegativeKeyword, 9.0),
            scored("c", RecommendationKind::AddNegativeKeyword, 8.0),
            scored("d", RecommendationKind::ImproveAdCopy, 5.0),
        ];
        let query = ReportQuery::new("t", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let out = KindDiversityScorer::default()
            .score(&query, &candidates)
            .await
            .unwrap();
        let s: Vec<f64> = out.iter().map(|c| c.priority_score.unwrap()).collect();

        assert!((s[0] - 10.0).abs() < 1e-9);
        assert!((s[1] - 9.0 * (0.9 * 0.7 + 0.1)).abs() < 1e-9);
        assert!((s[2] - 8.0 * (0.9 * 0.49 + 0.1)).abs() < 1e-9);
        assert!((s[3] - 5.0).abs() < 1e-9, "first of its kind is untouched");
        assert!(s[3] > s[2]);
    }

    #[tokio::test]
    async fn bid_changes_are_not_attenuated() {
        let candidates = vec![
            scored("a", RecommendationKind::IncreaseBid, 10.0),
            scored("b", RecommendationKind::IncreaseBid, 9.0),
            scored("c", RecommendationKind::MonitorCompetitor, 8.0),
            scored("d", RecommendationKind::MonitorCompetitor, 7.0),
        ];
        let query = ReportQuery::new("t", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let out = KindDiversityScorer::default()
            .score(&query, &candidates)
            .await
            .unwrap();
        let s: Vec<f64> = out.iter().map(|c| c.priority_score.unwrap()).collect();

        assert_eq!(s[0], 10.0);
        assert_eq!(s[1], 9.0);
        assert_eq!(s[2], 8.0);
        assert!((s[3] - 7.0 * (0.9 * 0.7 + 0.1)).abs() < 1e-9);

        let strict = KindDiversityScorer {
            exempt: Vec::new(),
            ..KindDiversityScorer::default()
        };
        let out = strict.score(&query, &candidates).await.unwrap();
        assert!(out[1].priority_score.unwrap() < 9.0);
    }

    #[test]
    fn multiplier_approaches_floor() {
        let scorer = KindDiversityScorer::default();
        assert!((scorer.multiplier(0) - 1.0).abs() < 1e-12);
        assert!(scorer.multiplier(50) >= scorer.floor);
        assert!(scorer.multiplier(50) - scorer.floor < 1e-6);
    }
}
