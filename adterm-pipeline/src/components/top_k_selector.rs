use adterm_core::metrics::cmp_desc;

use crate::selector::Selector;
use crate::types::{Recommendation, ReportQuery};

/// Selects the top K candidates by priority score. Equal scores are ordered
/// by kind (bid changes first), then higher spend, then term, so the digest
/// is the same on every run.
pub struct TopKSelector {
    pub k: usize,
}

impl Default for TopKSelector {
    fn default() -> Self {
        Self {
            k: adterm_core::thresholds::DEFAULT_TOP,
        }
    }
}

impl Selector<ReportQuery, Recommendation> for TopKSelector {
    fn score(&self, candidate: &Recommendation) -> f64 {
        candidate.priority_score.unwrap_or(f64::NEG_INFINITY)
    }

    fn sort(&self, candidates: Vec<Recommendation>) -> Vec<Recommendation> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| {
            cmp_desc(self.score(a), self.score(b))
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| cmp_desc(a.cost, b.cost))
                .then_with(|| a.term.cmp(&b.term))
        });
        sorted
    }

    fn size(&self) -> Option<usize> {
        Some(self.k)
    }
}
