use async_trait::async_trait;
use std::sync::Arc;

use adterm_core::thresholds::DEFAULT_TOP;
use adterm_core::{SearchTermRow, Vocabularies};

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::kind_diversity_scorer::KindDiversityScorer;
use crate::components::kind_filter::KindFilter;
use crate::components::low_volume_filter::LowVolumeFilter;
use crate::components::period_query_hydrator::PeriodQueryHydrator;
use crate::components::recommendation_note_hydrator::RecommendationNoteHydrator;
use crate::components::report_log_side_effect::ReportLogSideEffect;
use crate::components::search_term_source::SearchTermSource;
use crate::components::spend_impact_scorer::SpendImpactScorer;
use crate::components::spend_share_hydrator::SpendShareHydrator;
use crate::components::top_k_selector::TopKSelector;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{Recommendation, ReportQuery};

/// The search-term optimization digest.
///
/// Pipeline flow:
/// 1. PeriodQueryHydrator fills in a missing reporting period
/// 2. SearchTermSource classifies the report into recommendations
/// 3. SpendShareHydrator attaches share of spend and impressions
/// 4. LowVolumeFilter drops rarely shown non-converters
/// 5. KindFilter keeps requested kinds (only when the query names kinds)
/// 6. SpendImpactScorer assigns priority scores
/// 7. KindDiversityScorer attenuates repeated kinds (bid changes exempt)
/// 8. TopKSelector picks the top N
/// 9. RecommendationNoteHydrator writes the notes of the selection
/// 10. ReportLogSideEffect logs the result
pub struct OptimizationDigestPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<ReportQuery>>>,
    sources: Vec<Box<dyn Source<ReportQuery, Recommendation>>>,
    hydrators: Vec<Box<dyn Hydrator<ReportQuery, Recommendation>>>,
    filters: Vec<Box<dyn Filter<ReportQuery, Recommendation>>>,
    scorers: Vec<Box<dyn Scorer<ReportQuery, Recommendation>>>,
    selector: TopKSelector,
    post_selection_hydrators: Vec<Box<dyn Hydrator<ReportQuery, Recommendation>>>,
    side_effects: Arc<Vec<Box<dyn SideEffect<ReportQuery, Recommendation>>>>,
    result_size: usize,
}

impl OptimizationDigestPipeline {
    /// Create a pipeline over one report's rows with the default result size.
    pub fn with_rows(rows: Vec<SearchTermRow>, vocabularies: Vocabularies) -> Self {
        Self::with_rows_and_size(rows, vocabularies, DEFAULT_TOP)
    }

    /// Create a pipeline over one report's rows with a custom result size.
    pub fn with_rows_and_size(
        rows: Vec<SearchTermRow>,
        vocabularies: Vocabularies,
        result_size: usize,
    ) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<ReportQuery>>> =
            vec![Box::new(PeriodQueryHydrator::new())];

        let hydrators: Vec<Box<dyn Hydrator<ReportQuery, Recommendation>>> =
            vec![Box::new(SpendShareHydrator::from_rows(&rows))];

        let sources: Vec<Box<dyn Source<ReportQuery, Recommendation>>> =
            vec![Box::new(SearchTermSource::new(rows, vocabularies))];

        let filters: Vec<Box<dyn Filter<ReportQuery, Recommendation>>> =
            vec![Box::new(LowVolumeFilter), Box::new(KindFilter)];

        let scorers: Vec<Box<dyn Scorer<ReportQuery, Recommendation>>> = vec![
            Box::new(SpendImpactScorer),
            Box::new(KindDiversityScorer::default()),
        ];

        let selector = TopKSelector { k: result_size };

        let post_selection_hydrators: Vec<Box<dyn Hydrator<ReportQuery, Recommendation>>> =
            vec![Box::new(RecommendationNoteHydrator)];

        let side_effects: Arc<Vec<Box<dyn SideEffect<ReportQuery, Recommendation>>>> =
            Arc::new(vec![Box::new(ReportLogSideEffect)]);

        Self {
            query_hydrators,
            sources,
            hydrators,
            filters,
            scorers,
            selector,
            post_selection_hydrators,
            side_effects,
            result_size,
        }
    }
}

#[async_trait]
impl CandidatePipeline<ReportQuery, Recommendation> for OptimizationDigestPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<ReportQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<ReportQuery, Recommendation>>] {
        &self.sources
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<ReportQuery, Recommendation>>] {
        &self.hydrators
    }

    fn filters(&self) -> &[Box<dyn Filter<ReportQuery, Recommendation>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<ReportQuery, Recommendation>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<ReportQuery, Recommendation> {
        &self.selector
    }

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<ReportQuery, Recommendation>>] {
        &self.post_selection_hydrators
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<ReportQuery, Recommendation>>>> {
        Arc::clone(&self.side_effects)
    }

    fn result_size(&self) -> usize {
        self.result_size
    }
}
