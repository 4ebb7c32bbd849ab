//! The staged candidate pipeline.
//!
//! Stage order:
//! 1. query hydrators (concurrent)
//! 2. sources (concurrent)
//! 3. hydrators
//! 4. filters
//! 5. scorers
//! 6. selector
//! 7. post-selection hydrators
//! 8. side effects
//!
//! A failing component is logged and skipped; `execute` always returns a
//! result.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries carry a request id so every log line can be correlated.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything a pipeline run produced.
#[derive(Clone, Debug)]
pub struct PipelineResult<Q, C> {
    /// The query after hydration.
    pub query: Arc<Q>,
    /// Every candidate the sources returned.
    pub retrieved_candidates: Vec<C>,
    /// Candidates removed by filters.
    pub filtered_candidates: Vec<C>,
    /// The final, ordered selection.
    pub selected_candidates: Vec<C>,
}

#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;
    fn result_size(&self) -> usize;

    async fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let query = self.hydrate_query(query).await;
        let request_id = query.request_id().to_string();

        let retrieved = self.fetch_candidates(&query).await;
        let hydrated = run_hydrators(self.hydrators(), &query, retrieved.clone()).await;
        let (kept, filtered) = self.filter(&query, hydrated).await;
        let scored = self.score(&query, kept).await;

        let mut selected = if self.selector().enable(&query) {
            self.selector().select(&query, scored)
        } else {
            scored
        };
        selected = run_hydrators(self.post_selection_hydrators(), &query, selected).await;
        selected.truncate(self.result_size());

        log::info!(
            "request_id={} retrieved={} filtered={} selected={}",
            request_id,
            retrieved.len(),
            filtered.len(),
            selected.len()
        );

        let query = Arc::new(query);
        self.run_side_effects(Arc::new(SideEffectInput {
            query: Arc::clone(&query),
            selected_candidates: selected.clone(),
        }))
        .await;

        PipelineResult {
            query,
            retrieved_candidates: retrieved,
            filtered_candidates: filtered,
            selected_candidates: selected,
        }
    }

    async fn hydrate_query(&self, query: Q) -> Q {
        let enabled: Vec<_> = self
            .query_hydrators()
            .iter()
            .filter(|h| h.enable(&query))
            .collect();
        let results = join_all(enabled.iter().map(|h| h.hydrate(&query))).await;

        let mut hydrated_query = query.clone();
        for (hydrator, result) in enabled.iter().zip(results) {
            match result {
                Ok(hydrated) => hydrator.update(&mut hydrated_query, hydrated),
                Err(err) => log::warn!(
                    "request_id={} query hydrator {} failed: {}",
                    query.request_id(),
                    hydrator.name(),
                    err
                ),
            }
        }
        hydrated_query
    }

    async fn fetch_candidates(&self, query: &Q) -> Vec<C> {
        let enabled: Vec<_> = self.sources().iter().filter(|s| s.enable(query)).collect();
        let results = join_all(enabled.iter().map(|s| s.get_candidates(query))).await;

        let mut candidates = Vec::new();
        for (source, result) in enabled.iter().zip(results) {
            match result {
                Ok(found) => {
                    log::debug!(
                        "request_id={} source {} returned {} candidates",
                        query.request_id(),
                        source.name(),
                        found.len()
                    );
                    candidates.extend(found);
                }
                Err(err) => log::warn!(
                    "request_id={} source {} failed: {}",
                    query.request_id(),
                    source.name(),
                    err
                ),
            }
        }
        candidates
    }

    async fn filter(&self, query: &Q, candidates: Vec<C>) -> (Vec<C>, Vec<C>) {
        let mut kept = candidates;
        let mut removed = Vec::new();
        for filter in self.filters().iter().filter(|f| f.enable(query)) {
            let backup = kept.clone();
            match filter.filter(query, kept).await {
                Ok(result) => {
                    kept = result.kept;
                    removed.extend(result.removed);
                }
                Err(err) => {
                    log::warn!(
                        "request_id={} filter {} failed: {}",
                        query.request_id(),
                        filter.name(),
                        err
                    );
                    kept = backup;
                }
            }
        }
        (kept, removed)
    }

    async fn score(&self, query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut candidates = candidates;
        for scorer in self.scorers().iter().filter(|s| s.enable(query)) {
            match scorer.score(query, &candidates).await {
                Ok(scored) if scored.len() == candidates.len() => {
                    for (candidate, scored) in candidates.iter_mut().zip(scored) {
                        scorer.update(candidate, scored);
                    }
                }
                Ok(scored) => log::warn!(
                    "request_id={} scorer {} returned {} candidates, expected {}",
                    query.request_id(),
                    scorer.name(),
                    scored.len(),
                    candidates.len()
                ),
                Err(err) => log::warn!(
                    "request_id={} scorer {} failed: {}",
                    query.request_id(),
                    scorer.name(),
                    err
                ),
            }
        }
        candidates
    }

    async fn run_side_effects(&self, input: Arc<SideEffectInput<Q, C>>) {
        let side_effects = self.side_effects();
        let enabled: Vec<_> = side_effects
            .iter()
            .filter(|s| s.enable(Arc::clone(&input.query)))
            .collect();
        let results = join_all(enabled.iter().map(|s| s.run(Arc::clone(&input)))).await;
        for (side_effect, result) in enabled.iter().zip(results) {
            if let Err(err) = result {
                log::warn!(
                    "request_id={} side effect {} failed: {}",
                    input.query.request_id(),
                    side_effect.name(),
                    err
                );
            }
        }
    }
}

async fn run_hydrators<Q, C>(hydrators: &[Box<dyn Hydrator<Q, C>>], query: &Q, candidates: Vec<C>) -> Vec<C>
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    let mut candidates = candidates;
    for hydrator in hydrators.iter().filter(|h| h.enable(query)) {
        match hydrator.hydrate(query, &candidates).await {
            Ok(hydrated) if hydrated.len() == candidates.len() => {
                for (candidate, hydrated) in candidates.iter_mut().zip(hydrated) {
                    hydrator.update(candidate, hydrated);
                }
            }
            Ok(hydrated) => log::warn!(
                "request_id={} hydrator {} returned {} candidates, expected {}",
                query.request_id(),
                hydrator.name(),
                hydrated.len(),
                candidates.len()
            ),
            Err(err) => log::warn!(
                "request_id={} hydrator {} failed: {}",
                query.request_id(),
                hydrator.name(),
                err
            ),
        }
    }
    candidates
}
