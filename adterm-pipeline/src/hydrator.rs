use async_trait::async_trait;

use crate::util;

/// Hydrators enrich candidates after retrieval.
///
/// `hydrate` returns one partially-filled candidate per input, in the same
/// order; `update` merges the owned fields back. A hydrator that returns the
/// wrong number of candidates is skipped.
#[async_trait]
pub trait Hydrator<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    async fn hydrate(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    fn update(&self, candidate: &mut C, hydrated: C);

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
