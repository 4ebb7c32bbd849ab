use async_trait::async_trait;

use crate::util;

/// Scorers run in sequence, each seeing the scores written by the previous
/// one. Same length/order contract as [`crate::hydrator::Hydrator`].
#[async_trait]
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    async fn score(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy the score fields this scorer owns into the candidate.
    fn update(&self, candidate: &mut C, scored: C);

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
