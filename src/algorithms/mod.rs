pub mod als;
pub mod initializer;
pub mod item_item;
pub mod retriever;
pub mod weighting;

pub use als::AlternatingLeastSquares;
pub use item_item::ItemItemRecommender;
pub use weighting::bm25_weight;

use crate::error::ModelError;
use crate::models::ScoredIndex;
use sprs::CsMat;
use std::collections::HashSet;

/// Latent factor model consumed by the recommendation assembler.
///
/// Similarity queries may return the query row itself among the results, usually first;
/// callers filter it out by index rather than by position.
pub trait LatentFactorModel: Send + Sync {
    fn fit(&mut self, user_items: &CsMat<f32>) -> Result<(), ModelError>;

    fn similar_items(&self, item: usize, n: usize) -> Result<Vec<ScoredIndex>, ModelError>;

    fn similar_users(&self, user: usize, n: usize) -> Result<Vec<ScoredIndex>, ModelError>;

    /// The `n` best scoring items for `user`, skipping every index in `exclude`.
    fn recommend(
        &self,
        user: usize,
        n: usize,
        exclude: &HashSet<usize>,
    ) -> Result<Vec<ScoredIndex>, ModelError>;
}
