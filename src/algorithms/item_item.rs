use crate::error::ModelError;
use crate::models::ScoredIndex;
use crate::utils::top_k;
use sprs::CsMat;
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Item-to-item nearest neighbours over the raw interaction matrix.
///
/// Similarity is the dot product of two item columns, i.e. the number of users who
/// bought both items on a binary matrix. Only the `k` best neighbours of each item are
/// kept, the item itself included; on equal scores the item itself wins.
#[derive(Debug, Clone)]
pub struct ItemItemRecommender {
    k: usize,
    neighbours: Vec<Vec<ScoredIndex>>,
}

impl ItemItemRecommender {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            neighbours: Vec::new(),
        }
    }

    pub fn num_items(&self) -> usize {
        self.neighbours.len()
    }

    pub fn neighbours(&self, item: usize) -> Result<&[ScoredIndex], ModelError> {
        self.neighbours
            .get(item)
            .map(Vec::as_slice)
            .ok_or(ModelError::IndexOutOfRange {
                index: item,
                len: self.neighbours.len(),
            })
    }

    pub fn fit(&mut self, user_items: &CsMat<f32>) {
        let user_items = user_items.to_csr();
        let item_users = user_items.transpose_view().to_csr();

        self.neighbours = item_users
            .outer_iterator()
            .enumerate()
            .map(|(item, users)| {
                let mut cooccurrences: HashMap<usize, f32> = HashMap::new();

                for (user, &user_value) in users.iter() {
                    if let Some(row) = user_items.outer_view(user) {
                        for (other, &other_value) in row.iter() {
                            *cooccurrences.entry(other).or_insert(0.0) += user_value * other_value;
                        }
                    }
                }

                let mut scored: Vec<ScoredIndex> = cooccurrences.into_iter().collect();
                scored.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| (b.0 == item).cmp(&(a.0 == item)))
                        .then_with(|| a.0.cmp(&b.0))
                });
                scored.truncate(self.k);
                scored
            })
            .collect();

        info!(
            "Fitted item-item recommender with k={} over {} items",
            self.k,
            self.neighbours.len()
        );
    }

    pub fn recommend(
        &self,
        user_row: &[ScoredIndex],
        n: usize,
        filter_already_liked: bool,
        exclude: &HashSet<usize>,
    ) -> Result<Vec<ScoredIndex>, ModelError> {
        let mut scores: HashMap<usize, f32> = HashMap::new();

        for &(item, value) in user_row {
            for &(neighbour, similarity) in self.neighbours(item)? {
                *scores.entry(neighbour).or_insert(0.0) += value * similarity;
            }
        }

        let liked: HashSet<usize> = if filter_already_liked {
            user_row.iter().map(|&(item, _)| item).collect()
        } else {
            HashSet::new()
        };

        let candidates = scores
            .into_iter()
            .filter(|(item, _)| !liked.contains(item) && !exclude.contains(item));

        Ok(top_k(candidates, n))
    }
}
