use crate::algorithms::bm25_weight;
use crate::config::WeightingConfig;
use crate::models::{ItemId, ScoredIndex, Transaction, UserId};
use sprs::{CsMat, TriMat};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// Binary user x item purchase matrix with the ids labelling its rows and columns.
///
/// Rows follow ascending user id, columns ascending item id.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    matrix: CsMat<f32>,
    user_ids: Vec<UserId>,
    item_ids: Vec<ItemId>,
}

impl InteractionMatrix {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let user_ids: Vec<UserId> = transactions
            .iter()
            .map(|t| t.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let item_ids: Vec<ItemId> = transactions
            .iter()
            .map(|t| t.item_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_rows: HashMap<UserId, usize> =
            user_ids.iter().enumerate().map(|(row, &id)| (id, row)).collect();
        let item_cols: HashMap<ItemId, usize> =
            item_ids.iter().enumerate().map(|(col, &id)| (id, col)).collect();

        let mut counts: HashMap<(usize, usize), u32> = HashMap::new();
        for transaction in transactions {
            let cell = (user_rows[&transaction.user_id], item_cols[&transaction.item_id]);
            *counts.entry(cell).or_insert(0) += 1;
        }

        let mut triplets = TriMat::with_capacity((user_ids.len(), item_ids.len()), counts.len());
        for ((row, col), count) in counts {
            if count > 0 {
                triplets.add_triplet(row, col, 1.0f32);
            }
        }

        let matrix: CsMat<f32> = triplets.to_csr();

        info!(
            "Built interaction matrix: {} users x {} items, {} interactions from {} transactions",
            user_ids.len(),
            item_ids.len(),
            matrix.nnz(),
            transactions.len()
        );

        Self {
            matrix,
            user_ids,
            item_ids,
        }
    }

    /// BM25-weighted copy, weighting items as documents over their buyers.
    pub fn weighted(&self, weighting: &WeightingConfig) -> Self {
        let item_users = self.matrix.transpose_view().to_csr();
        let weighted = bm25_weight(&item_users, weighting.k1, weighting.b);
        debug!("Applied BM25 weighting with k1={} b={}", weighting.k1, weighting.b);

        Self {
            matrix: weighted.transpose_view().to_csr(),
            user_ids: self.user_ids.clone(),
            item_ids: self.item_ids.clone(),
        }
    }

    pub fn matrix(&self) -> &CsMat<f32> {
        &self.matrix
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn num_users(&self) -> usize {
        self.user_ids.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_ids.len()
    }

    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.matrix.get(row, col).copied().unwrap_or(0.0)
    }

    pub fn row(&self, row: usize) -> Vec<ScoredIndex> {
        self.matrix
            .outer_view(row)
            .map(|entries| entries.iter().map(|(col, &value)| (col, value)).collect())
            .unwrap_or_default()
    }
}

/// Rewrites every item outside the `keep_top` most purchased ones to `sentinel`.
///
/// Popularity is the summed quantity per item, ties go to the lower item id.
pub fn collapse_unpopular_items(
    transactions: &[Transaction],
    keep_top: usize,
    sentinel: ItemId,
) -> Vec<Transaction> {
    let mut popularity: HashMap<ItemId, f64> = HashMap::new();
    for transaction in transactions {
        *popularity.entry(transaction.item_id).or_insert(0.0) += transaction.quantity;
    }

    let mut ranked: Vec<(ItemId, f64)> = popularity.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let kept: HashSet<ItemId> = ranked.iter().take(keep_top).map(|&(item, _)| item).collect();
    info!(
        "Keeping {} of {} items, the rest collapse into {}",
        kept.len(),
        ranked.len(),
        sentinel
    );

    transactions
        .iter()
        .map(|transaction| {
            let mut transaction = transaction.clone();
            if !kept.contains(&transaction.item_id) {
                transaction.item_id = sentinel;
            }
            transaction
        })
        .collect()
}
