use crate::error::MetricError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

fn hits_at_k<T>(recommended: &[T], bought: &[T], k: usize) -> usize
where
    T: Eq + Hash,
{
    let bought_set: HashSet<&T> = bought.iter().collect();

    // Every occurrence counts, so a duplicated hit is counted twice.
    recommended
        .iter()
        .take(k)
        .filter(|item| bought_set.contains(item))
        .count()
}

/// Share of the first `k` recommendations that were bought.
///
/// The denominator is the length of the truncated list, which is smaller than `k`
/// when fewer recommendations were made.
pub fn precision_at_k<T>(recommended: &[T], bought: &[T], k: usize) -> Result<f64, MetricError>
where
    T: Eq + Hash,
{
    let considered = recommended.len().min(k);
    if considered == 0 {
        return Err(MetricError::EmptyRecommendations);
    }

    Ok(hits_at_k(recommended, bought, k) as f64 / considered as f64)
}

pub fn recall_at_k<T>(recommended: &[T], bought: &[T], k: usize) -> Result<f64, MetricError>
where
    T: Eq + Hash,
{
    if bought.is_empty() {
        return Err(MetricError::EmptyGroundTruth);
    }

    Ok(hits_at_k(recommended, bought, k) as f64 / bought.len() as f64)
}

pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingMetrics {
    pub precision_at_k: f64,
    pub recall_at_k: f64,
    pub f1_score: f64,
}

#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    k: usize,
}

impl MetricsCalculator {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn calculate<T>(
        &self,
        recommended: &[T],
        bought: &[T],
    ) -> Result<RankingMetrics, MetricError>
    where
        T: Eq + Hash,
    {
        let precision = precision_at_k(recommended, bought, self.k)?;
        let recall = recall_at_k(recommended, bought, self.k)?;

        Ok(RankingMetrics {
            precision_at_k: precision,
            recall_at_k: recall,
            f1_score: f1_score(precision, recall),
        })
    }
}
