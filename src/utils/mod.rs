use crate::models::ScoredIndex;
use std::cmp::Ordering;

pub mod metrics;
pub mod validation;

pub fn compare_scored(a: &ScoredIndex, b: &ScoredIndex) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(&b.0))
}

/// Returns the `k` best `(index, score)` pairs, highest score first.
pub fn top_k<I>(scores: I, k: usize) -> Vec<ScoredIndex>
where
    I: IntoIterator<Item = ScoredIndex>,
{
    let mut indexed_scores: Vec<ScoredIndex> = scores
        .into_iter()
        .filter(|(_, score)| !score.is_nan())
        .collect();

    indexed_scores.sort_by(compare_scored);
    indexed_scores.truncate(k);
    indexed_scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k() {
        let scores = vec![0.1, 0.5, 0.3, 0.9, 0.2];
        let top_2 = top_k(scores.into_iter().enumerate(), 2);
        assert_eq!(top_2, vec![(3, 0.9), (1, 0.5)]);
    }

    #[test]
    fn test_top_k_ties_prefer_lower_index() {
        let scores = vec![(4, 1.0), (2, 1.0), (7, 3.0), (0, 1.0)];
        let top = top_k(scores, 3);
        assert_eq!(top, vec![(7, 3.0), (0, 1.0), (2, 1.0)]);
    }

    #[test]
    fn test_top_k_skips_nan() {
        let top = top_k(vec![(0, f32::NAN), (1, 0.5)], 5);
        assert_eq!(top, vec![(1, 0.5)]);
    }
}
