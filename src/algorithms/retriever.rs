use crate::error::ModelError;
use crate::models::ScoredIndex;
use crate::utils::top_k;
use nalgebra::DMatrix;

#[derive(Debug, Clone)]
pub struct FactorRetriever {
    normalized: DMatrix<f32>,
}

impl FactorRetriever {
    pub fn new(factors: &DMatrix<f32>) -> Self {
        let mut normalized = factors.clone();

        for mut row in normalized.row_iter_mut() {
            let norm = row.norm();
            if norm > 0.0 {
                row.scale_mut(1.0 / norm);
            }
        }

        Self { normalized }
    }

    pub fn len(&self) -> usize {
        self.normalized.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `top_k` rows most similar to row `query`. The query row itself is part of
    /// the candidates.
    pub fn search_similar(
        &self,
        query: usize,
        top_k_rows: usize,
    ) -> Result<Vec<ScoredIndex>, ModelError> {
        if query >= self.len() {
            return Err(ModelError::IndexOutOfRange {
                index: query,
                len: self.len(),
            });
        }

        let query_vector = self.normalized.row(query).transpose();
        let similarities = &self.normalized * query_vector;

        Ok(top_k(similarities.iter().copied().enumerate(), top_k_rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors() -> DMatrix<f32> {
        DMatrix::from_row_slice(4, 2, &[
            1.0, 0.0,
            2.0, 0.1,
            0.0, 1.0,
            0.0, 0.0,
        ])
    }

    #[test]
    fn test_search_similar() {
        let retriever = FactorRetriever::new(&factors());
        let results = retriever.search_similar(0, 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert!((results[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(results[1].0, 1);
    }

    #[test]
    fn test_zero_row_scores_zero() {
        let retriever = FactorRetriever::new(&factors());
        let results = retriever.search_similar(3, 4).unwrap();

        assert!(results.iter().all(|(_, score)| *score == 0.0));
        assert_eq!(results[0].0, 0);
    }

    #[test]
    fn test_out_of_range() {
        let retriever = FactorRetriever::new(&factors());
        assert_eq!(
            retriever.search_similar(9, 1),
            Err(ModelError::IndexOutOfRange { index: 9, len: 4 })
        );
    }
}
