//! BM25 reweighting of sparse interaction counts.

use sprs::CsMat;

/// Applies BM25 weighting to `matrix`, treating rows as documents and columns as terms.
///
/// Frequent columns get a low inverse document frequency and long rows are damped by
/// the length normalisation. The sparsity pattern is left untouched.
pub fn bm25_weight(matrix: &CsMat<f32>, k1: f32, b: f32) -> CsMat<f32> {
    let matrix = matrix.to_csr();
    let (num_rows, num_cols) = (matrix.rows(), matrix.cols());
    if matrix.nnz() == 0 {
        return matrix;
    }

    let mut document_frequency = vec![0usize; num_cols];
    let mut row_sums = Vec::with_capacity(num_rows);

    for row in matrix.outer_iterator() {
        let mut sum = 0.0f32;
        for (col, &value) in row.iter() {
            document_frequency[col] += 1;
            sum += value;
        }
        row_sums.push(sum);
    }

    let n = num_rows as f32;
    let idf: Vec<f32> = document_frequency
        .iter()
        .map(|&df| n.ln() - (df as f32).ln_1p())
        .collect();

    let average_length = row_sums.iter().sum::<f32>() / n;

    let mut indptr = Vec::with_capacity(num_rows + 1);
    let mut indices = Vec::with_capacity(matrix.nnz());
    let mut data = Vec::with_capacity(matrix.nnz());
    indptr.push(0usize);

    for (row_idx, row) in matrix.outer_iterator().enumerate() {
        let length_norm = (1.0 - b) + b * row_sums[row_idx] / average_length;

        for (col, &value) in row.iter() {
            indices.push(col);
            data.push(value * (k1 + 1.0) / (k1 * length_norm + value) * idf[col]);
        }
        indptr.push(indices.len());
    }

    CsMat::new((num_rows, num_cols), indptr, indices, data)
}
