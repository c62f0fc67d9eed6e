use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const INITIAL_SCALE: f32 = 0.01;

#[derive(Debug, Clone)]
pub enum InitializationMethod {
    Uniform { low: f32, high: f32 },
    Zeros,
}

impl Default for InitializationMethod {
    fn default() -> Self {
        InitializationMethod::Uniform {
            low: 0.0,
            high: INITIAL_SCALE,
        }
    }
}

impl InitializationMethod {
    pub fn initialize_matrix(&self, rows: usize, cols: usize, rng: &mut StdRng) -> DMatrix<f32> {
        match self {
            InitializationMethod::Uniform { low, high } => {
                let mut matrix = DMatrix::zeros(rows, cols);
                for row in 0..rows {
                    for col in 0..cols {
                        matrix[(row, col)] = rng.gen_range(*low..*high);
                    }
                }
                matrix
            }
            InitializationMethod::Zeros => DMatrix::zeros(rows, cols),
        }
    }
}

/// Seeded initializer for the two factor matrices of a factorization model.
pub struct FactorInitializer {
    method: InitializationMethod,
    rng: StdRng,
}

impl FactorInitializer {
    pub fn new(method: InitializationMethod, seed: u64) -> Self {
        Self {
            method,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn initialize(&mut self, rows: usize, factors: usize) -> DMatrix<f32> {
        self.method.initialize_matrix(rows, factors, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_range() {
        let mut initializer = FactorInitializer::new(InitializationMethod::default(), 8);
        let matrix = initializer.initialize(10, 4);

        assert_eq!(matrix.nrows(), 10);
        assert_eq!(matrix.ncols(), 4);
        for &value in matrix.iter() {
            assert!((0.0..INITIAL_SCALE).contains(&value));
        }
    }

    #[test]
    fn test_reproducible_with_seed() {
        let first = FactorInitializer::new(InitializationMethod::default(), 42).initialize(5, 3);
        let second = FactorInitializer::new(InitializationMethod::default(), 42).initialize(5, 3);
        let other = FactorInitializer::new(InitializationMethod::default(), 43).initialize(5, 3);

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn test_zeros() {
        let mut initializer = FactorInitializer::new(InitializationMethod::Zeros, 1);
        assert!(initializer.initialize(3, 2).iter().all(|&v| v == 0.0));
    }
}
