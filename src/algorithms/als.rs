use super::initializer::{FactorInitializer, InitializationMethod};
use super::retriever::FactorRetriever;
use super::LatentFactorModel;
use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::models::ScoredIndex;
use crate::utils::top_k;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use sprs::CsMat;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
struct FittedFactors {
    user_factors: DMatrix<f32>,
    item_factors: DMatrix<f32>,
    users: FactorRetriever,
    items: FactorRetriever,
}

/// Implicit-feedback matrix factorization fit by alternating least squares.
///
/// Stored matrix values are read as confidences and every stored entry as a positive
/// preference. Each half-iteration solves one regularized least squares system per row.
#[derive(Debug, Clone)]
pub struct AlternatingLeastSquares {
    config: ModelConfig,
    fitted: Option<FittedFactors>,
}

impl AlternatingLeastSquares {
    pub fn new(config: ModelConfig) -> Self {
        Self { config, fitted: None }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn user_factors(&self) -> Option<&DMatrix<f32>> {
        self.fitted.as_ref().map(|fitted| &fitted.user_factors)
    }

    pub fn item_factors(&self) -> Option<&DMatrix<f32>> {
        self.fitted.as_ref().map(|fitted| &fitted.item_factors)
    }

    fn fitted(&self) -> Result<&FittedFactors, ModelError> {
        self.fitted.as_ref().ok_or(ModelError::NotFitted)
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool, ModelError> {
        let threads = match self.config.num_threads {
            0 => num_cpus::get(),
            n => n,
        };

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| ModelError::ThreadPool(e.to_string()))
    }
}

fn least_squares(
    cui: &CsMat<f32>,
    y: &DMatrix<f32>,
    regularization: f32,
) -> Result<DMatrix<f32>, ModelError> {
    let factors = y.ncols();
    let yty = y.transpose() * y;
    let base = yty + DMatrix::<f32>::identity(factors, factors) * regularization;

    let solutions = (0..cui.rows())
        .into_par_iter()
        .map(|row| solve_row(cui, row, y, &base))
        .collect::<Result<Vec<_>, _>>()?;

    let mut x = DMatrix::zeros(cui.rows(), factors);
    for (row, solution) in solutions.iter().enumerate() {
        x.set_row(row, &solution.transpose());
    }

    Ok(x)
}

fn solve_row(
    cui: &CsMat<f32>,
    row: usize,
    y: &DMatrix<f32>,
    base: &DMatrix<f32>,
) -> Result<DVector<f32>, ModelError> {
    let factors = y.ncols();
    let entries = match cui.outer_view(row) {
        Some(entries) if entries.nnz() > 0 => entries,
        _ => return Ok(DVector::zeros(factors)),
    };

    let mut a = base.clone();
    let mut b = DVector::zeros(factors);

    for (col, &confidence) in entries.iter() {
        let yi = y.row(col).transpose();
        // negative confidences stand for a preference of 0 with weight |c|
        if confidence > 0.0 {
            b.axpy(confidence, &yi, 1.0);
        }
        a.ger(confidence.abs() - 1.0, &yi, &yi, 1.0);
    }

    if let Some(cholesky) = a.clone().cholesky() {
        return Ok(cholesky.solve(&b));
    }

    // Confidences below one can break positive definiteness.
    warn!("Cholesky failed for row {}, falling back to LU", row);
    a.lu().solve(&b).ok_or(ModelError::Solver { row })
}

impl LatentFactorModel for AlternatingLeastSquares {
    fn fit(&mut self, user_items: &CsMat<f32>) -> Result<(), ModelError> {
        let started = Instant::now();
        let user_items = user_items.to_csr();
        let item_users = user_items.transpose_view().to_csr();
        let regularization = self.config.regularization;

        let mut initializer = FactorInitializer::new(
            InitializationMethod::default(),
            self.config.random_state,
        );
        let mut user_factors = initializer.initialize(user_items.rows(), self.config.factors);
        let mut item_factors = initializer.initialize(user_items.cols(), self.config.factors);

        let pool = self.thread_pool()?;
        let iterations = self.config.iterations;

        pool.install(|| -> Result<(), ModelError> {
            for iteration in 0..iterations {
                user_factors = least_squares(&user_items, &item_factors, regularization)?;
                item_factors = least_squares(&item_users, &user_factors, regularization)?;
                debug!("ALS iteration {}/{} done", iteration + 1, iterations);
            }
            Ok(())
        })?;

        info!(
            "Fitted ALS with {} factors on {} users x {} items ({} interactions) in {:?}",
            self.config.factors,
            user_items.rows(),
            user_items.cols(),
            user_items.nnz(),
            started.elapsed()
        );

        self.fitted = Some(FittedFactors {
            users: FactorRetriever::new(&user_factors),
            items: FactorRetriever::new(&item_factors),
            user_factors,
            item_factors,
        });

        Ok(())
    }

    fn similar_items(&self, item: usize, n: usize) -> Result<Vec<ScoredIndex>, ModelError> {
        self.fitted()?.items.search_similar(item, n)
    }

    fn similar_users(&self, user: usize, n: usize) -> Result<Vec<ScoredIndex>, ModelError> {
        self.fitted()?.users.search_similar(user, n)
    }

    fn recommend(
        &self,
        user: usize,
        n: usize,
        exclude: &HashSet<usize>,
    ) -> Result<Vec<ScoredIndex>, ModelError> {
        let fitted = self.fitted()?;
        if user >= fitted.user_factors.nrows() {
            return Err(ModelError::IndexOutOfRange {
                index: user,
                len: fitted.user_factors.nrows(),
            });
        }

        let scores = &fitted.item_factors * fitted.user_factors.row(user).transpose();
        let candidates = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(item, _)| !exclude.contains(item));

        Ok(top_k(candidates, n))
    }
}
