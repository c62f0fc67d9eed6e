use crate::algorithms::LatentFactorModel;
use crate::models::{ItemId, Transaction, UserId};
use crate::services::recommendation::{Recommender, Strategy};
use crate::utils::metrics::MetricsCalculator;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub strategy: Strategy,
    pub k: usize,
    pub users_evaluated: usize,
    pub users_failed: usize,
    pub mean_precision: f64,
    pub mean_recall: f64,
}

/// Splits a log into train and test parts, the test part holding the last `test_weeks`
/// distinct weeks.
pub fn split_by_week(
    transactions: &[Transaction],
    test_weeks: usize,
) -> Result<(Vec<Transaction>, Vec<Transaction>)> {
    let mut weeks = BTreeSet::new();
    for transaction in transactions {
        let week = transaction.week_no.ok_or_else(|| {
            anyhow!(
                "Transaction of user {} for item {} has no week number",
                transaction.user_id,
                transaction.item_id
            )
        })?;
        weeks.insert(week);
    }

    if test_weeks == 0 || test_weeks >= weeks.len() {
        return Err(anyhow!(
            "Cannot hold out {} of {} weeks and keep a training set",
            test_weeks,
            weeks.len()
        ));
    }

    let first_test_week = weeks.iter().rev().nth(test_weeks - 1).copied().unwrap_or_default();

    let (test, train): (Vec<Transaction>, Vec<Transaction>) = transactions
        .iter()
        .cloned()
        .partition(|t| t.week_no.is_some_and(|week| week >= first_test_week));

    info!(
        "Split {} transactions into {} train and {} test, test weeks from {}",
        transactions.len(),
        train.len(),
        test.len(),
        first_test_week
    );

    Ok((train, test))
}

/// Scores `strategy` against what each test user actually bought.
///
/// Users the recommender cannot serve are counted as failed and skipped.
pub fn evaluate<M: LatentFactorModel>(
    recommender: &Recommender<M>,
    test: &[Transaction],
    strategy: Strategy,
    n: usize,
    k: usize,
) -> EvaluationReport {
    let mut ground_truth: BTreeMap<UserId, BTreeSet<ItemId>> = BTreeMap::new();
    for transaction in test {
        ground_truth
            .entry(transaction.user_id)
            .or_default()
            .insert(transaction.item_id);
    }

    let calculator = MetricsCalculator::new(k);
    let mut precision_sum = 0.0;
    let mut recall_sum = 0.0;
    let mut users_evaluated = 0;
    let mut users_failed = 0;

    for (user, bought) in &ground_truth {
        let recommended = match recommender.recommend(*user, n, strategy) {
            Ok(recommended) => recommended,
            Err(e) => {
                debug!("Skipping user {}: {}", user, e);
                users_failed += 1;
                continue;
            }
        };

        let bought: Vec<ItemId> = bought.iter().copied().collect();
        match calculator.calculate(&recommended, &bought) {
            Ok(metrics) => {
                precision_sum += metrics.precision_at_k;
                recall_sum += metrics.recall_at_k;
                users_evaluated += 1;
            }
            Err(e) => {
                debug!("No metrics for user {}: {}", user, e);
                users_failed += 1;
            }
        }
    }

    if users_failed > 0 {
        warn!("{} of {} test users could not be evaluated", users_failed, ground_truth.len());
    }

    let mean = |sum: f64| {
        if users_evaluated == 0 {
            0.0
        } else {
            sum / users_evaluated as f64
        }
    };

    let report = EvaluationReport {
        strategy,
        k,
        users_evaluated,
        users_failed,
        mean_precision: mean(precision_sum),
        mean_recall: mean(recall_sum),
    };

    info!(
        "Evaluated {} with k={}: precision {:.4}, recall {:.4} over {} users",
        strategy, k, report.mean_precision, report.mean_recall, report.users_evaluated
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn log() -> Vec<Transaction> {
        vec![
            Transaction::new(1, 10, 1.0).with_week(1),
            Transaction::new(1, 20, 1.0).with_week(1),
            Transaction::new(1, 20, 1.0).with_week(2),
            Transaction::new(2, 20, 1.0).with_week(1),
            Transaction::new(2, 30, 1.0).with_week(2),
            Transaction::new(1, 20, 1.0).with_week(3),
            Transaction::new(1, 40, 1.0).with_week(3),
            Transaction::new(1, 40, 2.0).with_week(3),
            Transaction::new(9, 10, 1.0).with_week(3),
        ]
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.model.factors = 2;
        config.model.iterations = 2;
        config.model.num_threads = 1;
        config.weighting.enabled = false;
        config
    }

    #[test]
    fn test_split_by_week() {
        let (train, test) = split_by_week(&log(), 1).unwrap();

        assert_eq!(train.len(), 5);
        assert_eq!(test.len(), 4);
        assert!(test.iter().all(|t| t.week_no == Some(3)));

        let (train, test) = split_by_week(&log(), 2).unwrap();
        assert_eq!(train.len(), 3);
        assert_eq!(test.len(), 6);
    }

    #[test]
    fn test_split_rejects_bad_input() {
        assert!(split_by_week(&log(), 3).is_err());
        assert!(split_by_week(&log(), 0).is_err());

        let mut without_week = log();
        without_week.push(Transaction::new(3, 10, 1.0));
        assert!(split_by_week(&without_week, 1).is_err());
    }

    #[test]
    fn test_evaluate_own_strategy() {
        let (train, test) = split_by_week(&log(), 1).unwrap();
        let recommender = Recommender::new(&train, &config()).unwrap();

        let report = evaluate(&recommender, &test, Strategy::Own, 2, 2);

        // user 1 gets [20, 10] against {20, 40}; user 9 is unknown
        assert_eq!(report.users_evaluated, 1);
        assert_eq!(report.users_failed, 1);
        assert!((report.mean_precision - 0.5).abs() < 1e-12);
        assert!((report.mean_recall - 0.5).abs() < 1e-12);
        assert_eq!(report.strategy, Strategy::Own);
        assert_eq!(report.k, 2);
    }

    #[test]
    fn test_evaluate_without_servable_users() {
        let (train, _) = split_by_week(&log(), 1).unwrap();
        let recommender = Recommender::new(&train, &config()).unwrap();
        let test = vec![Transaction::new(9, 10, 1.0).with_week(3)];

        let report = evaluate(&recommender, &test, Strategy::Als, 1, 1);

        assert_eq!(report.users_evaluated, 0);
        assert_eq!(report.users_failed, 1);
        assert_eq!(report.mean_precision, 0.0);
    }
}
