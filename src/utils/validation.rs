use crate::config::{Config, ModelConfig, WeightingConfig};
use crate::models::Transaction;
use anyhow::{anyhow, Result};

pub fn validate_model_config(model: &ModelConfig) -> Result<()> {
    if model.factors == 0 {
        return Err(anyhow!("Number of factors must be greater than 0"));
    }

    if model.iterations == 0 {
        return Err(anyhow!("Number of iterations must be greater than 0"));
    }

    if !model.regularization.is_finite() || model.regularization < 0.0 {
        return Err(anyhow!("Regularization must be a non-negative finite number"));
    }

    Ok(())
}

pub fn validate_weighting_config(weighting: &WeightingConfig) -> Result<()> {
    if !weighting.k1.is_finite() || weighting.k1 <= 0.0 {
        return Err(anyhow!("BM25 k1 must be a positive finite number"));
    }

    if !(0.0..=1.0).contains(&weighting.b) {
        return Err(anyhow!("BM25 b must be between 0.0 and 1.0"));
    }

    Ok(())
}

pub fn validate_config(config: &Config) -> Result<()> {
    validate_model_config(&config.model)?;
    validate_weighting_config(&config.weighting)?;

    if config.recommendation.own_neighbours == 0 {
        return Err(anyhow!("Own-items recommender needs at least one neighbour per item"));
    }

    if config.evaluation.k == 0 {
        return Err(anyhow!("Evaluation cutoff k must be greater than 0"));
    }

    if config.evaluation.test_weeks == 0 {
        return Err(anyhow!("Evaluation needs at least one test week"));
    }

    if config.data.keep_top_items == Some(0) {
        return Err(anyhow!("keep_top_items must be greater than 0 when set"));
    }

    Ok(())
}

/// Rejects quantities that are not numbers. Negative quantities are returns and
/// still count as a purchase row.
pub fn validate_transaction(transaction: &Transaction) -> Result<()> {
    if !transaction.quantity.is_finite() {
        return Err(anyhow!(
            "Quantity for user {} and item {} is not a finite number",
            transaction.user_id,
            transaction.item_id
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config() {
        let mut config = Config::default();
        assert!(validate_config(&config).is_ok());

        config.model.factors = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.weighting.b = 1.5;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.model.regularization = f32::NAN;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.data.keep_top_items = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_transaction() {
        assert!(validate_transaction(&Transaction::new(1, 2, 0.0)).is_ok());
        assert!(validate_transaction(&Transaction::new(1, 2, -1.0)).is_ok());
        assert!(validate_transaction(&Transaction::new(1, 2, f64::NAN)).is_err());
        assert!(validate_transaction(&Transaction::new(1, 2, f64::INFINITY)).is_err());
    }
}
