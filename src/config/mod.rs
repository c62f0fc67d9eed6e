use crate::models::{ItemId, SENTINEL_ITEM};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub weighting: WeightingConfig,
    pub recommendation: RecommendationConfig,
    pub data: DataConfig,
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub factors: usize,
    pub regularization: f32,
    pub iterations: usize,
    /// Solver threads, 0 uses every available core.
    pub num_threads: usize,
    pub random_state: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightingConfig {
    pub enabled: bool,
    pub k1: f32,
    pub b: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub top_n: usize,
    pub sentinel_item: ItemId,
    /// Neighbours kept per item by the own-items recommender.
    pub own_neighbours: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Collapse every item outside the N most purchased into the sentinel item.
    pub keep_top_items: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub k: usize,
    pub test_weeks: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            factors: 20,
            regularization: 0.01,
            iterations: 15,
            num_threads: 4,
            random_state: 8,
        }
    }
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            k1: 100.0,
            b: 0.8,
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            sentinel_item: SENTINEL_ITEM,
            own_neighbours: 1,
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self { k: 5, test_weeks: 3 }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("ALSREC").separator("__"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::info!("Config file {} not found, using default configuration", path);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        crate::utils::validation::validate_config(self)
    }
}
