pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{MetricError, ModelError, RecommendError, RecommendResult};
pub use models::*;
pub use services::evaluation::{evaluate, split_by_week, EvaluationReport};
pub use services::loader::load_transactions;
pub use services::recommendation::{Deduplication, Recommender, Strategy};
pub use utils::metrics::{precision_at_k, recall_at_k};

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
