use crate::models::{ItemId, UserId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("unknown user id {0}")]
    UnknownUser(UserId),

    #[error("unknown item id {0}")]
    UnknownItem(ItemId),

    #[error("no user at matrix row {0}")]
    UnknownUserIndex(usize),

    #[error("no item at matrix column {0}")]
    UnknownItemIndex(usize),

    #[error("user {user} has {found} ranked purchases, {requested} required")]
    InsufficientSeeds {
        user: UserId,
        requested: usize,
        found: usize,
    },

    #[error("user {user} has {found} similar users, {requested} required")]
    InsufficientNeighbours {
        user: UserId,
        requested: usize,
        found: usize,
    },

    #[error("similar user {user} has no ranked purchases")]
    NeighbourWithoutPurchases { user: UserId },

    #[error("no similar item found for item {item}")]
    NoSimilarItem { item: ItemId },

    #[error("only {found} candidate items for user {user}, {requested} required")]
    InsufficientCandidates {
        user: UserId,
        requested: usize,
        found: usize,
    },

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("model has not been fitted")]
    NotFitted,

    #[error("index {index} out of range for {len} rows")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("least squares system for row {row} is not positive definite")]
    Solver { row: usize },

    #[error("failed to build solver thread pool: {0}")]
    ThreadPool(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("no recommendations within the cutoff")]
    EmptyRecommendations,

    #[error("ground truth list is empty")]
    EmptyGroundTruth,
}

pub type RecommendResult<T> = std::result::Result<T, RecommendError>;
