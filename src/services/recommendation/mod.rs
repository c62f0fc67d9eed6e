use crate::algorithms::{AlternatingLeastSquares, ItemItemRecommender, LatentFactorModel};
use crate::config::Config;
use crate::error::{ModelError, RecommendError, RecommendResult};
use crate::models::{ItemId, ScoredIndex, Transaction, UserId};
use crate::services::mapping::IdMapper;
use crate::services::matrix::{collapse_unpopular_items, InteractionMatrix};
use crate::services::popularity::PopularityRanker;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    SimilarItems,
    SimilarUsers,
    Als,
    Own,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SimilarItems => "similar-items",
            Strategy::SimilarUsers => "similar-users",
            Strategy::Als => "als",
            Strategy::Own => "own",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the neighbour-based strategies may repeat an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deduplication {
    /// One neighbour per seed, duplicates allowed.
    #[default]
    Keep,
    /// Walk further down the neighbour lists until every item is new. Similar users
    /// without purchases are skipped here instead of failing the request.
    Unique,
}

/// Recommender built once from a transaction snapshot.
///
/// Holds the interaction matrix, id mappings, popularity rankings and the fitted models.
/// Nothing changes after construction, so query methods only take `&self`.
pub struct Recommender<M: LatentFactorModel = AlternatingLeastSquares> {
    raw: InteractionMatrix,
    weighted: InteractionMatrix,
    mapper: IdMapper,
    popularity: PopularityRanker,
    model: M,
    own_recommender: ItemItemRecommender,
    sentinel: ItemId,
}

impl Recommender<AlternatingLeastSquares> {
    pub fn new(transactions: &[Transaction], config: &Config) -> Result<Self, ModelError> {
        let model = AlternatingLeastSquares::new(config.model.clone());
        Self::with_model(transactions, config, model)
    }
}

impl<M: LatentFactorModel> Recommender<M> {
    pub fn with_model(
        transactions: &[Transaction],
        config: &Config,
        mut model: M,
    ) -> Result<Self, ModelError> {
        let started = Instant::now();
        let sentinel = config.recommendation.sentinel_item;

        let transactions: Cow<'_, [Transaction]> = match config.data.keep_top_items {
            Some(keep_top) => {
                Cow::Owned(collapse_unpopular_items(transactions, keep_top, sentinel))
            }
            None => Cow::Borrowed(transactions),
        };

        let raw = InteractionMatrix::from_transactions(&transactions);
        let mapper = IdMapper::from_matrix(&raw);
        let weighted = if config.weighting.enabled {
            raw.weighted(&config.weighting)
        } else {
            raw.clone()
        };

        model.fit(weighted.matrix())?;

        let mut own_recommender = ItemItemRecommender::new(config.recommendation.own_neighbours);
        own_recommender.fit(raw.matrix());

        let popularity = PopularityRanker::new(&transactions, sentinel);

        info!(
            "Recommender ready for {} users and {} items in {:?}",
            mapper.num_users(),
            mapper.num_items(),
            started.elapsed()
        );

        Ok(Self {
            raw,
            weighted,
            mapper,
            popularity,
            model,
            own_recommender,
            sentinel,
        })
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.raw
    }

    pub fn weighted_matrix(&self) -> &InteractionMatrix {
        &self.weighted
    }

    pub fn mapper(&self) -> &IdMapper {
        &self.mapper
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn popularity(&self) -> &PopularityRanker {
        &self.popularity
    }

    pub fn top_items(&self, user: UserId, n: usize) -> Vec<ItemId> {
        self.popularity.top_items(user, n)
    }

    pub fn recommend(
        &self,
        user: UserId,
        n: usize,
        strategy: Strategy,
    ) -> RecommendResult<Vec<ItemId>> {
        self.recommend_with(user, n, strategy, Deduplication::Keep)
    }

    /// Runs `strategy`. The model and own-items strategies never repeat items, so
    /// `dedup` only affects the neighbour-based ones.
    pub fn recommend_with(
        &self,
        user: UserId,
        n: usize,
        strategy: Strategy,
        dedup: Deduplication,
    ) -> RecommendResult<Vec<ItemId>> {
        match strategy {
            Strategy::SimilarItems => self.similar_items_recommendation_with(user, n, dedup),
            Strategy::SimilarUsers => self.similar_users_recommendation_with(user, n, dedup),
            Strategy::Als => self.als_recommendation(user, n),
            Strategy::Own => self.own_recommendation(user, n),
        }
    }

    pub fn similar_items_recommendation(
        &self,
        user: UserId,
        n: usize,
    ) -> RecommendResult<Vec<ItemId>> {
        self.similar_items_recommendation_with(user, n, Deduplication::Keep)
    }

    pub fn similar_items_recommendation_with(
        &self,
        user: UserId,
        n: usize,
        dedup: Deduplication,
    ) -> RecommendResult<Vec<ItemId>> {
        self.mapper.user_index(user)?;

        let seeds = self.popularity.top_items(user, n);
        if seeds.len() < n {
            return Err(RecommendError::InsufficientSeeds {
                user,
                requested: n,
                found: seeds.len(),
            });
        }

        let mut recommended: Vec<ItemId> = Vec::with_capacity(n);
        for seed in seeds {
            let seed_index = self.mapper.item_index(seed)?;

            let neighbour = match dedup {
                Deduplication::Keep => {
                    other_indices(self.model.similar_items(seed_index, 2)?, seed_index).next()
                }
                Deduplication::Unique => {
                    let candidates = self.model.similar_items(seed_index, self.mapper.num_items())?;
                    self.first_unused_item(other_indices(candidates, seed_index), &recommended)?
                }
            };

            let neighbour = neighbour.ok_or(RecommendError::NoSimilarItem { item: seed })?;
            recommended.push(self.mapper.item_id(neighbour)?);
        }

        debug!("Similar-items recommendation for user {}: {:?}", user, recommended);
        Ok(recommended)
    }

    pub fn similar_users_recommendation(
        &self,
        user: UserId,
        n: usize,
    ) -> RecommendResult<Vec<ItemId>> {
        self.similar_users_recommendation_with(user, n, Deduplication::Keep)
    }

    pub fn similar_users_recommendation_with(
        &self,
        user: UserId,
        n: usize,
        dedup: Deduplication,
    ) -> RecommendResult<Vec<ItemId>> {
        let user_index = self.mapper.user_index(user)?;

        let wanted = match dedup {
            Deduplication::Keep => n + 1,
            Deduplication::Unique => self.mapper.num_users(),
        };
        let neighbours: Vec<usize> =
            other_indices(self.model.similar_users(user_index, wanted)?, user_index).collect();

        let recommended = match dedup {
            Deduplication::Keep => {
                if neighbours.len() < n {
                    return Err(RecommendError::InsufficientNeighbours {
                        user,
                        requested: n,
                        found: neighbours.len(),
                    });
                }

                let mut recommended = Vec::with_capacity(n);
                for &neighbour in neighbours.iter().take(n) {
                    let neighbour_id = self.mapper.user_id(neighbour)?;
                    let top = self
                        .popularity
                        .top_items(neighbour_id, 1)
                        .first()
                        .copied()
                        .ok_or(RecommendError::NeighbourWithoutPurchases { user: neighbour_id })?;
                    recommended.push(top);
                }
                recommended
            }
            Deduplication::Unique => {
                let mut recommended: Vec<ItemId> = Vec::with_capacity(n);
                for &neighbour in &neighbours {
                    if recommended.len() == n {
                        break;
                    }
                    let neighbour_id = self.mapper.user_id(neighbour)?;
                    if let Some(&top) = self.popularity.top_items(neighbour_id, 1).first() {
                        if !recommended.contains(&top) {
                            recommended.push(top);
                        }
                    }
                }

                if recommended.len() < n {
                    return Err(RecommendError::InsufficientNeighbours {
                        user,
                        requested: n,
                        found: recommended.len(),
                    });
                }
                recommended
            }
        };

        debug!("Similar-users recommendation for user {}: {:?}", user, recommended);
        Ok(recommended)
    }

    pub fn als_recommendation(&self, user: UserId, n: usize) -> RecommendResult<Vec<ItemId>> {
        let user_index = self.mapper.user_index(user)?;

        let mut exclude: HashSet<usize> =
            self.raw.row(user_index).into_iter().map(|(item, _)| item).collect();
        if let Ok(sentinel_index) = self.mapper.item_index(self.sentinel) {
            exclude.insert(sentinel_index);
        }

        let scored = self.model.recommend(user_index, n, &exclude)?;
        self.collect_candidates(user, n, scored)
    }

    pub fn own_recommendation(&self, user: UserId, n: usize) -> RecommendResult<Vec<ItemId>> {
        let user_index = self.mapper.user_index(user)?;

        let mut exclude = HashSet::new();
        if let Ok(sentinel_index) = self.mapper.item_index(self.sentinel) {
            exclude.insert(sentinel_index);
        }

        let scored = self
            .own_recommender
            .recommend(&self.raw.row(user_index), n, false, &exclude)?;
        self.collect_candidates(user, n, scored)
    }

    fn collect_candidates(
        &self,
        user: UserId,
        n: usize,
        scored: Vec<ScoredIndex>,
    ) -> RecommendResult<Vec<ItemId>> {
        if scored.len() < n {
            return Err(RecommendError::InsufficientCandidates {
                user,
                requested: n,
                found: scored.len(),
            });
        }

        scored
            .into_iter()
            .map(|(index, _)| self.mapper.item_id(index))
            .collect()
    }

    fn first_unused_item(
        &self,
        candidates: impl Iterator<Item = usize>,
        used: &[ItemId],
    ) -> RecommendResult<Option<usize>> {
        for index in candidates {
            if !used.contains(&self.mapper.item_id(index)?) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}

/// Drops the query row from a similarity result, whatever its position.
fn other_indices(scored: Vec<ScoredIndex>, query: usize) -> impl Iterator<Item = usize> {
    scored
        .into_iter()
        .map(|(index, _)| index)
        .filter(move |&index| index != query)
}
