use crate::models::{ItemId, Transaction, UserId};
use std::collections::HashMap;

/// Per-user purchase frequency ranking over the raw transaction log.
///
/// Items are ordered by the number of transactions, most frequent first, with ties
/// broken by ascending item id. The sentinel item never appears.
#[derive(Debug, Clone, Default)]
pub struct PopularityRanker {
    rankings: HashMap<UserId, Vec<(ItemId, usize)>>,
}

impl PopularityRanker {
    pub fn new(transactions: &[Transaction], sentinel: ItemId) -> Self {
        let mut counts: HashMap<UserId, HashMap<ItemId, usize>> = HashMap::new();
        for transaction in transactions {
            *counts
                .entry(transaction.user_id)
                .or_default()
                .entry(transaction.item_id)
                .or_insert(0) += 1;
        }

        let rankings = counts
            .into_iter()
            .map(|(user, items)| {
                let mut ranked: Vec<(ItemId, usize)> = items
                    .into_iter()
                    .filter(|&(item, _)| item != sentinel)
                    .collect();
                ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                (user, ranked)
            })
            .collect();

        Self { rankings }
    }

    pub fn top_items(&self, user: UserId, n: usize) -> Vec<ItemId> {
        self.ranked(user).iter().take(n).map(|&(item, _)| item).collect()
    }

    pub fn ranked(&self, user: UserId) -> &[(ItemId, usize)] {
        self.rankings.get(&user).map(Vec::as_slice).unwrap_or(&[])
    }
}
