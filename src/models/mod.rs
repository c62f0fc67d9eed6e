use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type ItemId = u64;

/// Reserved item id marking purchases that are not attributed to a specific item.
pub const SENTINEL_ITEM: ItemId = 999_999;

/// One purchase line from the transaction log.
///
/// Only `user_id`, `item_id` and `quantity` are required. The optional fields are
/// picked up when the source carries them; every other column is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub quantity: f64,
    #[serde(default)]
    pub basket_id: Option<u64>,
    #[serde(default)]
    pub week_no: Option<u32>,
    #[serde(default)]
    pub sales_value: Option<f64>,
}

impl Transaction {
    pub fn new(user_id: UserId, item_id: ItemId, quantity: f64) -> Self {
        Self {
            user_id,
            item_id,
            quantity,
            basket_id: None,
            week_no: None,
            sales_value: None,
        }
    }

    pub fn with_week(mut self, week_no: u32) -> Self {
        self.week_no = Some(week_no);
        self
    }

    pub fn with_basket(mut self, basket_id: u64) -> Self {
        self.basket_id = Some(basket_id);
        self
    }

    pub fn with_sales_value(mut self, sales_value: f64) -> Self {
        self.sales_value = Some(sales_value);
        self
    }
}

pub type ScoredIndex = (usize, f32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub user_id: UserId,
    pub strategy: String,
    pub items: Vec<ItemId>,
}
