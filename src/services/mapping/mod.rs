use crate::error::{RecommendError, RecommendResult};
use crate::models::{ItemId, UserId};
use crate::services::matrix::InteractionMatrix;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct IdMapper {
    id_to_userid: Vec<UserId>,
    id_to_itemid: Vec<ItemId>,
    userid_to_id: HashMap<UserId, usize>,
    itemid_to_id: HashMap<ItemId, usize>,
}

impl IdMapper {
    pub fn new(user_ids: &[UserId], item_ids: &[ItemId]) -> Self {
        Self {
            id_to_userid: user_ids.to_vec(),
            id_to_itemid: item_ids.to_vec(),
            userid_to_id: user_ids.iter().enumerate().map(|(index, &id)| (id, index)).collect(),
            itemid_to_id: item_ids.iter().enumerate().map(|(index, &id)| (id, index)).collect(),
        }
    }

    pub fn from_matrix(matrix: &InteractionMatrix) -> Self {
        Self::new(matrix.user_ids(), matrix.item_ids())
    }

    pub fn user_index(&self, user_id: UserId) -> RecommendResult<usize> {
        self.userid_to_id
            .get(&user_id)
            .copied()
            .ok_or(RecommendError::UnknownUser(user_id))
    }

    pub fn item_index(&self, item_id: ItemId) -> RecommendResult<usize> {
        self.itemid_to_id
            .get(&item_id)
            .copied()
            .ok_or(RecommendError::UnknownItem(item_id))
    }

    pub fn user_id(&self, index: usize) -> RecommendResult<UserId> {
        self.id_to_userid
            .get(index)
            .copied()
            .ok_or(RecommendError::UnknownUserIndex(index))
    }

    pub fn item_id(&self, index: usize) -> RecommendResult<ItemId> {
        self.id_to_itemid
            .get(index)
            .copied()
            .ok_or(RecommendError::UnknownItemIndex(index))
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.userid_to_id.contains_key(&user_id)
    }

    pub fn contains_item(&self, item_id: ItemId) -> bool {
        self.itemid_to_id.contains_key(&item_id)
    }

    pub fn num_users(&self) -> usize {
        self.id_to_userid.len()
    }

    pub fn num_items(&self) -> usize {
        self.id_to_itemid.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;

    #[test]
    fn test_round_trip() {
        let transactions = vec![
            Transaction::new(5, 50, 1.0),
            Transaction::new(3, 70, 1.0),
            Transaction::new(9, 50, 2.0),
        ];
        let matrix = InteractionMatrix::from_transactions(&transactions);
        let mapper = IdMapper::from_matrix(&matrix);

        for &user in matrix.user_ids() {
            assert_eq!(mapper.user_id(mapper.user_index(user).unwrap()).unwrap(), user);
        }
        for &item in matrix.item_ids() {
            assert_eq!(mapper.item_id(mapper.item_index(item).unwrap()).unwrap(), item);
        }
        for index in 0..mapper.num_users() {
            assert_eq!(mapper.user_index(mapper.user_id(index).unwrap()).unwrap(), index);
        }

        assert_eq!(mapper.user_index(3).unwrap(), 0);
        assert_eq!(mapper.item_index(70).unwrap(), 1);
    }

    #[test]
    fn test_lookup_miss_is_an_error() {
        let mapper = IdMapper::new(&[1, 2], &[10]);

        assert_eq!(mapper.user_index(3), Err(RecommendError::UnknownUser(3)));
        assert_eq!(mapper.item_index(11), Err(RecommendError::UnknownItem(11)));
        assert_eq!(mapper.user_id(2), Err(RecommendError::UnknownUserIndex(2)));
        assert_eq!(mapper.item_id(1), Err(RecommendError::UnknownItemIndex(1)));
    }

    #[test]
    fn test_empty_mapper() {
        let mapper = IdMapper::from_matrix(&InteractionMatrix::from_transactions(&[]));

        assert_eq!(mapper.num_users(), 0);
        assert_eq!(mapper.num_items(), 0);
        assert!(mapper.user_index(1).is_err());
    }
}
