use alsrec::*;
use std::collections::HashSet;

// Two disjoint shopping clusters plus a few unattributed purchases.
fn transactions() -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for user in 1..=12u64 {
        let base = if user <= 6 { 100 } else { 200 };
        for (offset, times) in [(0u64, 3usize), (1, 2), (2, 1)] {
            // rotate which item is the favourite inside a cluster
            let item = base + (offset + user) % 3;
            for week in 0..times {
                transactions.push(Transaction::new(user, item, 1.0).with_week(week as u32 + 1));
            }
        }
        if user % 4 == 0 {
            transactions.push(Transaction::new(user, SENTINEL_ITEM, 1.0).with_week(1));
        }
    }
    transactions
}

fn config() -> Config {
    let mut config = Config::default();
    config.model.factors = 4;
    config.model.iterations = 5;
    config.model.num_threads = 2;
    config
}

fn recommender() -> Recommender {
    Recommender::new(&transactions(), &config()).unwrap()
}

#[test]
fn test_recommendation_flow() {
    let recommender = recommender();

    assert_eq!(recommender.mapper().num_users(), 12);
    assert_eq!(recommender.mapper().num_items(), 7);
    assert!(recommender.model().is_fitted());

    for strategy in [Strategy::SimilarItems, Strategy::SimilarUsers, Strategy::Als, Strategy::Own] {
        let items = recommender.recommend(1, 3, strategy).unwrap();
        assert_eq!(items.len(), 3, "{} returned {:?}", strategy, items);
        assert!(items.iter().all(|item| recommender.mapper().contains_item(*item)));
    }
}

#[test]
fn test_recommendations_are_idempotent() {
    let first = recommender();
    let second = recommender();

    for user in [1, 7, 12] {
        let items = first.similar_items_recommendation(user, 3).unwrap();
        assert_eq!(items, first.similar_items_recommendation(user, 3).unwrap());
        assert_eq!(items, second.similar_items_recommendation(user, 3).unwrap());

        let users = first.similar_users_recommendation(user, 4).unwrap();
        assert_eq!(users, second.similar_users_recommendation(user, 4).unwrap());
    }
}

#[test]
fn test_recommendation_errors() {
    let recommender = recommender();

    assert_eq!(
        recommender.similar_items_recommendation(404, 2),
        Err(RecommendError::UnknownUser(404))
    );
    assert_eq!(
        recommender.similar_items_recommendation(1, 4),
        Err(RecommendError::InsufficientSeeds {
            user: 1,
            requested: 4,
            found: 3
        })
    );
    assert_eq!(
        recommender.similar_users_recommendation(1, 12),
        Err(RecommendError::InsufficientNeighbours {
            user: 1,
            requested: 12,
            found: 11
        })
    );
    // seven items, three bought, one sentinel
    assert!(matches!(
        recommender.als_recommendation(1, 4),
        Err(RecommendError::InsufficientCandidates { found: 3, .. })
    ));
}

#[test]
fn test_als_recommendation_skips_bought_items() {
    let recommender = recommender();
    let bought: HashSet<ItemId> = recommender.top_items(8, 10).into_iter().collect();

    let items = recommender.als_recommendation(8, 3).unwrap();
    assert!(items.iter().all(|item| !bought.contains(item)));
    assert!(!items.contains(&SENTINEL_ITEM));
    assert!(!recommender.own_recommendation(8, 3).unwrap().contains(&SENTINEL_ITEM));
}

#[test]
fn test_unique_recommendations() {
    let recommender = recommender();

    let items = recommender
        .similar_items_recommendation_with(3, 3, Deduplication::Unique)
        .unwrap();
    assert_eq!(items.iter().collect::<HashSet<_>>().len(), 3);
}

#[test]
fn test_prefilter_collapses_items() {
    let mut config = config();
    config.data.keep_top_items = Some(3);

    let recommender = Recommender::new(&transactions(), &config).unwrap();
    assert_eq!(recommender.mapper().num_items(), 4);
    assert!(recommender.mapper().contains_item(SENTINEL_ITEM));
}

#[test]
fn test_metrics() {
    let recommended = [1, 2, 3, 4, 5];
    let bought = [1, 3, 7];

    assert!((precision_at_k(&recommended, &bought, 5).unwrap() - 0.4).abs() < 1e-12);
    assert!((precision_at_k(&recommended, &bought, 2).unwrap() - 0.5).abs() < 1e-12);
    assert!((recall_at_k(&recommended, &bought, 5).unwrap() - 2.0 / 3.0).abs() < 1e-12);
    assert!((recall_at_k(&recommended, &bought, 1).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(
        recall_at_k(&recommended, &[], 5),
        Err(MetricError::EmptyGroundTruth)
    );
}

#[test]
fn test_offline_evaluation() {
    let transactions = transactions();
    let (train, test) = split_by_week(&transactions, 1).unwrap();
    let recommender = Recommender::new(&train, &config()).unwrap();

    let report = evaluate(&recommender, &test, Strategy::Own, 2, 2);

    assert_eq!(report.users_evaluated + report.users_failed, 12);
    assert!(report.mean_precision >= 0.0 && report.mean_precision <= 1.0);
    assert!(report.mean_recall >= 0.0 && report.mean_recall <= 1.0);
}
