use numzero_core::{
    Event, Player, PlayerRepository, Rule, RuleRepository, ScoreService, SqliteConfig,
    SqliteStore, Store, StoreError,
};

#[test]
fn record_event_totals_scores_from_stored_rules() {
    let store = seeded_store();
    let service = ScoreService::new(&store);

    let mut event = Event::new("alice", "busy morning")
        .with_score("coffee", 2)
        .with_score("BUILD", 1);
    event.total = 999;
    service.record_event(&mut event).unwrap();

    assert_eq!(event.total, 5 * 2 - 3);
    let history = service.player_history("alice", 10).unwrap();
    assert_eq!(history, vec![event]);
}

#[test]
fn record_event_with_unknown_rule_writes_nothing() {
    let store = seeded_store();
    let service = ScoreService::new(&store);

    let mut event = Event::new("alice", "took a nap").with_score("nap", 1);
    let err = service.record_event(&mut event).unwrap_err();

    assert!(matches!(err, StoreError::NotFound));
    assert!(event.id.is_empty());
    assert!(service.player_history("alice", 10).unwrap().is_empty());
}

#[test]
fn record_event_matches_non_ascii_rule_codes() {
    let store = seeded_store();
    store.save_rule(&Rule::new("Café", "espresso break", 4)).unwrap();
    let service = ScoreService::new(&store);

    let mut event = Event::new("alice", "coffee run").with_score("CAFÉ", 3);
    service.record_event(&mut event).unwrap();

    assert_eq!(event.total, 12);
    assert_eq!(service.player_history("alice", 1).unwrap(), vec![event]);
}

#[test]
fn leaderboard_sorts_by_score_then_name() {
    let store = seeded_store();
    for (name, score) in [("carol", 3), ("Bob", 7), ("alice", 7)] {
        store
            .save_player(&Player {
                score,
                ..Player::new(name)
            })
            .unwrap();
    }

    let service = ScoreService::new(&store);
    let names: Vec<String> = service
        .leaderboard()
        .unwrap()
        .into_iter()
        .map(|player| player.name)
        .collect();
    assert_eq!(names, ["alice", "Bob", "carol"]);
}

#[test]
fn service_works_over_a_trait_object() {
    let store: Box<dyn Store> = Box::new(seeded_store());
    let service = ScoreService::new(&*store);

    let mut event = Event::new("dave", "made coffee").with_score("coffee", 1);
    service.record_event(&mut event).unwrap();
    assert_eq!(event.total, 5);
}

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::sqlite(SqliteConfig::in_memory()).unwrap();
    store.save_rule(&Rule::new("coffee", "made coffee", 5)).unwrap();
    store.save_rule(&Rule::new("build", "broke the build", -3)).unwrap();
    store
}
