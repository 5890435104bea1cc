use numzero_core::{Player, PlayerRepository, SqliteConfig, SqliteStore, StoreError};

#[test]
fn save_and_get_player_roundtrip() {
    let store = memory_store();
    let player = Player {
        name: "alice".to_string(),
        image: "https://example.com/alice.png".to_string(),
        score: 42,
    };
    store.save_player(&player).unwrap();

    assert_eq!(store.get_player("alice").unwrap(), player);
}

#[test]
fn player_lookup_is_case_insensitive() {
    let store = memory_store();
    store.save_player(&Player::new("Bob")).unwrap();

    let player = store.get_player("bob").unwrap();
    assert_eq!(player.name, "Bob");
    assert_eq!(store.get_player("BOB").unwrap(), player);
}

#[test]
fn saving_existing_name_keeps_only_latest_values() {
    let store = memory_store();
    store.save_player(&Player::new("carol")).unwrap();
    store
        .save_player(&Player {
            score: 10,
            ..Player::new("Carol")
        })
        .unwrap();

    let players = store.list_players().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].score, 10);
    assert_eq!(players[0].name, "Carol");
}

#[test]
fn list_players_returns_every_player() {
    let store = memory_store();
    for name in ["dave", "alice", "bob"] {
        store.save_player(&Player::new(name)).unwrap();
    }

    let names: Vec<String> = store
        .list_players()
        .unwrap()
        .into_iter()
        .map(|player| player.name)
        .collect();
    assert_eq!(names, ["alice", "bob", "dave"]);
}

#[test]
fn missing_player_returns_not_found() {
    let store = memory_store();
    let err = store.get_player("nobody").unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

fn memory_store() -> SqliteStore {
    SqliteStore::sqlite(SqliteConfig::in_memory()).unwrap()
}
