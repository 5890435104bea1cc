use numzero_core::db::DbError;
use numzero_core::{
    Event, EventRepository, KvError, Player, PlayerRepository, Rule, RuleRepository,
    SqliteConfig, SqliteStore, Store, StoreError,
};

#[test]
fn new_store_is_checked_then_left_closed() {
    let store = memory_store();
    assert!(!store.is_open());
}

#[test]
fn open_and_close_are_idempotent() {
    let store = memory_store();

    store.open().unwrap();
    store.open().unwrap();
    assert!(store.is_open());

    store.close();
    store.close();
    assert!(!store.is_open());
}

#[test]
fn first_operation_opens_a_closed_store() {
    let store = memory_store();
    store.save_rule(&Rule::new("coffee", "made coffee", 5)).unwrap();
    assert!(store.is_open());
}

#[test]
fn open_keeps_the_same_connection() {
    let store = memory_store();
    store.open().unwrap();
    store.save_rule(&Rule::new("coffee", "made coffee", 5)).unwrap();
    store.open().unwrap();

    assert_eq!(store.get_rule("coffee").unwrap().points, 5);
}

#[test]
fn in_memory_data_lives_as_long_as_the_connection() {
    let store = memory_store();
    store.save_player(&Player::new("alice")).unwrap();
    store.close();

    let err = store.get_player("alice").unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[test]
fn file_store_keeps_data_across_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = SqliteConfig::file(dir.path().join("numzero.db"));

    let store = SqliteStore::sqlite(config.clone()).unwrap();
    store.save_rule(&Rule::new("coffee", "made coffee", 5)).unwrap();
    store.close();
    assert_eq!(store.get_rule("coffee").unwrap().points, 5);
    drop(store);

    let reopened = SqliteStore::sqlite(config).unwrap();
    assert_eq!(reopened.list_rules().unwrap().len(), 1);
}

#[test]
fn construction_fails_when_backend_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let config = SqliteConfig::file(dir.path().join("missing").join("numzero.db"));

    let result = SqliteStore::sqlite(config);
    assert!(matches!(
        result,
        Err(StoreError::Backend(KvError::Db(DbError::Sqlite(_))))
    ));
}

#[test]
fn construction_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(raw);

    let result = SqliteStore::sqlite(SqliteConfig::file(&path));
    assert!(matches!(
        result,
        Err(StoreError::Backend(KvError::Db(
            DbError::UnsupportedSchemaVersion {
                db_version: 999,
                ..
            }
        )))
    ));
}

#[test]
fn corrupt_payload_is_a_serialization_error_not_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("numzero.db");
    let store = SqliteStore::sqlite(SqliteConfig::file(&path)).unwrap();
    store.save_rule(&Rule::new("coffee", "made coffee", 5)).unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute(
        "UPDATE kv_hashes SET value = '{\"code\": 5' WHERE collection = 'rules';",
        [],
    )
    .unwrap();

    let err = store.get_rule("coffee").unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
    assert!(!err.is_not_found());
    assert!(matches!(
        store.list_rules().unwrap_err(),
        StoreError::Serialization(_)
    ));
}

#[test]
fn flush_db_removes_every_collection_and_index() {
    let store = memory_store();
    store.save_rule(&Rule::new("coffee", "made coffee", 5)).unwrap();
    store.save_player(&Player::new("alice")).unwrap();
    let mut event = Event::new("alice", "made coffee").with_score("coffee", 1);
    store.save_event(&mut event).unwrap();

    store.flush_db().unwrap();

    assert!(store.list_rules().unwrap().is_empty());
    assert!(store.list_players().unwrap().is_empty());
    assert!(store.get_player_events("alice", 10).unwrap().is_empty());
    assert!(matches!(
        store.get_event(&event.id).unwrap_err(),
        StoreError::NotFound
    ));
}

#[test]
fn store_is_usable_as_trait_object() {
    let store: Box<dyn Store> = Box::new(memory_store());
    store.save_rule(&Rule::new("coffee", "made coffee", 5)).unwrap();
    assert_eq!(store.list_rules().unwrap().len(), 1);
    store.close();
}

fn memory_store() -> SqliteStore {
    SqliteStore::sqlite(SqliteConfig::in_memory()).unwrap()
}
