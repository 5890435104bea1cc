use numzero_core::{Event, Player, Rule};
use serde_json::json;

#[test]
fn rule_uses_code_desc_points_fields() {
    let rule = Rule::new("coffee", "made coffee", 5);
    assert_eq!(
        serde_json::to_value(&rule).unwrap(),
        json!({"code": "coffee", "desc": "made coffee", "points": 5})
    );

    let parsed: Rule =
        serde_json::from_value(json!({"code": "coffee", "desc": "talked about coffee", "points": 1}))
            .unwrap();
    assert_eq!(parsed.description, "talked about coffee");
    assert_eq!(parsed.points, 1);
}

#[test]
fn player_defaults_missing_fields() {
    let player: Player = serde_json::from_value(json!({"name": "Bob"})).unwrap();
    assert_eq!(player, Player::new("Bob"));
    assert_eq!(
        serde_json::to_value(&player).unwrap(),
        json!({"name": "Bob", "image": "", "score": 0})
    );
}

#[test]
fn event_uses_short_field_names() {
    let event: Event = serde_json::from_value(json!({
        "id": "abc",
        "player": "alice",
        "desc": "static analysis on commit 34fe6a",
        "url": "https://example.com/commits/81570f37",
        "scores": [{"rule": "tests", "times": 5}],
        "total": 10,
        "date": "2015-06-01T09:30:00Z"
    }))
    .unwrap();

    assert_eq!(event.description, "static analysis on commit 34fe6a");
    assert_eq!(event.scores[0].times, 5);
    assert_eq!(event.total, 10);
    assert_eq!(
        event.date.map(|date| date.to_rfc3339()),
        Some("2015-06-01T09:30:00+00:00".to_string())
    );
}

#[test]
fn event_new_is_unsaved_and_dated() {
    let event = Event::new("alice", "made coffee");
    assert!(event.id.is_empty());
    assert!(event.date.is_some());
    assert_eq!(event.total, 0);
}
