//! Storage key derivation.
//!
//! Every id, code or name is lowercased before it is used as a key, so
//! identity is case-insensitive across players, rules and events.

/// Hash collection holding events by id.
pub const EVENTS: &str = "events";
/// Hash collection holding players by name.
pub const PLAYERS: &str = "players";
/// Hash collection holding rules by code.
pub const RULES: &str = "rules";

pub fn canonical_id(id: &str) -> String {
    id.to_lowercase()
}

pub fn player_key(name: &str) -> String {
    canonical_id(name)
}

pub fn rule_key(code: &str) -> String {
    canonical_id(code)
}

pub fn event_key(id: &str) -> String {
    canonical_id(id)
}

/// List holding the ids of a player's events, newest first.
pub fn player_events_key(name: &str) -> String {
    format!("{PLAYERS}:{}:events", player_key(name))
}

#[cfg(test)]
mod tests {
    use super::{event_key, player_events_key, player_key, rule_key};

    #[test]
    fn keys_are_lowercased() {
        assert_eq!(player_key("Bob"), "bob");
        assert_eq!(rule_key("COFFEE"), "coffee");
        assert_eq!(
            event_key("6F9619FF-8B86-D011-B42D-00C04FC964FF"),
            "6f9619ff-8b86-d011-b42d-00c04fc964ff"
        );
    }

    #[test]
    fn player_events_key_uses_canonical_name() {
        assert_eq!(player_events_key("Alice"), "players:alice:events");
        assert_eq!(player_events_key("alice"), player_events_key("ALICE"));
    }

    #[test]
    fn canonical_keys_are_stable() {
        let once = player_key("Ünïcode Name");
        assert_eq!(player_key(&once), once);
    }
}
