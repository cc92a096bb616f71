use runlab_types::{SettingsPath, UserId};
use std::str::FromStr;

// ── UserId ────────────────────────────────────────────────────────

#[test]
fn user_id_new_is_unique() {
    let a = UserId::new();
    let b = UserId::new();
    assert_ne!(a, b);
}

#[test]
fn user_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    let id = UserId::from_uuid(uuid);
    assert_eq!(id.as_uuid(), uuid);
}

#[test]
fn user_id_display_and_parse() {
    let id = UserId::new();
    let s = id.to_string();
    let parsed = UserId::parse(&s).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn user_id_from_str() {
    let id = UserId::new();
    let parsed: UserId = UserId::from_str(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn user_id_parse_invalid() {
    assert!(UserId::parse("not-a-uuid").is_err());
}

#[test]
fn user_id_serde_is_transparent() {
    let id = UserId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", id));
    let back: UserId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

// ── SettingsPath ──────────────────────────────────────────────────

#[test]
fn path_new_keeps_value() {
    let path = SettingsPath::new("experiment-list/columns").unwrap();
    assert_eq!(path.as_str(), "experiment-list/columns");
    assert_eq!(path.to_string(), "experiment-list/columns");
}

#[test]
fn path_rejects_empty() {
    assert!(SettingsPath::new("").is_err());
}

#[test]
fn path_from_str() {
    let path: SettingsPath = "chart-scale".parse().unwrap();
    assert_eq!(path.as_str(), "chart-scale");
}

#[test]
fn path_from_str_rejects_empty() {
    assert!("".parse::<SettingsPath>().is_err());
}

#[test]
fn path_equality_and_hash() {
    use std::collections::HashSet;

    let a = SettingsPath::new("a").unwrap();
    let b = SettingsPath::new("a").unwrap();
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn path_serde_is_transparent() {
    let path = SettingsPath::new("semi").unwrap();
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(json, "\"semi\"");
    let back: SettingsPath = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);
}
