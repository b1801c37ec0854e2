use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use userbase_model::{Gender, User, UserId};
use userbase_store::{StoreError, UserStore};

fn user(name: Option<&str>, gender: Option<&str>) -> User {
    let mut user = User::new();
    if let Some(name) = name {
        user.set_name(&json!(name));
    }
    if let Some(gender) = gender {
        user.set_gender(&json!(gender));
    }
    user
}

#[test]
fn insert_assigns_sequential_ids() {
    let store = UserStore::open_in_memory().unwrap();
    let first = store.insert(&user(Some("Alice"), Some("female"))).unwrap();
    let second = store.insert(&user(Some("Bob"), None)).unwrap();
    assert_eq!(first, UserId::new(1));
    assert_eq!(second, UserId::new(2));
}

#[test]
fn insert_then_get_round_trips() {
    let store = UserStore::open_in_memory().unwrap();
    let id = store.insert(&user(Some("Alice"), Some("female"))).unwrap();

    let loaded = store.get(id).unwrap().unwrap();
    assert_eq!(loaded.id(), Some(id));
    assert_eq!(loaded.name(), Some("Alice"));
    assert_eq!(loaded.gender(), Some(Gender::Female));
}

#[test]
fn insert_user_without_fields() {
    let store = UserStore::open_in_memory().unwrap();
    let id = store.insert(&User::new()).unwrap();
    let loaded = store.get(id).unwrap().unwrap();
    assert_eq!(loaded.name(), None);
    assert_eq!(loaded.gender(), None);
}

#[test]
fn users_without_name_do_not_collide() {
    let store = UserStore::open_in_memory().unwrap();
    store.insert(&User::new()).unwrap();
    store.insert(&User::new()).unwrap();
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn get_missing_returns_none() {
    let store = UserStore::open_in_memory().unwrap();
    assert!(store.get(UserId::new(999)).unwrap().is_none());
}

#[test]
fn duplicate_name_is_rejected() {
    let store = UserStore::open_in_memory().unwrap();
    store.insert(&user(Some("Alice"), None)).unwrap();
    let err = store.insert(&user(Some("Alice"), Some("female"))).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(ref n) if n == "Alice"));
    assert_eq!(store.count().unwrap(), 1);
}

// ── list ─────────────────────────────────────────────────────────

#[test]
fn list_empty() {
    let store = UserStore::open_in_memory().unwrap();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn list_returns_users_in_id_order() {
    let store = UserStore::open_in_memory().unwrap();
    store.insert(&user(Some("Carol"), None)).unwrap();
    store.insert(&user(Some("Alice"), Some("female"))).unwrap();
    store.insert(&user(None, Some("male"))).unwrap();

    let users = store.list().unwrap();
    let ids: Vec<i64> = users.iter().filter_map(|u| u.id()).map(|id| id.get()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(users[0].name(), Some("Carol"));
    assert_eq!(users[2].gender(), Some(Gender::Male));
}

// ── update ───────────────────────────────────────────────────────

#[test]
fn update_changes_fields() {
    let store = UserStore::open_in_memory().unwrap();
    let id = store.insert(&user(Some("Alice"), Some("female"))).unwrap();

    let mut loaded = store.get(id).unwrap().unwrap();
    loaded.set_name(&json!("Alicia"));
    store.update(&loaded).unwrap();

    let reloaded = store.get(id).unwrap().unwrap();
    assert_eq!(reloaded.name(), Some("Alicia"));
    assert_eq!(reloaded.gender(), Some(Gender::Female));
}

#[test]
fn update_unsaved_user_fails() {
    let store = UserStore::open_in_memory().unwrap();
    let err = store.update(&user(Some("Ghost"), None)).unwrap_err();
    assert!(matches!(err, StoreError::NotPersisted));
}

#[test]
fn update_missing_row_fails() {
    let store = UserStore::open_in_memory().unwrap();
    let ghost = User::from_row(UserId::new(42), Some("Ghost".into()), None);
    let err = store.update(&ghost).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == UserId::new(42)));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn update_to_taken_name_keeps_row() {
    let store = UserStore::open_in_memory().unwrap();
    store.insert(&user(Some("Alice"), None)).unwrap();
    let bob = store.insert(&user(Some("Bob"), None)).unwrap();

    let mut loaded = store.get(bob).unwrap().unwrap();
    loaded.set_name(&json!("Alice"));
    let err = store.update(&loaded).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(_)));
    assert_eq!(store.get(bob).unwrap().unwrap().name(), Some("Bob"));
}

// ── schema / on-disk ─────────────────────────────────────────────

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.sqlite3");

    {
        let store = UserStore::open(&path).unwrap();
        store.create_schema().unwrap();
        store.insert(&user(Some("Alice"), Some("female"))).unwrap();
    }

    let store = UserStore::open(&path).unwrap();
    let users = store.list().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name(), Some("Alice"));
}

#[test]
fn create_schema_is_idempotent() {
    let store = UserStore::open_in_memory().unwrap();
    store.insert(&user(Some("Alice"), None)).unwrap();
    store.create_schema().unwrap();
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn drop_schema_removes_table() {
    let store = UserStore::open_in_memory().unwrap();
    store.insert(&user(Some("Alice"), None)).unwrap();
    store.drop_schema().unwrap();
    assert!(matches!(store.list().unwrap_err(), StoreError::Database(_)));

    store.create_schema().unwrap();
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn clones_share_connection() {
    let store = UserStore::open_in_memory().unwrap();
    let other = store.clone();
    store.insert(&user(Some("Alice"), None)).unwrap();
    assert_eq!(other.count().unwrap(), 1);
}

// ── round-trip properties ────────────────────────────────────────

#[test]
fn unusual_names_round_trip() {
    let store = UserStore::open_in_memory().unwrap();
    for name in ["nul\0inside", "emoji 🦀👩\u{200d}💻", "  padded  ", "'; DROP TABLE users; --"] {
        let id = store.insert(&user(Some(name), Some("male"))).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().name(), Some(name));
    }
}

proptest! {
    #[test]
    fn insert_then_get_preserves_fields(
        name in prop::option::of(any::<String>()),
        gender in prop::option::of(prop::sample::select(Gender::CHOICES.to_vec())),
    ) {
        let store = UserStore::open_in_memory().unwrap();
        let id = store.insert(&user(name.as_deref(), gender)).unwrap();

        let loaded = store.get(id).unwrap().unwrap();
        prop_assert_eq!(loaded.id(), Some(id));
        prop_assert_eq!(loaded.name(), name.as_deref());
        prop_assert_eq!(loaded.gender().map(|g| g.as_str()), gender);
    }

    #[test]
    fn update_then_get_preserves_fields(
        first in any::<String>(),
        second in any::<String>(),
        gender in prop::sample::select(Gender::CHOICES.to_vec()),
    ) {
        let store = UserStore::open_in_memory().unwrap();
        let id = store.insert(&user(Some(&first), None)).unwrap();

        let mut loaded = store.get(id).unwrap().unwrap();
        loaded.set_name(&json!(second.clone()));
        loaded.set_gender(&json!(gender));
        store.update(&loaded).unwrap();

        let reloaded = store.get(id).unwrap().unwrap();
        prop_assert_eq!(reloaded.name(), Some(second.as_str()));
        prop_assert_eq!(reloaded.gender().map(|g| g.as_str()), Some(gender));
    }
}
