use super::*;
use authgate::session::User;

fn session() -> Session {
    Session {
        access_token: "jwt".to_owned(),
        refresh_token: "refresh".to_owned(),
        token_type: "bearer".to_owned(),
        expires_in: 3600,
        expires_at: Some(4_000_000_000),
        user: User {
            id: "u1".to_owned(),
            email: Some("a@b.com".to_owned()),
            role: None,
            email_confirmed_at: None,
        },
    }
}

#[test]
fn missing_file_is_no_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    assert!(store.load().is_none());
}

#[test]
fn saved_session_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    store.save(&session());
    assert_eq!(store.load(), Some(session()));
}

#[test]
fn clear_removes_file_and_tolerates_repeat() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    store.save(&session());
    store.clear();
    assert!(!store.path().exists());
    store.clear();
}

#[test]
fn corrupt_file_is_no_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{not json").unwrap();
    assert!(FileSessionStore::new(path).load().is_none());
}
