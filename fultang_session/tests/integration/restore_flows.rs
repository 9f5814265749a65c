/// Sessions surviving a restart through the file store
use crate::common::{MockBackend, login_success, personnel_user, temp_session_file};
use fultang_session::{
    Credentials, FileStore, HttpAuthGateway, KeyValueStore, PersistedSession, SessionKeys,
    SessionStatus, SessionStore,
};

fn file_persisted(path: &std::path::Path) -> PersistedSession {
    PersistedSession::new(Box::new(FileStore::new(path)), SessionKeys::default())
}

#[tokio::test]
async fn test_restart_restores_file_session() {
    // Given a login persisted to a session file
    let backend = MockBackend::start().await;
    backend.respond_to_login(
        200,
        login_success("T1", "R1", personnel_user(7, "laborantin")),
    );
    let path = temp_session_file();
    let first = SessionStore::new(
        HttpAuthGateway::new(backend.base_url.clone()).unwrap(),
        file_persisted(&path),
    );
    first
        .login(&Credentials::email("user7@hopital.cm", "secret"))
        .await
        .unwrap();
    let requests_after_login = backend.login_requests().len();

    // When a new client instance starts on the same file
    let second = SessionStore::new(
        HttpAuthGateway::new(backend.base_url.clone()).unwrap(),
        file_persisted(&path),
    );
    let restored = second.restore();

    // Then the same session is back without any request
    assert!(restored);
    assert!(second.has_role("laborantin"));
    assert_eq!(second.user(), first.user());
    assert_eq!(second.refresh_token().as_deref(), Some("R1"));
    assert_eq!(backend.login_requests().len(), requests_after_login);
    assert!(backend.me_authorizations().is_empty());

    // And logout removes the file
    second.logout().unwrap();
    assert!(!path.exists());
}

/// A lone access token on disk is not a session
#[tokio::test]
async fn test_restore_with_only_token_on_disk() {
    // Given a session file holding only the access token
    let path = temp_session_file();
    let mut store = FileStore::new(&path);
    store.put("token_key_fultang", "X".to_string()).unwrap();

    // When restoring
    let session = SessionStore::new(
        HttpAuthGateway::new("http://127.0.0.1:8000/api/").unwrap(),
        file_persisted(&path),
    );
    let restored = session.restore();

    // Then nothing is authenticated and the leftover is gone
    assert!(!restored);
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert!(!session.has_role("admin"));
    assert_eq!(FileStore::new(&path).get("token_key_fultang").unwrap(), None);

    let _ = std::fs::remove_file(&path);
}
