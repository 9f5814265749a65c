/// Login, logout and revalidation against the mock backend
use crate::common::{MockBackend, admin_user, login_success, personnel_user};
use fultang_session::{
    AuthFailure, Credentials, HttpAuthGateway, LoginReply, PersistedSession, Revalidation,
    SessionStatus, SessionStore,
};
use serde_json::json;

fn store_for(backend: &MockBackend) -> SessionStore {
    let gateway = HttpAuthGateway::new(backend.base_url.clone()).expect("gateway");
    SessionStore::new(gateway, PersistedSession::in_memory())
}

/// Personnel login: the effective role is the poste, not "personnel"
#[tokio::test]
async fn test_personnel_login_resolves_poste() {
    // Given a backend accepting a doctor's credentials
    let backend = MockBackend::start().await;
    backend.respond_to_login(200, login_success("T1", "R1", personnel_user(7, "medecin")));
    let store = store_for(&backend);

    // When logging in with e-mail and password
    let result = store
        .login(&Credentials::email("user7@hopital.cm", "secret"))
        .await;

    // Then the session is open with the poste as role
    let success = result.expect("login should succeed");
    assert_eq!(success.role, "medecin");
    assert!(store.is_authenticated());
    assert!(store.has_role("medecin"));
    assert!(!store.has_role("personnel"));
    assert_eq!(store.authorization_header().as_deref(), Some("Bearer T1"));

    // And the backend received the credentials as JSON
    assert_eq!(
        backend.login_requests(),
        vec![json!({"email": "user7@hopital.cm", "password": "secret"})]
    );
}

#[tokio::test]
async fn test_matricule_login_payload() {
    let backend = MockBackend::start().await;
    backend.respond_to_login(200, login_success("T2", "R2", admin_user(1)));
    let store = store_for(&backend);

    let success = store
        .login(&Credentials::matricule("MAT-001", "secret"))
        .await
        .unwrap();

    assert_eq!(success.role, "admin");
    assert!(store.has_role("ADMIN"));
    assert_eq!(
        backend.login_requests(),
        vec![json!({"matricule": "MAT-001", "password": "secret"})]
    );
}

/// Rejected credentials surface the backend's error and detail
#[tokio::test]
async fn test_rejected_login_reply() {
    // Given a backend refusing the password
    let backend = MockBackend::start().await;
    backend.respond_to_login(
        401,
        json!({"error": "invalid_credentials", "detail": "bad password"}),
    );
    let store = store_for(&backend);

    // When logging in
    let result = store
        .login(&Credentials::email("user7@hopital.cm", "wrong"))
        .await;

    // Then the reply carries status, error and detail
    let reply = LoginReply::from(result);
    assert_eq!(
        serde_json::to_value(&reply).unwrap(),
        json!({
            "success": false,
            "status": 401,
            "error": "invalid_credentials",
            "detail": "bad password"
        })
    );
    assert_eq!(store.status(), SessionStatus::Unauthenticated);
}

#[tokio::test]
async fn test_rejected_login_without_body_fields_uses_defaults() {
    let backend = MockBackend::start().await;
    backend.respond_to_login(400, json!({}));
    let store = store_for(&backend);

    let failure = store
        .login(&Credentials::email("user7@hopital.cm", ""))
        .await
        .unwrap_err();

    assert_eq!(
        failure,
        AuthFailure::Rejected {
            status: 400,
            error: "authentication error".to_string(),
            detail: "an error occurred".to_string(),
        }
    );
}

/// Nothing listening on the backend port
#[tokio::test]
async fn test_unreachable_backend_reply() {
    // Given a base URL pointing at a closed port
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let gateway = HttpAuthGateway::new(format!("http://127.0.0.1:{port}/api/")).unwrap();
    let store = SessionStore::new(gateway, PersistedSession::in_memory());

    // When logging in
    let result = store
        .login(&Credentials::email("user7@hopital.cm", "secret"))
        .await;

    // Then the failure is the connectivity class
    assert_eq!(
        serde_json::to_value(LoginReply::from(result)).unwrap(),
        json!({
            "success": false,
            "error": "connection error",
            "detail": "backend unreachable"
        })
    );
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_base_url_without_trailing_slash() {
    let backend = MockBackend::start().await;
    backend.respond_to_login(200, login_success("T1", "R1", admin_user(1)));
    let base = backend.base_url.trim_end_matches('/').to_string();
    let gateway = HttpAuthGateway::new(base).unwrap();
    let store = SessionStore::new(gateway, PersistedSession::in_memory());

    let result = store.login(&Credentials::email("root", "secret")).await;

    assert!(result.is_ok());
    assert_eq!(backend.login_requests().len(), 1);
}

#[tokio::test]
async fn test_logout_then_has_role() {
    let backend = MockBackend::start().await;
    backend.respond_to_login(200, login_success("T1", "R1", admin_user(1)));
    let store = store_for(&backend);
    store
        .login(&Credentials::email("root", "secret"))
        .await
        .unwrap();

    store.logout().unwrap();

    assert!(!store.is_authenticated());
    assert!(!store.has_role("admin"));
    assert_eq!(store.authorization_header(), None);
}

/// who-am-i with the stored bearer token
#[tokio::test]
async fn test_revalidate_sends_bearer_and_resolves_role() {
    // Given an open session for a receptionist
    let backend = MockBackend::start().await;
    backend.respond_to_login(
        200,
        login_success("T9", "R9", personnel_user(12, "receptioniste")),
    );
    backend.respond_to_me(200, personnel_user(12, "receptioniste"));
    let store = store_for(&backend);
    store
        .login(&Credentials::email("user12@hopital.cm", "secret"))
        .await
        .unwrap();

    // When revalidating
    let outcome = store.revalidate().await.unwrap();

    // Then the token was sent and the poste is the role
    assert_eq!(backend.me_authorizations(), vec!["Bearer T9".to_string()]);
    match outcome {
        Revalidation::Valid {
            user,
            effective_role,
        } => {
            assert_eq!(user.id(), 12);
            assert_eq!(effective_role, "receptioniste");
        }
        other => panic!("Expected Valid, got {other:?}"),
    }
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_revalidate_expired_token_logs_out() {
    let backend = MockBackend::start().await;
    backend.respond_to_login(200, login_success("T1", "R1", admin_user(1)));
    backend.respond_to_me(
        401,
        json!({"detail": "Given token not valid for any token type", "code": "token_not_valid"}),
    );
    let store = store_for(&backend);
    store
        .login(&Credentials::email("root", "secret"))
        .await
        .unwrap();

    let outcome = store.revalidate().await.unwrap();

    assert_eq!(outcome, Revalidation::Revoked);
    assert_eq!(store.status(), SessionStatus::Unauthenticated);
}
