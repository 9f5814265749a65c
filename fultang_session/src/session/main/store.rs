use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::gateway::{
    AuthGateway, Credentials, ErrorBody, GatewayError, GatewayResponse, HttpAuthGateway,
    LoginEnvelope,
};
use crate::role::{User, resolve_effective_role, roles_match};
use crate::session::errors::AuthFailure;
use crate::session::types::{
    LoginSuccess, Revalidation, SessionSnapshot, SessionState, SessionStatus,
};
use crate::storage::{PersistedSession, SessionRecord, TokenPair};

/// Holder of the one authenticated identity of a client instance.
///
/// Build it once at start-up, call [`SessionStore::restore`], and hand an
/// `Arc<SessionStore>` to whatever needs to gate on the session. Every
/// operation reports failures as [`AuthFailure`] values; nothing panics.
pub struct SessionStore {
    gateway: Box<dyn AuthGateway>,
    inner: Mutex<Inner>,
}

struct Inner {
    state: SessionState,
    persisted: PersistedSession,
    /// Bumped by every transition that starts or ends a session. A request
    /// only applies its result if the generation it started under is still
    /// current.
    generation: u64,
}

impl SessionStore {
    pub fn new(gateway: impl AuthGateway, persisted: PersistedSession) -> Self {
        Self {
            gateway: Box::new(gateway),
            inner: Mutex::new(Inner {
                state: SessionState::Unauthenticated,
                persisted,
                generation: 0,
            }),
        }
    }

    /// Store wired from the environment: `BACKEND_API_BASE_URL` for the
    /// gateway, `SESSION_STORE_*` for durable storage.
    pub fn from_env() -> Result<Self, AuthFailure> {
        let gateway = HttpAuthGateway::from_env()?;
        let persisted = PersistedSession::from_env()?;
        Ok(Self::new(gateway, persisted))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reopen the session left in durable storage, without any network call.
    ///
    /// Anything short of a complete session (token, refresh token, user and
    /// role) leaves the store unauthenticated and wipes the leftovers.
    /// Returns whether a session was restored.
    pub fn restore(&self) -> bool {
        let mut inner = self.lock();

        if matches!(inner.state, SessionState::LoadingLogin) {
            tracing::warn!("Restore skipped: a login is in flight");
            return false;
        }
        inner.generation += 1;

        match inner.persisted.load() {
            Ok(Some(record)) => {
                tracing::info!(
                    "Restored session for user {} with role {}",
                    record.user.id(),
                    record.effective_role
                );
                inner.state = SessionState::Authenticated(record);
                true
            }
            Ok(None) => {
                tracing::debug!("No complete persisted session, starting unauthenticated");
                inner.reset();
                false
            }
            Err(e) => {
                tracing::warn!("Failed to read persisted session: {}", e);
                inner.reset();
                false
            }
        }
    }

    /// Authenticate against the backend and persist the resulting session.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginSuccess, AuthFailure> {
        let generation = {
            let mut inner = self.lock();
            if matches!(inner.state, SessionState::LoadingLogin) {
                tracing::warn!("Login requested while another login is in flight");
                return Err(AuthFailure::LoginInProgress);
            }
            inner.generation += 1;
            inner.state = SessionState::LoadingLogin;
            inner.generation
        };
        let mut pending = PendingLogin {
            store: self,
            generation,
            armed: true,
        };

        let outcome = self.gateway.login(credentials).await;
        pending.armed = false;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::info!("Dropping login result: the session changed while it was in flight");
            return Err(AuthFailure::Superseded);
        }

        let result = login_envelope(outcome).and_then(|envelope| inner.authenticate(envelope));
        match &result {
            Ok(success) => tracing::info!("Logged in with role {}", success.role),
            Err(failure) => {
                tracing::info!("Login failed: {}", failure);
                inner.reset();
            }
        }
        result
    }

    /// Close the session: durable state is wiped, memory is reset and any
    /// in-flight login result will be dropped. No network call.
    ///
    /// Memory is reset even when wiping durable state fails; the storage
    /// failure is still reported.
    pub fn logout(&self) -> Result<(), AuthFailure> {
        let mut inner = self.lock();
        inner.logout()
    }

    /// Ask the backend whether the current access token is still accepted.
    ///
    /// A refused token (401/403), or one that now belongs to somebody else,
    /// closes the session. Other failures leave the session untouched.
    pub async fn revalidate(&self) -> Result<Revalidation, AuthFailure> {
        let (generation, access_token, user_id) = {
            let inner = self.lock();
            match &inner.state {
                SessionState::Authenticated(record) => (
                    inner.generation,
                    record.tokens.access.clone(),
                    record.user.id(),
                ),
                _ => return Ok(Revalidation::NotAuthenticated),
            }
        };

        let outcome = self.gateway.who_am_i(&access_token).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!("Dropping who-am-i result: the session changed meanwhile");
            return Err(AuthFailure::Superseded);
        }
        let response = outcome?;

        match response.status {
            401 | 403 => {
                tracing::info!("Backend refused the access token ({})", response.status);
                inner.logout()?;
                Ok(Revalidation::Revoked)
            }
            status if response.is_success() => {
                let user: User = serde_json::from_value(response.body).map_err(|e| {
                    AuthFailure::rejected(
                        status,
                        Some("invalid response".to_string()),
                        Some(e.to_string()),
                    )
                })?;

                if user.id() != user_id {
                    tracing::warn!(
                        "Access token now belongs to user {} instead of {}",
                        user.id(),
                        user_id
                    );
                    inner.logout()?;
                    return Ok(Revalidation::Revoked);
                }

                let effective_role = resolve_effective_role(&user).to_string();
                Ok(Revalidation::Valid {
                    user,
                    effective_role,
                })
            }
            _ => Err(rejection(&response)),
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::from(&self.lock().state)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.lock().state, SessionState::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.lock().state, SessionState::LoadingLogin)
    }

    /// Case-insensitive check of the effective role. Always false without a
    /// session.
    pub fn has_role(&self, required_role: &str) -> bool {
        let inner = self.lock();
        let SessionState::Authenticated(record) = &inner.state else {
            return false;
        };

        if record.effective_role.is_empty() {
            roles_match(resolve_effective_role(&record.user), required_role)
        } else {
            roles_match(&record.effective_role, required_role)
        }
    }

    /// True if the effective role matches any of `roles`.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    pub fn user(&self) -> Option<User> {
        self.with_record(|record| record.user.clone())
    }

    pub fn effective_role(&self) -> Option<String> {
        self.with_record(|record| {
            if record.effective_role.is_empty() {
                resolve_effective_role(&record.user).to_string()
            } else {
                record.effective_role.clone()
            }
        })
    }

    pub fn access_token(&self) -> Option<String> {
        self.with_record(|record| record.tokens.access.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.with_record(|record| record.tokens.refresh.clone())
    }

    /// `Authorization` header value for outgoing API calls.
    pub fn authorization_header(&self) -> Option<String> {
        self.with_record(|record| format!("Bearer {}", record.tokens.access))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&self.lock().state)
    }

    fn with_record<T>(&self, f: impl FnOnce(&SessionRecord) -> T) -> Option<T> {
        match &self.lock().state {
            SessionState::Authenticated(record) => Some(f(record)),
            _ => None,
        }
    }
}

/// Puts the store back to `Unauthenticated` when a login future is dropped
/// before the backend answered, so the next login is not refused.
struct PendingLogin<'a> {
    store: &'a SessionStore,
    generation: u64,
    armed: bool,
}

impl Drop for PendingLogin<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.store.lock();
        if inner.generation == self.generation
            && matches!(inner.state, SessionState::LoadingLogin)
        {
            tracing::warn!("Login abandoned before the backend answered");
            inner.reset();
        }
    }
}

impl Inner {
    fn authenticate(&mut self, envelope: LoginEnvelope) -> Result<LoginSuccess, AuthFailure> {
        let LoginEnvelope { message, data, .. } = envelope;
        let effective_role = resolve_effective_role(&data.user).to_string();
        let tokens = TokenPair {
            access: data.access,
            refresh: data.refresh,
        };

        self.persisted.save(&tokens, &data.user, &effective_role)?;
        self.state = SessionState::Authenticated(SessionRecord {
            tokens,
            user: data.user,
            effective_role: effective_role.clone(),
        });

        Ok(LoginSuccess {
            role: effective_role,
            message,
        })
    }

    fn logout(&mut self) -> Result<(), AuthFailure> {
        self.generation += 1;
        self.state = SessionState::Unauthenticated;
        self.persisted.clear().map_err(|e| {
            tracing::error!("Failed to clear persisted session: {}", e);
            AuthFailure::from(e)
        })?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Back to `Unauthenticated` with durable state wiped, best effort.
    fn reset(&mut self) {
        self.state = SessionState::Unauthenticated;
        if let Err(e) = self.persisted.clear() {
            tracing::warn!("Failed to clear persisted session: {}", e);
        }
    }
}

/// Accept only `200` with `success: true` and a well-formed payload.
fn login_envelope(
    outcome: Result<GatewayResponse, GatewayError>,
) -> Result<LoginEnvelope, AuthFailure> {
    let response = outcome?;

    if response.status == 200 {
        match serde_json::from_value::<LoginEnvelope>(response.body.clone()) {
            Ok(envelope) if envelope.success => return Ok(envelope),
            Ok(_) => tracing::warn!("Login answered 200 without a success flag"),
            Err(e) => tracing::warn!("Unusable login response body: {}", e),
        }
    }

    Err(rejection(&response))
}

fn rejection(response: &GatewayResponse) -> AuthFailure {
    let ErrorBody { error, detail } = ErrorBody::from_value(&response.body);
    AuthFailure::rejected(response.status, error, detail)
}
