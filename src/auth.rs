//! Authentication gate.
//!
//! Before the sidebar shows anything, the host confirms that the user has a
//! valid session by asking an identity endpoint who they are. The gate moves
//! through three states:
//!
//! ```text
//! Checking ──verify ok──▶ Authenticated(identity)   keepalive started
//!     │
//!     └──verify err──▶ Unauthenticated              keepalive stopped
//! ```
//!
//! While checking, callers get [`GateDecision::Pending`]; once unauthenticated
//! every path is redirected to the login page with the original path carried
//! in the `redirect` query parameter.
//!
//! The verifier is a trait so tests and alternative identity providers can
//! stand in for the HTTP endpoint.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Url;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::session::SessionKeepalive;

/// Who the identity endpoint says the user is.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// The endpoint's response body, kept as-is.
    pub user: serde_json::Value,
    pub verified_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(user: serde_json::Value) -> Self {
        Self {
            user,
            verified_at: Utc::now(),
        }
    }

    /// An identity with no user payload.
    pub fn anonymous() -> Self {
        Self::new(serde_json::Value::Null)
    }

    /// A display name for logs: `username`, `email`, or `id` when present.
    pub fn display_name(&self) -> Option<&str> {
        ["username", "email", "id"]
            .iter()
            .find_map(|key| self.user.get(*key).and_then(|v| v.as_str()))
    }
}

/// Confirms the current session.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self) -> Result<Identity>;
}

/// Verifies the session with `GET verify_url`. Any non-2xx status is a
/// failure; the response body (if JSON) becomes the identity payload.
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    url: String,
}

impl HttpIdentityVerifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn from_config(auth: &AuthConfig) -> Result<Self> {
        Self::new(&auth.verify_url, Duration::from_secs(auth.timeout_secs))
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self) -> Result<Identity> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Identity request to {} failed", self.url))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("Identity endpoint returned {}", status);
        }

        let body = resp.text().await.context("Failed to read identity response")?;
        let user = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        Ok(Identity::new(user))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Checking,
    Authenticated(Identity),
    Unauthenticated,
}

/// What to do with a request for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The check has not finished; show a loading state.
    Pending,
    Allow,
    /// Send the user to this login URL.
    Redirect(String),
}

pub struct AuthGate {
    verifier: Arc<dyn IdentityVerifier>,
    keepalive: Arc<SessionKeepalive>,
    login_path: String,
    state: RwLock<AuthState>,
}

impl AuthGate {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        keepalive: Arc<SessionKeepalive>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            keepalive,
            login_path: login_path.into(),
            state: RwLock::new(AuthState::Checking),
        }
    }

    /// Build a gate backed by the HTTP verifier described in `auth`.
    pub fn from_config(auth: &AuthConfig) -> Result<Self> {
        let verifier: Arc<dyn IdentityVerifier> = Arc::new(HttpIdentityVerifier::from_config(auth)?);
        let keepalive = Arc::new(SessionKeepalive::new(
            Arc::clone(&verifier),
            Duration::from_secs(auth.keepalive_secs),
        ));
        Ok(Self::new(verifier, keepalive, auth.login_path.clone()))
    }

    /// Run the verifier once and settle the gate.
    pub async fn check(&self) -> AuthState {
        self.set_state(AuthState::Checking);

        let next = match self.verifier.verify().await {
            Ok(identity) => {
                info!(
                    user = identity.display_name().unwrap_or("unknown"),
                    "session verified"
                );
                self.keepalive.start();
                AuthState::Authenticated(identity)
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "session check failed");
                self.keepalive.stop();
                AuthState::Unauthenticated
            }
        };

        self.set_state(next.clone());
        next
    }

    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), AuthState::Authenticated(_))
    }

    pub fn keepalive(&self) -> &SessionKeepalive {
        &self.keepalive
    }

    /// Decide what a request for `path` gets in the current state.
    pub fn decision(&self, path: &str) -> Result<GateDecision> {
        Ok(match self.state() {
            AuthState::Checking => GateDecision::Pending,
            AuthState::Authenticated(_) => GateDecision::Allow,
            AuthState::Unauthenticated => GateDecision::Redirect(self.login_redirect(path)?),
        })
    }

    /// `login_path?redirect=<path>`, with `path` percent-encoded.
    pub fn login_redirect(&self, path: &str) -> Result<String> {
        login_redirect(&self.login_path, path)
    }

    fn set_state(&self, next: AuthState) {
        match self.state.write() {
            Ok(mut state) => *state = next,
            Err(e) => *e.into_inner() = next,
        }
    }
}

/// Build the login URL that returns the user to `from` after signing in.
pub fn login_redirect(login_path: &str, from: &str) -> Result<String> {
    // Only the path and query of this URL are kept.
    let mut url = Url::parse("http://localhost")
        .and_then(|base| base.join(login_path))
        .with_context(|| format!("Invalid login path: {}", login_path))?;
    url.query_pairs_mut().append_pair("redirect", from);

    let mut out = url.path().to_string();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FakeVerifier {
        ok: AtomicBool,
        calls: AtomicUsize,
    }

    impl FakeVerifier {
        fn new(ok: bool) -> Arc<Self> {
            Arc::new(Self {
                ok: AtomicBool::new(ok),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl IdentityVerifier for FakeVerifier {
        async fn verify(&self) -> Result<Identity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.ok.load(Ordering::SeqCst) {
                Ok(Identity::new(serde_json::json!({ "username": "mara" })))
            } else {
                bail!("401 Unauthorized")
            }
        }
    }

    fn gate(verifier: Arc<FakeVerifier>) -> AuthGate {
        let verifier: Arc<dyn IdentityVerifier> = verifier;
        let keepalive = Arc::new(SessionKeepalive::new(
            Arc::clone(&verifier),
            Duration::from_secs(300),
        ));
        AuthGate::new(verifier, keepalive, "/login")
    }

    #[tokio::test]
    async fn pending_until_checked() {
        let gate = gate(FakeVerifier::new(true));
        assert_eq!(gate.state(), AuthState::Checking);
        assert_eq!(gate.decision("/editor").unwrap(), GateDecision::Pending);
    }

    #[tokio::test]
    async fn authenticated_allows_and_starts_keepalive() {
        let verifier = FakeVerifier::new(true);
        let gate = gate(Arc::clone(&verifier));

        let state = gate.check().await;
        match state {
            AuthState::Authenticated(identity) => {
                assert_eq!(identity.display_name(), Some("mara"))
            }
            other => panic!("expected authenticated, got {:?}", other),
        }
        assert!(gate.is_authenticated());
        assert_eq!(gate.decision("/editor/42").unwrap(), GateDecision::Allow);
        assert!(gate.keepalive().is_running());
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);

        gate.keepalive().stop();
    }

    #[tokio::test]
    async fn unauthenticated_redirects_and_stops_keepalive() {
        let verifier = FakeVerifier::new(true);
        let gate = gate(Arc::clone(&verifier));
        gate.check().await;
        assert!(gate.keepalive().is_running());

        verifier.ok.store(false, Ordering::SeqCst);
        assert_eq!(gate.check().await, AuthState::Unauthenticated);
        assert!(!gate.keepalive().is_running());
        assert_eq!(
            gate.decision("/editor/42").unwrap(),
            GateDecision::Redirect("/login?redirect=%2Feditor%2F42".to_string())
        );
    }

    #[test]
    fn redirect_encodes_query_characters() {
        assert_eq!(
            login_redirect("/login", "/editor?doc=7&ch=2").unwrap(),
            "/login?redirect=%2Feditor%3Fdoc%3D7%26ch%3D2"
        );
        assert_eq!(
            login_redirect("/auth/login", "/").unwrap(),
            "/auth/login?redirect=%2F"
        );
    }

    #[test]
    fn display_name_falls_back() {
        let id = Identity::new(serde_json::json!({ "email": "m@example.com" }));
        assert_eq!(id.display_name(), Some("m@example.com"));
        assert_eq!(Identity::anonymous().display_name(), None);
    }
}
