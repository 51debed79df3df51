//! In-memory stand-ins for the Azure services, shared by the integration tests
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use azure_ops::api::{ResourceGroup, ResourceGroupApi, SecretStore, TokenInfo};
use azure_ops::auth::{
    Account, AccountKind, ConnectTarget, Session, SessionStore, SignIn, TokenProvider,
};
use azure_ops::error::OpsError;

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

static CAPTURED: Lazy<Mutex<Vec<(Level, String)>>> = Lazy::new(|| Mutex::new(Vec::new()));
static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

/// Install the capturing logger (once per test binary)
pub fn capture_logs() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Captured messages at `level` containing `needle`. Tests run in parallel,
/// so needles should be unique to the test.
pub fn logged(level: Level, needle: &str) -> Vec<String> {
    CAPTURED
        .lock()
        .unwrap()
        .iter()
        .filter(|(l, message)| *l == level && message.contains(needle))
        .map(|(_, message)| message.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub fn session(tenant: &str, subscription: &str, name: &str) -> Session {
    Session {
        account: Account {
            id: "ops@contoso.com".to_string(),
            kind: AccountKind::User,
        },
        tenant_id: tenant.to_string(),
        subscription_id: subscription.to_string(),
        subscription_name: name.to_string(),
    }
}

/// Session store kept in memory. `None` sessions means "never signed in",
/// which makes `find` fail with an invalid-operation error.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<Option<Vec<Session>>>,
    current: Mutex<Option<Session>>,
    broken: bool,
    pub saves: AtomicUsize,
}

impl MemorySessionStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        let current = sessions.last().cloned();
        Self {
            sessions: Mutex::new(Some(sessions)),
            current: Mutex::new(current),
            ..Self::default()
        }
    }

    /// A store whose lookups fail with a non-recoverable error
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn current(&self) -> Result<Option<Session>> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn find(&self, target: &ConnectTarget) -> Result<Option<Session>> {
        if self.broken {
            anyhow::bail!("session file is corrupt");
        }

        let sessions = self.sessions.lock().unwrap();
        let sessions = sessions
            .as_ref()
            .ok_or_else(|| OpsError::InvalidOperation("Run connect first".into()))?;
        Ok(sessions.iter().find(|s| s.matches(target)).cloned())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .lock()
            .unwrap()
            .get_or_insert_with(Vec::new)
            .push(session.clone());
        *self.current.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn remove(&self, _all: bool) -> Result<usize> {
        let removed = self.sessions.lock().unwrap().take().map(|s| s.len()).unwrap_or(0);
        *self.current.lock().unwrap() = None;
        Ok(removed)
    }
}

/// Sign-in that always lands on the same session
pub struct FakeSignIn {
    pub result: Session,
    pub calls: AtomicUsize,
}

impl FakeSignIn {
    pub fn returning(result: Session) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignIn for FakeSignIn {
    async fn sign_in(&self, _target: &ConnectTarget) -> Result<Session> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeTokens {
    pub calls: AtomicUsize,
}

impl FakeTokens {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for FakeTokens {
    async fn get_token(&self, session: &Session, audience: &str) -> Result<TokenInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TokenInfo {
            access_token: format!("token:{}:{}", session.subscription_id, audience),
            expires_at: SystemTime::now() + Duration::from_secs(3600),
        })
    }
}

// ---------------------------------------------------------------------------
// Resource groups
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeResourceGroups {
    groups: Mutex<HashMap<String, ResourceGroup>>,
    pub creates: AtomicUsize,
    pub fail_create: bool,
}

impl FakeResourceGroups {
    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceGroupApi for FakeResourceGroups {
    async fn get_resource_group(&self, _session: &Session, name: &str) -> Result<Option<ResourceGroup>> {
        Ok(self.groups.lock().unwrap().get(&name.to_lowercase()).cloned())
    }

    async fn create_resource_group(
        &self,
        session: &Session,
        name: &str,
        location: &str,
    ) -> Result<ResourceGroup> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(OpsError::Api {
                service: "Resource Manager",
                status: 403,
                code: "AuthorizationFailed".into(),
                message: "no write access".into(),
            }
            .into());
        }

        let group = ResourceGroup {
            id: format!(
                "/subscriptions/{}/resourceGroups/{}",
                session.subscription_id, name
            ),
            name: name.to_string(),
            location: location.to_string(),
            properties: None,
            tags: HashMap::new(),
        };
        self.groups
            .lock()
            .unwrap()
            .insert(name.to_lowercase(), group.clone());
        Ok(group)
    }
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeSecrets {
    secrets: HashMap<String, String>,
    pub calls: AtomicUsize,
}

impl FakeSecrets {
    pub fn with(secrets: &[(&str, &str)]) -> Self {
        Self {
            secrets: secrets
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for FakeSecrets {
    async fn get_secret(&self, vault_name: &str, secret_name: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.secrets.get(secret_name).cloned().ok_or_else(|| {
            OpsError::Api {
                service: "Key Vault",
                status: 404,
                code: "SecretNotFound".into(),
                message: format!("{} not in {}", secret_name, vault_name),
            }
            .into()
        })
    }
}
