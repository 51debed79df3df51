//! Saved sign-in sessions ("contexts") and their on-disk store

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::OpsError;

/// Who a session is signed in as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountKind {
    User,
    ServicePrincipal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Sign-in name for users, application id for service principals
    pub id: String,
    pub kind: AccountKind,
}

/// An authenticated identity bound to one tenant and subscription.
/// Holds no secrets; tokens are requested from the identity provider on use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub account: Account,
    pub tenant_id: String,
    pub subscription_id: String,
    pub subscription_name: String,
}

impl Session {
    pub fn matches(&self, target: &ConnectTarget) -> bool {
        match target {
            ConnectTarget::Tenant(id) => self.tenant_id.eq_ignore_ascii_case(id),
            ConnectTarget::Subscription(id) => self.subscription_id.eq_ignore_ascii_case(id),
        }
    }

    fn key(&self) -> SessionKey {
        SessionKey {
            account_id: self.account.id.clone(),
            subscription_id: self.subscription_id.clone(),
        }
    }

    fn is(&self, key: &SessionKey) -> bool {
        self.account.id.eq_ignore_ascii_case(&key.account_id)
            && self.subscription_id.eq_ignore_ascii_case(&key.subscription_id)
    }
}

/// What a caller wants to be connected to: exactly one of tenant or subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectTarget {
    Tenant(String),
    Subscription(String),
}

impl ConnectTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectTarget::Tenant(_) => "tenant",
            ConnectTarget::Subscription(_) => "subscription",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ConnectTarget::Tenant(id) | ConnectTarget::Subscription(id) => id,
        }
    }

    /// The tenant to sign in to, when the target names one
    pub fn tenant(&self) -> Option<&str> {
        match self {
            ConnectTarget::Tenant(id) => Some(id),
            ConnectTarget::Subscription(_) => None,
        }
    }

    /// The identifier of `session` that corresponds to this target
    pub fn actual_id<'a>(&self, session: &'a Session) -> &'a str {
        match self {
            ConnectTarget::Tenant(_) => &session.tenant_id,
            ConnectTarget::Subscription(_) => &session.subscription_id,
        }
    }

    /// Sessions record tenants and subscriptions by GUID, so anything else
    /// (a tenant domain, a display name) could never match after sign-in.
    pub fn validate(&self) -> Result<()> {
        if uuid::Uuid::parse_str(self.id()).is_err() {
            return Err(OpsError::InvalidArgument {
                parameter: self.kind(),
                message: format!("'{}' is not a {} id (GUID)", self.id(), self.kind()),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Display for ConnectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.id())
    }
}

/// Where sessions live between invocations
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The session marked current, if any
    async fn current(&self) -> Result<Option<Session>>;

    /// A saved session for `target`. Fails with `OpsError::InvalidOperation`
    /// when no sessions have ever been saved.
    async fn find(&self, target: &ConnectTarget) -> Result<Option<Session>>;

    /// Save `session` and mark it current
    async fn save(&self, session: &Session) -> Result<()>;

    /// Forget the current session (or all of them). Returns how many were removed.
    async fn remove(&self, all: bool) -> Result<usize>;
}

/// Identifies one saved session: the same subscription may be saved once per account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionKey {
    account_id: String,
    subscription_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    current: Option<SessionKey>,
    #[serde(default)]
    sessions: Vec<Session>,
}

/// JSON file backed session store (`sessions.json` in the config directory)
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Option<SessionFile>> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("Failed to access session file: {:?}", self.path))?;
        if !exists {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read session file: {:?}", self.path))?;
        let file: SessionFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {:?}", self.path))?;

        debug!("Loaded {} saved sessions from {:?}", file.sessions.len(), self.path);
        Ok(Some(file))
    }

    async fn write(&self, file: &SessionFile) -> Result<()> {
        let content = serde_json::to_string_pretty(file).context("Failed to serialize sessions")?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write session file: {:?}", self.path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .with_context(|| format!("Failed to restrict permissions on {:?}", self.path))?;
        }

        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn current(&self) -> Result<Option<Session>> {
        let Some(file) = self.read().await? else {
            return Ok(None);
        };

        let Some(current) = file.current else {
            return Ok(None);
        };

        Ok(file.sessions.into_iter().find(|s| s.is(&current)))
    }

    async fn find(&self, target: &ConnectTarget) -> Result<Option<Session>> {
        let file = self.read().await?.ok_or_else(|| {
            OpsError::InvalidOperation(format!(
                "No saved sessions in {:?}; sign in with 'azure-ops connect'",
                self.path
            ))
        })?;

        // Prefer the current session when several match
        let current = file.current;
        let mut matching: Vec<Session> = file
            .sessions
            .into_iter()
            .filter(|s| s.matches(target))
            .collect();
        matching.sort_by_key(|s| current.as_ref().is_none_or(|c| !s.is(c)));

        Ok(matching.into_iter().next())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let mut file = self.read().await?.unwrap_or_default();
        let key = session.key();

        file.sessions.retain(|s| !s.is(&key));
        file.sessions.push(session.clone());
        file.current = Some(key);

        self.write(&file).await?;
        info!(
            "Saved session for {} in subscription {}",
            session.account.id, session.subscription_name
        );
        Ok(())
    }

    async fn remove(&self, all: bool) -> Result<usize> {
        let Some(mut file) = self.read().await? else {
            return Ok(0);
        };

        let before = file.sessions.len();
        if all {
            file.sessions.clear();
        } else if let Some(current) = file.current.as_ref() {
            file.sessions.retain(|s| !s.is(current));
        }
        file.current = None;

        self.write(&file).await?;
        Ok(before - file.sessions.len())
    }
}
