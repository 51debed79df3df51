use anyhow::Result;
use log::debug;

use crate::api::constants::MANAGEMENT_AUDIENCE;
use crate::auth::{Session, SessionStore, TokenProvider};
use crate::error::OpsError;

/// Bearer token for `audience` (management API by default).
///
/// Without an explicit session the store's current session is used; with
/// neither this fails with `OpsError::ArgumentNull` before any request goes out.
pub async fn fetch_access_token(
    tokens: &dyn TokenProvider,
    store: &dyn SessionStore,
    session: Option<&Session>,
    audience: Option<&str>,
) -> Result<String> {
    let resolved;
    let session = match session {
        Some(session) => session,
        None => {
            resolved = store
                .current()
                .await?
                .ok_or_else(|| OpsError::argument_null("session"))?;
            &resolved
        }
    };

    let audience = audience.unwrap_or(MANAGEMENT_AUDIENCE);
    debug!("Fetching token for {} in tenant {}", audience, session.tenant_id);

    let token = tokens.get_token(session, audience).await?;
    Ok(token.access_token)
}
