use anyhow::Result;
use log::{info, warn};

use crate::auth::{ConnectTarget, Session, SessionStore, SignIn};
use crate::error::{OpsError, is_invalid_operation};

/// Return a session for `target`, signing in when none is saved.
///
/// The target must be a GUID (`OpsError::InvalidArgument` otherwise); this is
/// checked before the store or the sign-in are touched.
///
/// A store that cannot be queried at all (`OpsError::InvalidOperation`) counts
/// as "not connected". A sign-in that lands on a different tenant or
/// subscription than requested is an error and nothing is saved.
pub async fn ensure_connected(
    store: &dyn SessionStore,
    sign_in: &dyn SignIn,
    target: &ConnectTarget,
) -> Result<Session> {
    target.validate()?;

    let existing = match store.find(target).await {
        Ok(existing) => existing,
        Err(err) if is_invalid_operation(&err) => {
            warn!("Not connected: {}", err);
            None
        }
        Err(err) => return Err(err),
    };

    if let Some(session) = existing {
        info!(
            "Using existing session for {} ({} / {})",
            session.account.id, session.tenant_id, session.subscription_name
        );
        return Ok(session);
    }

    warn!("No existing session for {}, signing in", target);
    let session = sign_in.sign_in(target).await?;

    if !session.matches(target) {
        return Err(OpsError::SessionMismatch {
            kind: target.kind(),
            requested: target.id().to_string(),
            actual: target.actual_id(&session).to_string(),
        }
        .into());
    }

    store.save(&session).await?;
    info!(
        "Connected as {} to subscription '{}'",
        session.account.id, session.subscription_name
    );
    Ok(session)
}
