//! Server inventory with passwords resolved from Key Vault

use anyhow::{Context, Result};
use azure_core::credentials::Secret;
use futures::stream::{self, BoxStream, StreamExt};
use log::{debug, warn};
use serde::{Deserialize, Serialize, Serializer};
use std::fs;
use std::path::Path;

use crate::api::SecretStore;
use crate::error::OpsError;

const REDACTED: &str = "********";

fn serialize_secret<S: Serializer>(secret: &Secret, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.secret())
}

fn serialize_optional_secret<S: Serializer>(
    secret: &Option<Secret>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_some(secret.secret()),
        None => serializer.serialize_none(),
    }
}

/// Username plus the password fetched for it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub username: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: Secret,
}

/// One entry of the server inventory file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "HostName", alias = "hostName")]
    pub hostname: String,
    #[serde(alias = "UserName", alias = "userName")]
    pub username: String,
    /// Name of the Key Vault secret holding the password
    #[serde(alias = "SecretName")]
    pub secret_name: String,
    #[serde(
        default,
        skip_deserializing,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_secret"
    )]
    pub password: Option<Secret>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
}

impl ServerRecord {
    /// Attach `password` and the derived credential
    pub fn with_password(mut self, password: String) -> Self {
        let password = Secret::new(password);
        self.credential = Some(Credential {
            username: self.username.clone(),
            password: password.clone(),
        });
        self.password = Some(password);
        self
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Copy with secret values masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.password.is_some() {
            copy.password = Some(Secret::new(REDACTED));
        }
        if let Some(credential) = copy.credential.as_mut() {
            credential.password = Secret::new(REDACTED);
        }
        copy
    }
}

/// The inventory file holds an array of records; a lone object is accepted too
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Many(Vec<ServerRecord>),
    One(ServerRecord),
}

/// Read the inventory at `path`, keeping only `filter` (by name) when given
pub fn read_server_records(path: &Path, filter: Option<&str>) -> Result<Vec<ServerRecord>> {
    if !path.exists() {
        return Err(OpsError::FileNotFound(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read server file: {:?}", path))?;
    let records = match serde_json::from_str::<RecordFile>(&content)
        .with_context(|| format!("Failed to parse server file: {:?}", path))?
    {
        RecordFile::Many(records) => records,
        RecordFile::One(record) => vec![record],
    };
    debug!("Read {} server records from {:?}", records.len(), path);

    Ok(match filter {
        Some(name) => records
            .into_iter()
            .filter(|r| r.name.eq_ignore_ascii_case(name))
            .collect(),
        None => records,
    })
}

/// Stream the inventory with each record's password looked up in `vault`.
///
/// The file is read and validated up front; secrets are fetched lazily, one
/// record at a time, as the stream is polled. A failed lookup is logged and
/// the record is yielded without password or credential.
pub fn load_server_credentials<'a>(
    store: &'a dyn SecretStore,
    path: &Path,
    vault: &'a str,
    filter: Option<&str>,
) -> Result<BoxStream<'a, ServerRecord>> {
    let records = read_server_records(path, filter)?;

    Ok(stream::iter(records)
        .then(move |record| resolve_password(store, vault, record))
        .boxed())
}

async fn resolve_password(store: &dyn SecretStore, vault: &str, record: ServerRecord) -> ServerRecord {
    match store.get_secret(vault, &record.secret_name).await {
        Ok(password) => {
            debug!("Resolved password for server '{}'", record.name);
            record.with_password(password)
        }
        Err(err) => {
            warn!(
                "Unable to read secret '{}' for server '{}' from vault '{}': {:#}",
                record.secret_name, record.name, vault, err
            );
            record
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = r#"[
        { "Name": "web01", "HostName": "web01.contoso.local", "UserName": "admin", "SecretName": "web01-admin" },
        { "name": "db01", "hostname": "db01.contoso.local", "username": "sa", "secretName": "db01-sa" }
    ]"#;

    fn write_inventory(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_reads_both_casings() {
        let file = write_inventory(INVENTORY);
        let records = read_server_records(file.path(), None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hostname, "web01.contoso.local");
        assert_eq!(records[1].secret_name, "db01-sa");
        assert!(records.iter().all(|r| !r.has_password()));
    }

    #[test]
    fn test_single_object_file() {
        let file = write_inventory(
            r#"{ "name": "web01", "hostname": "h", "username": "u", "secretName": "s" }"#,
        );
        assert_eq!(read_server_records(file.path(), None).unwrap().len(), 1);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let file = write_inventory(INVENTORY);
        let records = read_server_records(file.path(), Some("DB01")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "db01");
    }

    #[test]
    fn test_missing_file() {
        let err = read_server_records(Path::new("/nonexistent/servers.json"), None).unwrap_err();
        assert!(matches!(err.downcast_ref::<OpsError>(), Some(OpsError::FileNotFound(_))));
    }

    #[test]
    fn test_password_is_redacted_for_display_and_debug() {
        let record = ServerRecord {
            name: "web01".into(),
            hostname: "h".into(),
            username: "admin".into(),
            secret_name: "s".into(),
            password: None,
            credential: None,
        }
        .with_password("hunter2".into());

        assert_eq!(record.credential.as_ref().unwrap().username, "admin");
        assert!(!format!("{:?}", record).contains("hunter2"));

        let shown = serde_json::to_string(&record.redacted()).unwrap();
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains(REDACTED));

        let full = serde_json::to_string(&record).unwrap();
        assert!(full.contains("hunter2"));
        assert_eq!(record.password.as_ref().unwrap().secret(), "hunter2");
    }
}
