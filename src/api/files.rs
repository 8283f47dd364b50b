//! Deserialization of the Google service account key file (`credentials.json`), as downloaded
//! from the Google Cloud Console.

use crate::{utils, Result};
use anyhow::ensure;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::path::Path;

const SERVICE_ACCOUNT: &str = "service_account";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The fields of a service account key that are needed to obtain access tokens. Other fields in
/// the file are ignored.
#[derive(Clone, Deserialize)]
pub(super) struct ServiceAccountKey {
    #[serde(rename = "type")]
    key_type: String,
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub(super) async fn load(path: &Path) -> Result<Self> {
        let key: ServiceAccountKey = utils::deserialize(path).await?;
        key.check()?;
        Ok(key)
    }

    fn check(&self) -> Result<()> {
        ensure!(
            self.key_type == SERVICE_ACCOUNT,
            "Expected a '{SERVICE_ACCOUNT}' credentials file, got '{}'",
            self.key_type
        );
        ensure!(
            !self.client_email.is_empty(),
            "The credentials file has no client_email"
        );
        ensure!(
            !self.private_key.is_empty(),
            "The credentials file has no private_key"
        );
        Ok(())
    }

    pub(super) fn client_email(&self) -> &str {
        &self.client_email
    }

    pub(super) fn private_key(&self) -> &str {
        &self.private_key
    }

    pub(super) fn private_key_id(&self) -> Option<&str> {
        self.private_key_id.as_deref()
    }

    pub(super) fn token_uri(&self) -> &str {
        &self.token_uri
    }
}

impl Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
