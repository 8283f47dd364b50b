//! Service account authentication for the Google Sheets API.
//!
//! A signed JWT assertion is exchanged at the key's token endpoint for a short-lived access token
//! (the OAuth 2.0 JWT bearer grant). The token is cached and refreshed shortly before it expires.

use crate::api::files::ServiceAccountKey;
use crate::api::OAUTH_SCOPES;
use crate::Result;
use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

/// Claims of the JWT assertion sent to the token endpoint.
#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Hands out access tokens for the service account, fetching a new one only when the cached token
/// is about to expire.
#[derive(Debug)]
pub(crate) struct TokenProvider {
    key: ServiceAccountKey,
    client: reqwest::Client,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub(crate) async fn load(credentials: &Path, client: reqwest::Client) -> Result<Self> {
        let key = ServiceAccountKey::load(credentials).await.with_context(|| {
            format!(
                "Unable to load the service account credentials at {}",
                credentials.display()
            )
        })?;
        debug!("Loaded service account {}", key.client_email());
        Ok(Self {
            key,
            client,
            cached: Mutex::new(None),
        })
    }

    /// Returns a valid access token, refreshing it if needed.
    pub(crate) async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.token.clone());
            }
        }
        let fresh = self.fetch().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            iss: self.key.client_email(),
            scope: OAUTH_SCOPES.join(" "),
            aud: self.key.token_uri(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id().map(str::to_string);
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key().as_bytes())
            .context("The service account private key is not a valid RSA PEM key")?;
        encode(&header, &claims, &encoding_key).context("Unable to sign the JWT assertion")
    }

    async fn fetch(&self) -> Result<AccessToken> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;
        debug!("Requesting an access token from {}", self.key.token_uri());

        let response = self
            .client
            .post(self.key.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("Failed to send the token request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            bail!("The token endpoint responded with status {status}: {body}");
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse the token response")?;

        Ok(AccessToken {
            token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}
