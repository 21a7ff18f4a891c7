//! OAuth2 service-account flow (JWT bearer grant) for the Sheets API.

use std::time::{Duration, Instant};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error};

use super::LedgerError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
// Refresh this long before Google says the token expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize, PartialEq, Eq)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS as u64
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

pub struct TokenProvider {
    service_account_email: String,
    key: EncodingKey,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(service_account_email: &str, private_key_pem: &str, client: Client) -> Result<Self, LedgerError> {
        Ok(Self {
            service_account_email: service_account_email.to_string(),
            key: EncodingKey::from_rsa_pem(private_key_pem.as_bytes())?,
            client,
            cached: Mutex::new(None),
        })
    }

    /// A bearer token for the Sheets API, fetched again only when the cached one is about to expire.
    pub async fn access_token(&self) -> Result<String, LedgerError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let assertion = self.signed_assertion(chrono::Utc::now().timestamp())?;
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            error!("Service account token request failed: {} {}", status, message);
            return Err(LedgerError::Api { status, message });
        }

        let token = response.json::<TokenResponse>().await?;
        debug!("Fetched service account token valid for {}s", token.expires_in);

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    fn signed_assertion(&self, issued_at: i64) -> Result<String, LedgerError> {
        let claims = assertion_claims(&self.service_account_email, issued_at);
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }
}

fn assertion_claims(service_account_email: &str, issued_at: i64) -> AssertionClaims<'_> {
    AssertionClaims {
        iss: service_account_email,
        scope: SHEETS_SCOPE,
        aud: TOKEN_URL,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_claims() {
        let claims = assertion_claims("roulette@example.iam.gserviceaccount.com", 1_700_000_000);
        assert_eq!(claims.aud, TOKEN_URL);
        assert_eq!(claims.scope, SHEETS_SCOPE);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_rejects_non_pem_key() {
        let result = TokenProvider::new("roulette@example.iam.gserviceaccount.com", "not a key", Client::new());
        assert!(matches!(result, Err(LedgerError::Token(_))));
    }

    #[test]
    fn test_token_response_defaults_expiry() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"ya29.abc","token_type":"Bearer"}"#).unwrap();
        assert_eq!(token.access_token, "ya29.abc");
        assert_eq!(token.expires_in, 3600);
    }
}
