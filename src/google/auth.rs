use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each signed assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh tokens this long before Google says they expire
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Google service-account key, as found in a downloaded JSON key file
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub auth_provider_x509_cert_url: Option<String>,
    #[serde(default)]
    pub client_x509_cert_url: Option<String>,
    #[serde(default)]
    pub universe_domain: Option<String>,
}

// Keep the private key out of logs
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Read a JSON key file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading service-account key from {}", path.display());

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file {}", path.display()))?;

        serde_json::from_str(&contents).context("Invalid service-account key file")
    }

    /// PEM private key with escaped newlines (as found in env vars) restored
    pub fn private_key_pem(&self) -> String {
        self.private_key.replace("\\n", "\n")
    }

    fn signing_key(&self) -> Result<SigningKey<Sha256>> {
        let key = RsaPrivateKey::from_pkcs8_pem(&self.private_key_pem())
            .context("Service-account private key is not a valid PKCS#8 PEM")?;
        Ok(SigningKey::<Sha256>::new(key))
    }
}

/// Build a signed RS256 JWT assertion for the token endpoint
fn signed_assertion(
    key: &ServiceAccountKey,
    signing_key: &SigningKey<Sha256>,
    issued_at: DateTime<Utc>,
) -> Result<String> {
    let mut header = json!({ "alg": "RS256", "typ": "JWT" });
    if let Some(kid) = &key.private_key_id {
        header["kid"] = json!(kid);
    }

    let iat = issued_at.timestamp();
    let claims = json!({
        "iss": key.client_email,
        "scope": CLOUD_PLATFORM_SCOPE,
        "aud": key.token_uri,
        "iat": iat,
        "exp": iat + ASSERTION_LIFETIME_SECS,
    });

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
    );

    let signature = signing_key.sign(signing_input.as_bytes());

    Ok(format!(
        "{}.{}",
        signing_input,
        URL_SAFE_NO_PAD.encode(signature.to_bytes())
    ))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// OAuth2 access tokens for the Speech and Text-to-Speech APIs.
///
/// Tokens are exchanged with the JWT-bearer grant and cached until shortly
/// before they expire.
pub struct TokenProvider {
    key: ServiceAccountKey,
    signing_key: SigningKey<Sha256>,
    client: reqwest::Client,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    /// Parse the private key up front so bad credentials fail at startup
    pub fn new(key: ServiceAccountKey, client: reqwest::Client) -> Result<Self> {
        let signing_key = key.signing_key()?;

        info!("Google credentials loaded for {}", key.client_email);

        Ok(Self {
            key,
            signing_key,
            client,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Current access token, fetching a new one when needed
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.token.clone());
            }
        }

        let token = self.fetch().await?;
        let value = token.token.clone();
        *cached = Some(token);

        Ok(value)
    }

    async fn fetch(&self) -> Result<AccessToken> {
        let now = Utc::now();
        let assertion = signed_assertion(&self.key, &self.signing_key, now)?;

        debug!("Requesting access token from {}", self.key.token_uri);

        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("Token request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Token endpoint error {status}: {body}");
        }

        let token: TokenResponse = resp
            .json()
            .await
            .context("Invalid token endpoint response")?;

        Ok(AccessToken {
            token: token.access_token,
            expires_at: token_expiry(now, token.expires_in),
        })
    }
}

/// When a token issued at `now` should be refreshed. Never later than the
/// assertion lifetime, whatever the token endpoint reports.
fn token_expiry(now: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    let lifetime = expires_in
        .saturating_sub(EXPIRY_MARGIN_SECS)
        .clamp(0, ASSERTION_LIFETIME_SECS);

    now + Duration::seconds(lifetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};

    fn test_key() -> ServiceAccountKey {
        let mut rng = rsa::rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let pem = private.to_pkcs8_pem(LineEnding::LF).unwrap();

        ServiceAccountKey {
            key_type: Some("service_account".into()),
            project_id: Some("demo".into()),
            private_key_id: Some("kid-1".into()),
            private_key: pem.replace('\n', "\\n"),
            client_email: "bot@demo.iam.gserviceaccount.com".into(),
            client_id: None,
            auth_uri: None,
            token_uri: default_token_uri(),
            auth_provider_x509_cert_url: None,
            client_x509_cert_url: None,
            universe_domain: None,
        }
    }

    #[test]
    fn test_escaped_private_key_is_accepted() {
        let key = test_key();
        assert!(key.private_key.contains("\\n"));
        assert!(key.signing_key().is_ok());
    }

    #[test]
    fn test_assertion_claims() {
        let key = test_key();
        let signing_key = key.signing_key().unwrap();
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let jwt = signed_assertion(&key, &signing_key, issued_at).unwrap();
        let parts: Vec<&str> = jwt.split('.').collect();
        assert_eq!(parts.len(), 3);

        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[0]).unwrap()).unwrap();
        assert_eq!(header["alg"], "RS256");
        assert_eq!(header["kid"], "kid-1");

        let claims: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        assert_eq!(claims["iss"], "bot@demo.iam.gserviceaccount.com");
        assert_eq!(claims["aud"], DEFAULT_TOKEN_URI);
        assert_eq!(claims["scope"], CLOUD_PLATFORM_SCOPE);
        assert_eq!(claims["iat"], 1_700_000_000);
        assert_eq!(claims["exp"], 1_700_003_600);

        // 1024-bit key => 128-byte signature
        assert_eq!(URL_SAFE_NO_PAD.decode(parts[2]).unwrap().len(), 128);
    }

    #[test]
    fn test_token_expiry_keeps_margin() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(token_expiry(now, 3599), now + Duration::seconds(3539));
        assert_eq!(token_expiry(now, 30), now);
        assert_eq!(token_expiry(now, -5), now);
    }

    #[test]
    fn test_token_expiry_clamps_huge_lifetimes() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let limit = now + Duration::seconds(ASSERTION_LIFETIME_SECS);

        assert_eq!(token_expiry(now, i64::MAX), limit);
        assert_eq!(token_expiry(now, i64::MIN), now);
        assert_eq!(token_expiry(now, 10 * ASSERTION_LIFETIME_SECS), limit);
    }

    #[test]
    fn test_debug_hides_private_key() {
        let key = test_key();
        let printed = format!("{:?}", key);
        assert!(!printed.contains("PRIVATE KEY"));
        assert!(printed.contains("bot@demo"));
    }
}
