/*
 * Credentials for the spreadsheet gateway.
 *
 * The credentials file is a Google service account key with the target
 * `spreadsheet_id` added to it. Access tokens come from the OAuth 2.0
 * JWT-bearer grant; a literal `access_token` in the file skips the exchange.
 */

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AuthError;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Credentials {
    pub spreadsheet_id: String,
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub access_token: Option<String>,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
}

impl Claims {
    pub fn new(client_email: &str, token_uri: &str, now: DateTime<Utc>) -> Self {
        Self {
            iss: client_email.to_string(),
            scope: SHEETS_SCOPE.to_string(),
            aud: token_uri.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
        }
    }
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let contents =
            fs::read_to_string(path).map_err(|source| AuthError::NotFound {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&contents).map_err(|source| AuthError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Signed RS256 assertion for the token endpoint.
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let (email, key) = match (&self.client_email, &self.private_key) {
            (Some(email), Some(key)) => (email, key),
            _ => return Err(AuthError::Incomplete),
        };
        let claims = Claims::new(email, &self.token_uri, now);
        let key = EncodingKey::from_rsa_pem(key.as_bytes())?;
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &key,
        )?)
    }

    /// Bearer token for the Sheets API.
    pub fn access_token(
        &self,
        http: &reqwest::blocking::Client,
    ) -> Result<String, AuthError> {
        if let Some(token) = &self.access_token {
            debug!("using access token from credentials file");
            return Ok(token.clone());
        }

        let assertion = self.assertion(Utc::now())?;
        info!(token_uri = %self.token_uri, "exchanging service account assertion");
        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AuthError::Exchange(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        response
            .json::<TokenResponse>()
            .map(|t| t.access_token)
            .map_err(|e| AuthError::Exchange(e.to_string()))
    }
}
