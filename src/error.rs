use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{} not found: {source}", path.display())]
    NotFound {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Error parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{field} offset of {days} days is out of calendar range")]
    DateOutOfRange { field: String, days: i64 },

    #[error("Amount of line item \"{description}\" or the invoice total is too large")]
    AmountOutOfRange { description: String },
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("{items} line items do not fit the invoice grid (at most {max})")]
    Capacity { items: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Credentials file {} not found: {source}", path.display())]
    NotFound {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Error parsing credentials {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Credentials contain no access token or service account key")]
    Incomplete,

    #[error("Invalid service account key: {source}")]
    Key {
        #[from]
        source: jsonwebtoken::errors::Error,
    },

    #[error("Token exchange failed: {0}")]
    Exchange(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Rate limit exceeded (HTTP {status}): {body}")]
    RateLimited { status: u16, body: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("Unexpected response: {0}")]
    Parse(String),

    #[error("{source}")]
    Auth {
        #[from]
        source: AuthError,
    },
}

impl GatewayError {
    /// Classify a failed response, recognising quota errors by status or body.
    pub fn from_response(status: u16, body: String) -> Self {
        if status == 429
            || body.contains("RATE_LIMIT_EXCEEDED")
            || body.contains("429")
        {
            GatewayError::RateLimited { status, body }
        } else {
            GatewayError::Http { status, body }
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, GatewayError::RateLimited { .. })
    }
}
