use reqwest::StatusCode;
use serde::Deserialize;

/// Everything a lifecycle call can fail with.
///
/// Multi-call operations are not atomic: when a later call fails, the
/// effect of earlier calls persists remotely and the caller is expected
/// to re-apply.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode admin API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("admin API rejected the request (HTTP {status}): {message}")]
    RemoteRejection { status: u16, message: String },
    #[error("malformed identity: {0}")]
    MalformedIdentity(String),
    #[error("missing configuration value: {0}")]
    MissingConfiguration(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("failed to load config file: {0}")]
    Config(String),
}

/// Body of a Garage admin API error response.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

impl Error {
    /// Build a rejection from a non-success status and the raw body.
    ///
    /// Garage answers with `{"code": ..., "message": ...}`; anything else is
    /// kept verbatim.
    pub fn rejection(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<RemoteErrorBody>(body) {
            Ok(RemoteErrorBody {
                code: Some(code),
                message,
            }) => format!("{}: {}", code, message),
            Ok(RemoteErrorBody { message, .. }) => message,
            Err(_) => body.trim().to_string(),
        };
        Error::RemoteRejection {
            status: status.as_u16(),
            message,
        }
    }

    /// The remote no longer recognizes the addressed object.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::RemoteRejection { status, .. } if *status == StatusCode::NOT_FOUND.as_u16()
        )
    }
}
