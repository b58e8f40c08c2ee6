//! Error type shared by the upstream client, the token holder and the HTTP
//! handlers.
//!
//! Every variant renders to the same JSON body, `{"error": "<message>"}`; only
//! the status code differs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Spotify answered with a non-success status.
    ///
    /// `message` is the upstream text, kept verbatim. `reason` is the player
    /// error reason (e.g. `NO_ACTIVE_DEVICE`) when Spotify sends one.
    #[error("{message}")]
    Upstream {
        status: u16,
        message: String,
        reason: Option<String>,
    },

    /// Transport or decoding failure talking to Spotify.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Not authenticated. Visit /spotify/auth first.")]
    NotAuthenticated,

    /// The stored refresh token could not be exchanged for a new access token.
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Invalid or expired authorization state.")]
    InvalidState,

    #[error("Missing authorization code.")]
    MissingCode,

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    /// Cross-origin request from an origin other than the configured one.
    #[error("Origin not allowed: {0}")]
    OriginNotAllowed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true for a player error carrying the given Spotify reason.
    pub fn has_reason(&self, expected: &str) -> bool {
        matches!(self, Error::Upstream { reason: Some(r), .. } if r == expected)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidState | Error::MissingCode | Error::AuthorizationDenied(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Error::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            Error::TokenRefresh(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }
        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
