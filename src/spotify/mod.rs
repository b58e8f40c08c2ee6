//! # Spotify Integration Module
//!
//! This module is the only place that talks to Spotify. It covers the two
//! halves of the Spotify platform the proxy depends on:
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! SpotifyApi trait
//!     ├── Authentication (authorize URL, code exchange, refresh)
//!     ├── Tracks (top tracks, track lookup)
//!     └── Player (currently playing, pause, play)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! accounts.spotify.com / api.spotify.com
//! ```
//!
//! Handlers and the token holder only see [`SpotifyApi`], so tests can swap in
//! a fake upstream. [`SpotifyClient`] is the production implementation.
//!
//! ## Error Handling
//!
//! Every non-success response is turned into [`Error::Upstream`] carrying the
//! status code and the upstream message verbatim. Both error body flavours are
//! understood:
//! - Web API: `{"error": {"status": 404, "message": "Invalid id", "reason": ...}}`
//! - Accounts service: `{"error": "invalid_grant", "error_description": "..."}`
//!
//! Nothing is retried.

pub mod auth;
pub mod player;
pub mod tracks;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::{
    Error, Res,
    config::Config,
    types::{ApiErrorBody, CurrentlyPlaying, OAuthErrorBody, TokenResponse, Track},
};

/// Permissions requested during authorization.
pub const SCOPES: [&str; 3] = [
    "user-top-read",
    "user-read-currently-playing",
    "user-modify-playback-state",
];

/// Operations the proxy needs from Spotify.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// URL of the authorization page for a flow identified by `state`.
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Res<String>;

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Res<TokenResponse>;

    async fn refresh_token(&self, refresh_token: &str) -> Res<TokenResponse>;

    async fn top_tracks(&self, access_token: &str, limit: usize) -> Res<Vec<Track>>;

    /// `None` when nothing is playing (Spotify answers 204).
    async fn currently_playing(&self, access_token: &str) -> Res<Option<CurrentlyPlaying>>;

    async fn track(&self, access_token: &str, track_id: &str) -> Res<Track>;

    async fn pause(&self, access_token: &str) -> Res<()>;

    async fn play(&self, access_token: &str, uris: Vec<String>) -> Res<()>;
}

/// reqwest-backed [`SpotifyApi`].
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    api_url: String,
    auth_url: String,
    token_url: String,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Self {
        SpotifyClient {
            http: Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Res<String> {
        self.build_authorize_url(state, code_challenge)
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Res<TokenResponse> {
        self.request_code_grant(code, code_verifier).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Res<TokenResponse> {
        self.request_refresh_grant(refresh_token).await
    }

    async fn top_tracks(&self, access_token: &str, limit: usize) -> Res<Vec<Track>> {
        self.get_top_tracks(access_token, limit).await
    }

    async fn currently_playing(&self, access_token: &str) -> Res<Option<CurrentlyPlaying>> {
        self.get_currently_playing(access_token).await
    }

    async fn track(&self, access_token: &str, track_id: &str) -> Res<Track> {
        self.get_track(access_token, track_id).await
    }

    async fn pause(&self, access_token: &str) -> Res<()> {
        self.pause_playback(access_token).await
    }

    async fn play(&self, access_token: &str, uris: Vec<String>) -> Res<()> {
        self.start_playback(access_token, uris).await
    }
}

/// Passes success responses through and converts anything else into
/// [`Error::Upstream`].
pub(crate) async fn check_status(res: Response) -> Res<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    Err(upstream_error(status, &body))
}

/// Builds an [`Error::Upstream`] from a Spotify error response body.
pub fn upstream_error(status: StatusCode, body: &str) -> Error {
    let (message, reason) = if let Ok(api) = serde_json::from_str::<ApiErrorBody>(body) {
        (api.error.message, api.error.reason)
    } else if let Ok(oauth) = serde_json::from_str::<OAuthErrorBody>(body) {
        let message = match oauth.error_description {
            Some(description) if !description.is_empty() => {
                format!("{}: {}", oauth.error, description)
            }
            _ => oauth.error,
        };
        (message, None)
    } else {
        (body.trim().to_string(), None)
    };

    let message = if message.is_empty() {
        format!("Spotify responded with status {status}")
    } else {
        message
    };

    Error::Upstream {
        status: status.as_u16(),
        message,
        reason,
    }
}
