//! # API Module
//!
//! HTTP endpoints of the proxy. Every handler receives the shared
//! [`AppState`] through an axum `Extension` and returns either JSON or an
//! [`Error`](crate::Error), which renders as `{"error": "<message>"}`.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`auth`] - `GET /spotify/auth`, redirects to Spotify's authorization page
//! - [`callback`] - `GET /spotify/callback`, completes the authorization-code
//!   flow and stores the token pair
//!
//! ### Listening state
//!
//! - [`listening_state`] - `GET /spotify`, top tracks, now playing and hints
//!   about the playback endpoints
//!
//! ### Playback
//!
//! - [`pause`] - `PUT /spotify/pause`
//! - [`play`] - `PUT /spotify/play/{track_id}`
//!
//! ### Monitoring
//!
//! - [`health`] - `GET /health`, status, version and whether a token is held
//!
//! ## Token handling
//!
//! Protected handlers ask the [`TokenManager`] for a valid access token before
//! calling Spotify. The token is refreshed only when it is about to expire, and
//! a failed refresh fails the request instead of proceeding with a stale token.

mod auth;
mod callback;
mod health;
mod listening;
mod playback;

use std::sync::Arc;

pub use auth::auth;
pub use callback::{AUTHENTICATED_MESSAGE, CallbackParams, callback};
pub use health::health;
pub use listening::listening_state;
pub use playback::{PAUSED_MESSAGE, pause, play};

use crate::{
    config::Config,
    management::{MemoryTokenStore, StateManager, TokenManager, TokenStore},
    spotify::{SpotifyApi, SpotifyClient},
    types::Token,
};

/// State shared by all handlers.
pub struct AppState {
    pub spotify: Arc<dyn SpotifyApi>,
    pub tokens: TokenManager,
    pub flows: StateManager,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Production state: the reqwest client and an in-memory token holder,
    /// seeded with the configured refresh token if there is one.
    pub fn from_config(config: &Config) -> SharedState {
        let spotify: Arc<dyn SpotifyApi> = Arc::new(SpotifyClient::new(config));
        let seed = config.refresh_token.clone().map(Token::from_refresh_token);
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new(seed));
        Self::new(spotify, store)
    }

    pub fn new(spotify: Arc<dyn SpotifyApi>, store: Arc<dyn TokenStore>) -> SharedState {
        Arc::new(AppState {
            tokens: TokenManager::new(store, Arc::clone(&spotify)),
            spotify,
            flows: StateManager::default(),
        })
    }
}
