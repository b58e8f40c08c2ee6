//! Spotify "now playing" proxy library
//!
//! This library backs a small HTTP service that signs in to the Spotify Web API
//! with the OAuth 2.0 authorization-code flow and exposes a handful of simplified
//! endpoints: the listener's top tracks, the currently playing track, and basic
//! playback control (pause / play a track).
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the `/spotify` routes and the health check
//! - `config` - Configuration loaded from environment variables and `.env`
//! - `error` - The shared error type and its JSON rendering
//! - `management` - Token holder and pending authorization flows
//! - `server` - Router construction, CORS and origin guard, serving
//! - `spotify` - Spotify Web API client (OAuth, tracks, player)
//! - `types` - Upstream payloads and the service's response shapes
//! - `utils` - PKCE and CSRF state helpers
//!
//! # Example
//!
//! ```
//! use sporlproxy::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> sporlproxy::Res<()> {
//!     let config = Config::from_env()?;
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every layer of the service (upstream client, token holder, handlers)
/// reports failures through [`Error`], which also knows how to render itself
/// as an HTTP response.
pub type Res<T> = std::result::Result<T, Error>;
