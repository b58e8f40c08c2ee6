//! Configuration management for the Spotify proxy.
//!
//! This module handles loading configuration values from environment variables
//! and an optional `.env` file. It provides a single [`Config`] value holding
//! the Spotify application credentials, the OAuth redirect URI, the listening
//! port and the origin allowed to call the service from a browser.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. Application defaults (where applicable)

use std::{collections::HashMap, env};

use crate::{Error, Res};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://frontend-spotify-mu.vercel.app";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration of the proxy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Client ID of the Spotify application (`SPOTIFY_CLIENT_ID`).
    pub client_id: String,
    /// Client secret of the Spotify application (`SPOTIFY_CLIENT_SECRET`).
    pub client_secret: String,
    /// Callback URL registered with Spotify (`SPOTIFY_REDIRECT_URI`).
    pub redirect_uri: String,
    /// TCP port to listen on (`PORT`).
    pub port: u16,
    /// The single browser origin allowed to call the service (`ALLOWED_ORIGIN`).
    pub allowed_origin: String,
    /// Refresh token to start with instead of an empty holder
    /// (`SPOTIFY_REFRESH_TOKEN`).
    pub refresh_token: Option<String>,
    /// Base URL of the Web API (`SPOTIFY_API_URL`).
    pub api_url: String,
    /// Authorization page URL (`SPOTIFY_API_AUTH_URL`).
    pub auth_url: String,
    /// Token exchange URL (`SPOTIFY_API_TOKEN_URL`).
    pub token_url: String,
    /// Log level used when `RUST_LOG` does not say otherwise (`LOG_LEVEL`).
    pub log_level: String,
}

/// Loads environment variables from a `.env` file in the working directory.
///
/// A missing file is not an error; the process environment is then used as is.
/// Variables already present in the environment are never overridden.
///
/// # Errors
///
/// Returns an error string if the file exists but cannot be read or parsed.
///
/// # Example
///
/// ```
/// use sporlproxy::config;
///
/// if let Err(e) = config::load_env() {
///     eprintln!("Configuration error: {}", e);
/// }
/// ```
pub fn load_env() -> Result<(), String> {
    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(format!("failed to load .env file: {e}")),
    }
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if one of `SPOTIFY_CLIENT_ID`,
    /// `SPOTIFY_CLIENT_SECRET` or `SPOTIFY_REDIRECT_URI` is missing or empty,
    /// or if `PORT` is not a valid port number.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from a map of variables.
    pub fn from_map(vars: &HashMap<String, String>) -> Res<Self> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Builds the configuration using `lookup` to resolve variable names.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require =
            |key: &str| get(key).ok_or_else(|| Error::config(format!("{key} must be set")));

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::config(format!("PORT is not a valid port ({raw}): {e}")))?,
            None => DEFAULT_PORT,
        };

        let allowed_origin = normalize_origin(
            &get("ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
        )?;

        Ok(Config {
            client_id: require("SPOTIFY_CLIENT_ID")?,
            client_secret: require("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: require("SPOTIFY_REDIRECT_URI")?,
            port,
            allowed_origin,
            refresh_token: get("SPOTIFY_REFRESH_TOKEN"),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Returns the address the HTTP server binds to.
    ///
    /// The service listens on all interfaces; only the port is configurable.
    ///
    /// # Example
    ///
    /// ```
    /// let addr = config.server_addr(); // e.g., "0.0.0.0:5000"
    /// ```
    pub fn server_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Brings `raw` into the form browsers send in the `Origin` header:
/// lowercase scheme and host, no trailing slash.
///
/// # Errors
///
/// Returns [`Error::Config`] if the value carries a path, since no browser
/// origin could ever match it.
fn normalize_origin(raw: &str) -> Res<String> {
    let origin = raw.trim().trim_end_matches('/').to_ascii_lowercase();
    let has_path = origin
        .split_once("://")
        .is_none_or(|(_, host)| host.is_empty() || host.contains('/'));
    if has_path {
        return Err(Error::config(format!(
            "ALLOWED_ORIGIN must be scheme://host[:port], got {raw}"
        )));
    }
    Ok(origin)
}
