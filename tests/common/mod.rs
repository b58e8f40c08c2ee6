#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::body::Body;
use serde_json::Value;
use sporlproxy::{
    Error, Res,
    api::{AppState, SharedState},
    management::{MemoryTokenStore, TokenStore},
    spotify::SpotifyApi,
    types::{Artist, CurrentlyPlaying, Token, TokenResponse, Track, now_secs},
};

pub const ALLOWED_ORIGIN: &str = "https://frontend.example.com";
pub const VALID_CODE: &str = "valid-code";
pub const GRANT_ACCESS_TOKEN: &str = "granted-access";
pub const GRANT_REFRESH_TOKEN: &str = "granted-refresh";
pub const INVALID_CODE_MESSAGE: &str = "invalid_grant: Invalid authorization code";

/// In-process stand-in for Spotify that records every call it receives.
#[derive(Default)]
pub struct FakeSpotify {
    pub top_tracks: Mutex<Vec<Track>>,
    pub playback: Mutex<Option<CurrentlyPlaying>>,
    pub catalog: Mutex<HashMap<String, Track>>,
    pub is_playing: Mutex<bool>,
    pub fail_refresh: Mutex<bool>,
    pub fail_top_tracks: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
    pub played: Mutex<Vec<Vec<String>>>,
    pub refreshes: Mutex<usize>,
    pub verifiers: Mutex<Vec<String>>,
}

impl FakeSpotify {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Top tracks are also added to the catalog used by track lookups.
    pub fn set_top_tracks(&self, tracks: Vec<Track>) {
        for t in &tracks {
            self.catalog.lock().unwrap().insert(t.id.clone(), t.clone());
        }
        *self.top_tracks.lock().unwrap() = tracks;
    }

    pub fn set_playback(&self, playback: Option<CurrentlyPlaying>) {
        *self.playback.lock().unwrap() = playback;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn refresh_count(&self) -> usize {
        *self.refreshes.lock().unwrap()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

fn upstream(status: u16, message: &str, reason: Option<&str>) -> Error {
    Error::Upstream {
        status,
        message: message.to_string(),
        reason: reason.map(str::to_string),
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Res<String> {
        Ok(format!(
            "https://accounts.example.com/authorize?response_type=code&state={state}&code_challenge={code_challenge}"
        ))
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Res<TokenResponse> {
        self.record("exchange_code");
        self.verifiers.lock().unwrap().push(code_verifier.to_string());
        if code != VALID_CODE {
            return Err(upstream(400, INVALID_CODE_MESSAGE, None));
        }
        Ok(TokenResponse {
            access_token: GRANT_ACCESS_TOKEN.to_string(),
            token_type: Some("Bearer".to_string()),
            scope: Some("user-top-read".to_string()),
            expires_in: 3600,
            refresh_token: Some(GRANT_REFRESH_TOKEN.to_string()),
        })
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Res<TokenResponse> {
        self.record("refresh_token");
        tokio::task::yield_now().await;
        if *self.fail_refresh.lock().unwrap() {
            return Err(upstream(400, "invalid_grant: Refresh token revoked", None));
        }
        let mut count = self.refreshes.lock().unwrap();
        *count += 1;
        Ok(TokenResponse {
            access_token: format!("refreshed-{}", *count),
            token_type: Some("Bearer".to_string()),
            scope: None,
            expires_in: 3600,
            refresh_token: None,
        })
    }

    async fn top_tracks(&self, _access_token: &str, _limit: usize) -> Res<Vec<Track>> {
        self.record("top_tracks");
        if *self.fail_top_tracks.lock().unwrap() {
            return Err(upstream(503, "Service unavailable", None));
        }
        Ok(self.top_tracks.lock().unwrap().clone())
    }

    async fn currently_playing(&self, _access_token: &str) -> Res<Option<CurrentlyPlaying>> {
        self.record("currently_playing");
        Ok(self.playback.lock().unwrap().clone())
    }

    async fn track(&self, _access_token: &str, track_id: &str) -> Res<Track> {
        self.record("track");
        self.catalog
            .lock()
            .unwrap()
            .get(track_id)
            .cloned()
            .ok_or_else(|| upstream(400, "Invalid base62 id", None))
    }

    async fn pause(&self, _access_token: &str) -> Res<()> {
        self.record("pause");
        let mut playing = self.is_playing.lock().unwrap();
        if !*playing {
            return Err(upstream(
                403,
                "Player command failed: Restriction violated",
                Some("ALREADY_PAUSED"),
            ));
        }
        *playing = false;
        Ok(())
    }

    async fn play(&self, _access_token: &str, uris: Vec<String>) -> Res<()> {
        self.record("play");
        self.played.lock().unwrap().push(uris);
        *self.is_playing.lock().unwrap() = true;
        Ok(())
    }
}

pub fn track(id: &str, name: &str, artist: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:track:{id}"),
        artists: vec![Artist {
            name: artist.to_string(),
        }],
    }
}

pub fn tracks(count: usize) -> Vec<Track> {
    (1..=count)
        .map(|i| track(&format!("id{i}"), &format!("Song {i}"), &format!("Artist {i}")))
        .collect()
}

pub fn fresh_token(access: &str) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: "stored-refresh".to_string(),
        scope: "user-top-read".to_string(),
        expires_in: 3600,
        obtained_at: now_secs(),
    }
}

pub fn expired_token(access: &str) -> Token {
    Token {
        obtained_at: now_secs() - 7200,
        ..fresh_token(access)
    }
}

pub fn state_with(fake: &Arc<FakeSpotify>, token: Option<Token>) -> SharedState {
    let spotify: Arc<dyn SpotifyApi> = Arc::clone(fake) as Arc<dyn SpotifyApi>;
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new(token));
    AppState::new(spotify, store)
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
