use serde::{Deserialize, Serialize};

/// Number of entries returned in `topTracks`.
pub const TOP_TRACKS_LIMIT: usize = 10;

/// Shown when Spotify lists a track without any artist.
pub const UNKNOWN_ARTIST: &str = "Unknown artist";

pub const PAUSE_ACTION: &str = "PUT /spotify/pause";
pub const PLAY_ACTION: &str =
    "PUT /spotify/play/{trackId} (replace {trackId} with a track ID from topTracks)";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Seconds before the upstream expiry at which a token counts as expired.
    pub const EXPIRY_MARGIN_SECS: u64 = 240;

    /// Builds a token from a grant response obtained at `obtained_at`.
    ///
    /// Spotify may omit the refresh token on refresh grants; `previous_refresh`
    /// is kept in that case.
    pub fn from_response(
        response: TokenResponse,
        previous_refresh: Option<&str>,
        obtained_at: u64,
    ) -> Self {
        let refresh_token = response
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default();

        Token {
            access_token: response.access_token,
            refresh_token,
            scope: response.scope.unwrap_or_default(),
            expires_in: response.expires_in,
            obtained_at,
        }
    }

    /// A token holding only a refresh token, expired from the start.
    pub fn from_refresh_token(refresh_token: impl Into<String>) -> Self {
        Token {
            access_token: String::new(),
            refresh_token: refresh_token.into(),
            scope: String::new(),
            expires_in: 0,
            obtained_at: 0,
        }
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        self.access_token.is_empty()
            || now + Self::EXPIRY_MARGIN_SECS >= self.obtained_at + self.expires_in
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_secs())
    }
}

pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_expires_in() -> u64 {
    3600
}

// Upstream payloads. Only the fields the proxy reads are declared.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

impl Track {
    pub fn first_artist(&self) -> &str {
        first_artist_name(&self.artists)
    }
}

fn first_artist_name(artists: &[Artist]) -> &str {
    artists
        .first()
        .map(|a| a.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_ARTIST)
}

/// Item of the currently playing endpoint.
///
/// Local files come back with `"id": null` and `"is_local": true`, so unlike
/// [`Track`] the id is optional here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayingItem {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

impl PlayingItem {
    pub fn first_artist(&self) -> &str {
        first_artist_name(&self.artists)
    }
}

impl From<Track> for PlayingItem {
    fn from(track: Track) -> Self {
        PlayingItem {
            id: Some(track.id),
            name: track.name,
            uri: Some(track.uri),
            is_local: false,
            artists: track.artists,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksResponse {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<PlayingItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    pub uris: Vec<String>,
}

// Response shapes of the proxy itself.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub uri: String,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        TrackSummary {
            id: track.id.clone(),
            name: track.name.clone(),
            artist: track.first_artist().to_string(),
            uri: track.uri.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub name: String,
    pub artist: String,
    pub is_playing: bool,
}

impl NowPlaying {
    /// `None` when nothing is playing or Spotify returned no item.
    pub fn from_playback(playback: Option<&CurrentlyPlaying>) -> Option<Self> {
        let playback = playback?;
        let item = playback.item.as_ref()?;
        Some(NowPlaying {
            name: item.name.clone(),
            artist: item.first_artist().to_string(),
            is_playing: playback.is_playing,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actions {
    pub pause: String,
    pub play: String,
}

impl Default for Actions {
    fn default() -> Self {
        Actions {
            pause: PAUSE_ACTION.to_string(),
            play: PLAY_ACTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListeningState {
    pub top_tracks: Vec<TrackSummary>,
    pub now_playing: Option<NowPlaying>,
    pub actions: Actions,
}

impl ListeningState {
    pub fn new(top_tracks: &[Track], playback: Option<&CurrentlyPlaying>) -> Self {
        ListeningState {
            top_tracks: top_tracks
                .iter()
                .take(TOP_TRACKS_LIMIT)
                .map(TrackSummary::from)
                .collect(),
            now_playing: NowPlaying::from_playback(playback),
            actions: Actions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: message.into(),
        }
    }
}

/// Web API error body: `{"error": {"status": 404, "message": "...", "reason": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// OAuth error body: `{"error": "invalid_grant", "error_description": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}
