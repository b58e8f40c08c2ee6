use axum::{Extension, Json};
use tracing::debug;

use crate::{
    Res,
    api::SharedState,
    types::{ListeningState, TOP_TRACKS_LIMIT},
};

/// Top tracks, the currently playing track and hints about the playback
/// endpoints.
///
/// Both Spotify reads run concurrently; if either fails the whole request
/// fails and no partial result is returned.
pub async fn listening_state(
    Extension(state): Extension<SharedState>,
) -> Res<Json<ListeningState>> {
    let token = state.tokens.get_valid_token().await?;

    let (top_tracks, playback) = tokio::try_join!(
        state.spotify.top_tracks(&token, TOP_TRACKS_LIMIT),
        state.spotify.currently_playing(&token),
    )?;

    let listening = ListeningState::new(&top_tracks, playback.as_ref());
    debug!(
        "Listening state: {} top tracks, now playing: {}",
        listening.top_tracks.len(),
        listening.now_playing.is_some()
    );
    Ok(Json(listening))
}
