use axum::{Extension, Json, extract::Path};
use tracing::{debug, info};

use crate::{Res, api::SharedState, types::Message};

pub const PAUSED_MESSAGE: &str = "Playback paused.";

/// Player error reason Spotify returns when pausing a paused player.
const ALREADY_PAUSED: &str = "ALREADY_PAUSED";

pub async fn pause(Extension(state): Extension<SharedState>) -> Res<Json<Message>> {
    let token = state.tokens.get_valid_token().await?;

    match state.spotify.pause(&token).await {
        Ok(()) => info!("Playback paused"),
        Err(e) if e.has_reason(ALREADY_PAUSED) => debug!("Playback was already paused"),
        Err(e) => return Err(e),
    }

    Ok(Json(Message::new(PAUSED_MESSAGE)))
}

/// Looks the track up first; an unknown ID fails before any play command.
pub async fn play(
    Path(track_id): Path<String>,
    Extension(state): Extension<SharedState>,
) -> Res<Json<Message>> {
    let token = state.tokens.get_valid_token().await?;

    let track = state.spotify.track(&token, &track_id).await?;
    state.spotify.play(&token, vec![track.uri.clone()]).await?;

    info!("Playing {} ({})", track.name, track.uri);
    Ok(Json(Message::new(format!("Playing: {}", track.name))))
}
