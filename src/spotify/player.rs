use reqwest::StatusCode;

use crate::{
    Error, Res,
    spotify::SpotifyClient,
    types::{CurrentlyPlaying, PlayRequest},
};

use super::check_status;

impl SpotifyClient {
    pub async fn get_currently_playing(&self, access_token: &str) -> Res<Option<CurrentlyPlaying>> {
        let res = self
            .http
            .get(self.endpoint("/me/player/currently-playing"))
            .bearer_auth(access_token)
            .send()
            .await?;

        let res = check_status(res).await?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = res.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let playback: CurrentlyPlaying =
            serde_json::from_str(&body).map_err(|e| Error::Upstream {
                status: StatusCode::BAD_GATEWAY.as_u16(),
                message: format!("Unexpected currently-playing payload: {e}"),
                reason: None,
            })?;
        Ok(Some(playback))
    }

    pub async fn pause_playback(&self, access_token: &str) -> Res<()> {
        let res = self
            .http
            .put(self.endpoint("/me/player/pause"))
            .bearer_auth(access_token)
            .body("")
            .send()
            .await?;

        check_status(res).await?;
        Ok(())
    }

    /// Starts playback of `uris` on the user's active device.
    ///
    /// Fails with reason `NO_ACTIVE_DEVICE` when no Spotify client is open.
    pub async fn start_playback(&self, access_token: &str, uris: Vec<String>) -> Res<()> {
        let res = self
            .http
            .put(self.endpoint("/me/player/play"))
            .bearer_auth(access_token)
            .json(&PlayRequest { uris })
            .send()
            .await?;

        check_status(res).await?;
        Ok(())
    }
}
