use reqwest::Url;

use crate::{
    Error, Res,
    spotify::SpotifyClient,
    types::{TopTracksResponse, Track},
};

use super::check_status;

impl SpotifyClient {
    /// Retrieves the user's top tracks, in Spotify's ranking order.
    ///
    /// # Arguments
    ///
    /// * `access_token` - Token with the `user-top-read` scope
    /// * `limit` - Maximum number of tracks to return (1-50)
    pub async fn get_top_tracks(&self, access_token: &str, limit: usize) -> Res<Vec<Track>> {
        let res = self
            .http
            .get(self.endpoint("/me/top/tracks"))
            .query(&[("limit", limit)])
            .bearer_auth(access_token)
            .send()
            .await?;

        let body = check_status(res).await?.json::<TopTracksResponse>().await?;
        Ok(body.items)
    }

    /// Looks up a single track by its Spotify ID.
    ///
    /// The ID is sent as one path segment, so characters like `/` or `?` in
    /// user input cannot reach another endpoint. An unknown or malformed ID
    /// yields Spotify's own error message.
    pub async fn get_track(&self, access_token: &str, track_id: &str) -> Res<Track> {
        let mut url = Url::parse(&self.endpoint("/tracks"))
            .map_err(|e| Error::config(format!("invalid API URL {}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("API URL cannot be a base: {}", self.api_url)))?
            .push(track_id);

        let res = self.http.get(url).bearer_auth(access_token).send().await?;

        let track = check_status(res).await?.json::<Track>().await?;
        Ok(track)
    }
}
