use reqwest::Url;

use crate::{Error, Res, spotify::SpotifyClient, types::TokenResponse};

use super::{SCOPES, check_status};

impl SpotifyClient {
    /// Builds the Spotify authorization URL for a new authorization-code flow.
    ///
    /// The URL carries the application's client ID, the registered redirect
    /// URI, the requested [`SCOPES`], the CSRF `state` value and the PKCE
    /// S256 challenge derived from the flow's code verifier.
    ///
    /// # Arguments
    ///
    /// * `state` - Opaque value Spotify echoes back to the callback
    /// * `code_challenge` - Base64url SHA256 digest of the code verifier
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configured authorization URL cannot be
    /// parsed.
    ///
    /// # Example
    ///
    /// ```
    /// let url = client.build_authorize_url("xyz", &challenge)?;
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn build_authorize_url(&self, state: &str, code_challenge: &str) -> Res<String> {
        let scope = SCOPES.join(" ");
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge),
            ],
        )
        .map_err(|e| Error::config(format!("invalid authorization URL {}: {e}", self.auth_url)))?;

        Ok(url.into())
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    ///
    /// Completes the authorization-code flow. The application authenticates
    /// with its client secret over HTTP Basic, and the PKCE code verifier
    /// proves that this server started the flow the code belongs to.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code received on the callback
    /// * `code_verifier` - PKCE verifier generated when the flow started
    ///
    /// # Errors
    ///
    /// Common failures include:
    /// - An invalid, expired or already used code (`invalid_grant`)
    /// - A redirect URI that doesn't match the one used for authorization
    /// - Network connectivity issues
    ///
    /// The upstream message is kept verbatim in [`Error::Upstream`].
    ///
    /// # Security Note
    ///
    /// Authorization codes are single-use and expire after a few minutes.
    pub async fn request_code_grant(&self, code: &str, code_verifier: &str) -> Res<TokenResponse> {
        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("code_verifier", code_verifier),
            ])
            .send()
            .await?;

        let token = check_status(res).await?.json::<TokenResponse>().await?;
        Ok(token)
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// Spotify may or may not rotate the refresh token; when the response
    /// doesn't contain one, the caller keeps using the previous one.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Upstream`] if the refresh token was revoked or is
    /// invalid, or with [`Error::Http`] on network failures.
    pub async fn request_refresh_grant(&self, refresh_token: &str) -> Res<TokenResponse> {
        let res = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let token = check_status(res).await?.json::<TokenResponse>().await?;
        Ok(token)
    }
}
