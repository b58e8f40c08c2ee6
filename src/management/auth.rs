use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::{
    Error, Res,
    spotify::SpotifyApi,
    types::{Token, TokenResponse, now_secs},
};

/// Where the current token pair lives.
///
/// The in-memory store is the only implementation today; a persistent store
/// only has to implement these two methods.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Option<Token>;

    async fn set(&self, token: Token) -> Res<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<Token>) -> Self {
        MemoryTokenStore {
            token: RwLock::new(token),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Option<Token> {
        self.token.read().await.clone()
    }

    async fn set(&self, token: Token) -> Res<()> {
        *self.token.write().await = Some(token);
        Ok(())
    }
}

pub struct TokenManager {
    store: Arc<dyn TokenStore>,
    spotify: Arc<dyn SpotifyApi>,
    refresh_lock: Mutex<()>,
}

impl TokenManager {
    pub fn new(store: Arc<dyn TokenStore>, spotify: Arc<dyn SpotifyApi>) -> Self {
        TokenManager {
            store,
            spotify,
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn current_token(&self) -> Option<Token> {
        self.store.get().await
    }

    /// Whether an access token has been issued, by a grant or a refresh.
    ///
    /// A token seeded only with a refresh token does not count until its
    /// first refresh succeeds.
    pub async fn is_authenticated(&self) -> bool {
        self.store
            .get()
            .await
            .is_some_and(|token| !token.access_token.is_empty())
    }

    /// Stores a token pair obtained from an authorization-code grant.
    pub async fn store_grant(&self, response: TokenResponse) -> Res<Token> {
        let token = Token::from_response(response, None, now_secs());
        self.store.set(token.clone()).await?;
        info!("Stored new Spotify token pair (scope: {})", token.scope);
        Ok(token)
    }

    /// Returns an access token that is not about to expire.
    ///
    /// The stored token is returned as is while it has more than
    /// [`Token::EXPIRY_MARGIN_SECS`] left; otherwise it is refreshed first.
    /// Concurrent callers wait for a single refresh instead of each issuing
    /// their own.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAuthenticated`] if no token has been obtained yet
    /// - [`Error::TokenRefresh`] if the refresh failed
    pub async fn get_valid_token(&self) -> Res<String> {
        let token = self.store.get().await.ok_or(Error::NotAuthenticated)?;
        if !token.is_expired() {
            return Ok(token.access_token);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = self.store.get().await {
            if !token.is_expired() {
                return Ok(token.access_token);
            }
        }

        let token = self.refresh().await?;
        Ok(token.access_token)
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// On success the stored token is overwritten; on failure the error is
    /// logged and the stored token is left untouched.
    pub async fn refresh(&self) -> Res<Token> {
        let current = self.store.get().await.ok_or(Error::NotAuthenticated)?;
        if current.refresh_token.is_empty() {
            return Err(Error::NotAuthenticated);
        }

        debug!("Refreshing Spotify access token");
        let response = match self.spotify.refresh_token(&current.refresh_token).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error refreshing token: {}", e);
                return Err(Error::TokenRefresh(e.to_string()));
            }
        };

        let token = Token::from_response(response, Some(&current.refresh_token), now_secs());
        self.store.set(token.clone()).await?;
        debug!("Access token refreshed, expires in {}s", token.expires_in);
        Ok(token)
    }
}
