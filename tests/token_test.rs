mod common;

use std::sync::Arc;

use sporlproxy::{
    Error,
    management::{MemoryTokenStore, TokenManager, TokenStore},
    spotify::SpotifyApi,
    types::{Token, TokenResponse},
};

use common::*;

fn manager(fake: &Arc<FakeSpotify>, token: Option<Token>) -> (TokenManager, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new(token));
    let spotify: Arc<dyn SpotifyApi> = Arc::clone(fake) as Arc<dyn SpotifyApi>;
    let manager = TokenManager::new(Arc::clone(&store) as Arc<dyn TokenStore>, spotify);
    (manager, store)
}

#[test]
fn test_token_expiry_margin() {
    let token = Token {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        scope: String::new(),
        expires_in: 3600,
        obtained_at: 1_000,
    };

    assert!(!token.is_expired_at(1_000));
    assert!(!token.is_expired_at(1_000 + 3600 - Token::EXPIRY_MARGIN_SECS - 1));
    assert!(token.is_expired_at(1_000 + 3600 - Token::EXPIRY_MARGIN_SECS));
    assert!(token.is_expired_at(1_000 + 3600));
}

#[test]
fn test_refresh_only_token_is_expired() {
    let token = Token::from_refresh_token("seed");
    assert!(token.is_expired());
    assert_eq!(token.refresh_token, "seed");
}

#[test]
fn test_from_response_keeps_previous_refresh_token() {
    let response = TokenResponse {
        access_token: "new".to_string(),
        token_type: None,
        scope: None,
        expires_in: 3600,
        refresh_token: None,
    };

    let token = Token::from_response(response.clone(), Some("old-refresh"), 42);
    assert_eq!(token.access_token, "new");
    assert_eq!(token.refresh_token, "old-refresh");
    assert_eq!(token.obtained_at, 42);

    let rotated = TokenResponse {
        refresh_token: Some("rotated".to_string()),
        ..response
    };
    let token = Token::from_response(rotated, Some("old-refresh"), 42);
    assert_eq!(token.refresh_token, "rotated");
}

#[tokio::test]
async fn test_fresh_token_is_used_without_refresh() {
    let fake = FakeSpotify::new();
    let (manager, _) = manager(&fake, Some(fresh_token("fresh")));

    let access = manager.get_valid_token().await.unwrap();

    assert_eq!(access, "fresh");
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_stored() {
    let fake = FakeSpotify::new();
    let (manager, store) = manager(&fake, Some(expired_token("stale")));

    let access = manager.get_valid_token().await.unwrap();

    assert_eq!(access, "refreshed-1");
    let stored = store.get().await.unwrap();
    assert_eq!(stored.access_token, "refreshed-1");
    assert_eq!(stored.refresh_token, "stored-refresh");
    assert!(!stored.is_expired());
}

#[tokio::test]
async fn test_refresh_failure_leaves_token_untouched() {
    let fake = FakeSpotify::new();
    *fake.fail_refresh.lock().unwrap() = true;
    let original = expired_token("stale");
    let (manager, store) = manager(&fake, Some(original.clone()));

    let result = manager.refresh().await;

    assert!(matches!(result, Err(Error::TokenRefresh(_))));
    assert_eq!(store.get().await, Some(original));
}

#[tokio::test]
async fn test_missing_token_is_not_authenticated() {
    let fake = FakeSpotify::new();
    let (manager, _) = manager(&fake, None);

    assert!(matches!(
        manager.get_valid_token().await,
        Err(Error::NotAuthenticated)
    ));
    assert!(matches!(manager.refresh().await, Err(Error::NotAuthenticated)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_seeded_refresh_token_is_exchanged_on_first_use() {
    let fake = FakeSpotify::new();
    let (manager, store) = manager(&fake, Some(Token::from_refresh_token("seed")));

    let access = manager.get_valid_token().await.unwrap();

    assert_eq!(access, "refreshed-1");
    assert_eq!(store.get().await.unwrap().refresh_token, "seed");
}

#[tokio::test]
async fn test_seeded_refresh_token_is_not_authenticated_until_refreshed() {
    let fake = FakeSpotify::new();
    let (manager, _store) = manager(&fake, Some(Token::from_refresh_token("seed")));
    assert!(!manager.is_authenticated().await);

    manager.get_valid_token().await.unwrap();

    assert!(manager.is_authenticated().await);
}

#[tokio::test]
async fn test_failed_seed_refresh_stays_unauthenticated() {
    let fake = FakeSpotify::new();
    *fake.fail_refresh.lock().unwrap() = true;
    let (manager, _store) = manager(&fake, Some(Token::from_refresh_token("seed")));

    assert!(manager.get_valid_token().await.is_err());

    assert!(!manager.is_authenticated().await);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_refresh() {
    let fake = FakeSpotify::new();
    let (manager, _) = manager(&fake, Some(expired_token("stale")));

    let (a, b, c) = tokio::join!(
        manager.get_valid_token(),
        manager.get_valid_token(),
        manager.get_valid_token()
    );

    assert_eq!(a.unwrap(), "refreshed-1");
    assert_eq!(b.unwrap(), "refreshed-1");
    assert_eq!(c.unwrap(), "refreshed-1");
    assert_eq!(fake.refresh_count(), 1);
}

#[tokio::test]
async fn test_store_grant_overwrites_token() {
    let fake = FakeSpotify::new();
    let (manager, store) = manager(&fake, Some(fresh_token("old")));

    let grant = fake.exchange_code(VALID_CODE, "verifier").await.unwrap();
    manager.store_grant(grant).await.unwrap();

    let stored = store.get().await.unwrap();
    assert_eq!(stored.access_token, GRANT_ACCESS_TOKEN);
    assert_eq!(stored.refresh_token, GRANT_REFRESH_TOKEN);
}
