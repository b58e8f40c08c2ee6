use axum::{Extension, Json, extract::Query};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{Error, Res, api::SharedState, types::Message};

pub const AUTHENTICATED_MESSAGE: &str = "Authenticated! You can now use /spotify.";

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by Spotify when the user declined, e.g. `access_denied`.
    pub error: Option<String>,
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(shared_state): Extension<SharedState>,
) -> Res<Json<Message>> {
    // Take the flow first so a state value can never be replayed.
    let code_verifier = match params.state.as_deref() {
        Some(flow_state) => shared_state.flows.complete(flow_state).await,
        None => None,
    };

    let Some(code_verifier) = code_verifier else {
        warn!("Callback with unknown or expired state");
        return Err(Error::InvalidState);
    };

    if let Some(error) = params.error {
        return Err(Error::AuthorizationDenied(error));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(Error::MissingCode);
    };

    let grant = shared_state
        .spotify
        .exchange_code(&code, &code_verifier)
        .await?;
    shared_state.tokens.store_grant(grant).await?;

    info!("Authorization completed");
    Ok(Json(Message::new(AUTHENTICATED_MESSAGE)))
}
