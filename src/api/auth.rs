use axum::{
    Extension,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::{Res, api::SharedState, utils};

/// Starts an authorization flow and redirects the browser to Spotify.
///
/// A fresh CSRF `state` and PKCE verifier are recorded for the flow; the
/// callback must present the same `state` to complete it.
pub async fn auth(Extension(state): Extension<SharedState>) -> Res<Response> {
    let flow = state.flows.begin().await;
    let challenge = utils::generate_code_challenge(&flow.code_verifier);
    let url = state.spotify.authorize_url(&flow.state, &challenge)?;

    info!("Redirecting to Spotify authorization page");
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
