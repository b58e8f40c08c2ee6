use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::api::SharedState;

pub async fn health(Extension(state): Extension<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": state.tokens.is_authenticated().await,
    }))
}
