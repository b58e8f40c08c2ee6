use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::{types::now_secs, utils};

/// How long a started authorization flow may take to come back.
pub const FLOW_TTL_SECS: u64 = 600;

/// Upper bound on flows waiting for their callback.
pub const MAX_PENDING_FLOWS: usize = 32;

#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub code_verifier: String,
    pub created_at: u64,
}

/// A started authorization flow, as handed to the redirect.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    pub state: String,
    pub code_verifier: String,
}

/// Authorization flows started by `/spotify/auth` and not yet completed.
///
/// Each flow is keyed by its CSRF `state` value and can be completed once.
#[derive(Debug)]
pub struct StateManager {
    flows: Mutex<HashMap<String, PendingAuth>>,
    ttl_secs: u64,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new(FLOW_TTL_SECS)
    }
}

impl StateManager {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            flows: Mutex::new(HashMap::new()),
            ttl_secs,
        }
    }

    pub async fn begin(&self) -> AuthFlow {
        self.begin_at(now_secs()).await
    }

    pub async fn begin_at(&self, now: u64) -> AuthFlow {
        let flow = AuthFlow {
            state: utils::generate_state(),
            code_verifier: utils::generate_code_verifier(),
        };

        let mut flows = self.flows.lock().await;
        flows.retain(|_, pending| !self.is_stale(pending, now));

        if flows.len() >= MAX_PENDING_FLOWS {
            let oldest = flows
                .iter()
                .min_by_key(|(_, pending)| pending.created_at)
                .map(|(state, _)| state.clone());
            if let Some(state) = oldest {
                flows.remove(&state);
            }
        }

        flows.insert(
            flow.state.clone(),
            PendingAuth {
                code_verifier: flow.code_verifier.clone(),
                created_at: now,
            },
        );
        debug!("Started authorization flow ({} pending)", flows.len());
        flow
    }

    /// Removes the flow for `state` and returns its code verifier.
    ///
    /// `None` for unknown, already completed or expired flows.
    pub async fn complete(&self, state: &str) -> Option<String> {
        self.complete_at(state, now_secs()).await
    }

    pub async fn complete_at(&self, state: &str, now: u64) -> Option<String> {
        let pending = self.flows.lock().await.remove(state)?;
        if self.is_stale(&pending, now) {
            return None;
        }
        Some(pending.code_verifier)
    }

    pub async fn pending(&self) -> usize {
        self.flows.lock().await.len()
    }

    fn is_stale(&self, pending: &PendingAuth, now: u64) -> bool {
        now >= pending.created_at + self.ttl_secs
    }
}
