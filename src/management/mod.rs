mod auth;
mod state;

pub use auth::MemoryTokenStore;
pub use auth::TokenManager;
pub use auth::TokenStore;
pub use state::AuthFlow;
pub use state::FLOW_TTL_SECS;
pub use state::MAX_PENDING_FLOWS;
pub use state::StateManager;
