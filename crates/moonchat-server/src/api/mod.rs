pub mod chat;

use std::sync::Arc;

use moonchat_ai::MoonshotClient;

/// Shared state is just the configured provider client.
pub type AppState = Arc<MoonshotClient>;
