use std::sync::Arc;

use crate::llm_client::CompletionBackend;
use crate::projects::chat::ChatHistory;
use crate::store::ProjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Lives from process start to shutdown; nothing here is module-global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProjectStore>,
    /// Pluggable completion backend. Default: OpenAiClient.
    pub llm: Arc<dyn CompletionBackend>,
    pub chats: ChatHistory,
}
