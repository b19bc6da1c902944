use crate::llm_client::Dispatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The only path to the generation API. Backend is swappable for tests.
    pub dispatcher: Dispatcher,
}
