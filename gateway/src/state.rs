use std::sync::Arc;

use customer_core::CustomerApi;

/// Shared by every request. The API itself holds no session state; each
/// request brings its own token.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CustomerApi>,
}

impl AppState {
    pub fn new(api: impl CustomerApi + 'static) -> Self {
        Self { api: Arc::new(api) }
    }
}
