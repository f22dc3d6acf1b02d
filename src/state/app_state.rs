//! Application state shared across handlers

use std::sync::Arc;

use crate::auth::{AuthService, KeyManager};

use axum::extract::FromRef;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub key_manager: Arc<KeyManager>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, key_manager: Arc<KeyManager>) -> Self {
        Self {
            auth_service,
            key_manager,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<KeyManager> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.key_manager.clone()
    }
}
