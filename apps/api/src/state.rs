use std::sync::Arc;

use crate::applications::repository::ApplicationRepository;
use crate::config::Config;
use crate::identity::IdentityProvider;
use crate::profile::repository::ProfileRepository;
use crate::storage::ResumeStorage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub applications: Arc<dyn ApplicationRepository>,
    /// `users` and `user_preferences` rows.
    pub profiles: Arc<dyn ProfileRepository>,
    pub storage: Arc<dyn ResumeStorage>,
    pub identity: Arc<dyn IdentityProvider>,
}
