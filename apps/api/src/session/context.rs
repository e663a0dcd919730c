use tracing::{info, warn};

use crate::identity::IdentityProvider;
use crate::session::gate::{redirect_for, RouteGroup, SessionEvent, SessionState};

/// The one owner of a client's session: route-gate state plus the backend
/// token mirrored from the identity provider on sign-in.
#[derive(Debug, Default)]
pub struct SessionContext {
    state: SessionState,
    backend_token: Option<String>,
}

impl SessionContext {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn backend_token(&self) -> Option<&str> {
        self.backend_token.as_deref()
    }

    pub fn redirect_for(&self, current: RouteGroup) -> Option<RouteGroup> {
        redirect_for(&self.state, current)
    }

    /// Applies an event. A sign-in additionally mirrors a template token for the
    /// backend; failing to get one is logged and otherwise ignored, so
    /// navigation is never blocked on it.
    pub async fn dispatch(
        &mut self,
        event: SessionEvent,
        identity: &dyn IdentityProvider,
        session_id: Option<&str>,
        template: &str,
    ) {
        self.state = self.state.apply(event);

        match event {
            SessionEvent::SignedIn { .. } => {
                self.backend_token = match session_id {
                    Some(sid) => match identity.issue_token(sid, template).await {
                        Ok(token) => {
                            info!("Backend session synchronized with identity provider");
                            Some(token)
                        }
                        Err(e) => {
                            warn!("Error synchronizing backend session: {e}");
                            None
                        }
                    },
                    None => {
                        warn!("No session id to synchronize backend session");
                        None
                    }
                };
            }
            SessionEvent::SignedOut => self.backend_token = None,
            SessionEvent::OnboardingFlagChanged(_) => {}
        }
    }
}
