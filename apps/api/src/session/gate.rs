//! Session state, its reducer, and the route-group redirect policy.

use serde::{Deserialize, Serialize};

/// A named partition of the client UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteGroup {
    /// Sign-in / sign-up screens.
    Auth,
    Onboarding,
    /// The tabbed main app.
    Main,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub signed_in: bool,
    pub onboarding_completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { onboarding_completed: bool },
    SignedOut,
    OnboardingFlagChanged(bool),
}

impl SessionState {
    pub fn apply(self, event: SessionEvent) -> SessionState {
        match event {
            SessionEvent::SignedIn {
                onboarding_completed,
            } => SessionState {
                signed_in: true,
                onboarding_completed,
            },
            SessionEvent::SignedOut => SessionState::default(),
            SessionEvent::OnboardingFlagChanged(completed) if self.signed_in => SessionState {
                onboarding_completed: completed,
                ..self
            },
            // Signed-out sessions have no onboarding flag to change.
            SessionEvent::OnboardingFlagChanged(_) => self,
        }
    }

    /// The group this session belongs in.
    pub fn home(&self) -> RouteGroup {
        match (self.signed_in, self.onboarding_completed) {
            (false, _) => RouteGroup::Auth,
            (true, false) => RouteGroup::Onboarding,
            (true, true) => RouteGroup::Main,
        }
    }
}

/// Where to send a client currently in `current`, or `None` if it is already
/// in the right group. Returning `None` for the home group keeps the policy
/// from redirecting in a loop.
pub fn redirect_for(state: &SessionState, current: RouteGroup) -> Option<RouteGroup> {
    let home = state.home();
    (home != current).then_some(home)
}
