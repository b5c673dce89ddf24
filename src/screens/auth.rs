use crate::api::models::{Credentials, Registration, Role};
use crate::screens::remote::Outcome;
use crate::state::AppState;

const GENERIC_FAILURE: &str = "An error occurred";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Login / registration form.
#[derive(Debug, Default)]
pub struct AuthForm {
    mode: AuthMode,
    submitting: bool,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    /// Log in (storing the session) or register (then switch to login).
    /// `role` is only sent when registering.
    pub async fn submit(
        &mut self,
        state: &AppState,
        email: &str,
        password: &str,
        role: Role,
    ) -> Outcome {
        if self.submitting {
            return Outcome::Skipped;
        }
        self.submitting = true;
        let outcome = self.send(state, email, password, role).await;
        self.submitting = false;
        outcome
    }

    async fn send(&mut self, state: &AppState, email: &str, password: &str, role: Role) -> Outcome {
        let result = match self.mode {
            AuthMode::Login => {
                let credentials = Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                };
                match state.api.login(&credentials).await {
                    Ok(res) => state.session.login(&res.token, res.role),
                    Err(e) => Err(e),
                }
            }
            AuthMode::Register => {
                let registration = Registration {
                    email: email.to_string(),
                    password: password.to_string(),
                    role,
                };
                state.api.register(&registration).await.map(|()| {
                    state
                        .notices
                        .success("Registration successful! Please log in.");
                    self.mode = AuthMode::Login;
                })
            }
        };

        match result {
            Ok(()) => Outcome::Applied,
            Err(e) => {
                tracing::warn!("Authentication failed: {}", e);
                state
                    .notices
                    .error(e.server_message().unwrap_or(GENERIC_FAILURE));
                Outcome::Failed
            }
        }
    }
}
