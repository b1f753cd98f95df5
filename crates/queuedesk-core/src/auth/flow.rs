//! Login/logout state machine.
//!
//! ```text
//! Anonymous --login/restore--> Pending --ok--> Authenticated
//!     ^                           |                 |
//!     +-------- failure ----------+---- logout -----+
//! ```
//!
//! Authentication is decided by the backend; on top of it the dashboard
//! requires a specific role (ADMIN). A valid token for any other role is
//! rejected client-side and never kept.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{Role, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Pending,
    Authenticated { user: User },
}

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Email and password are required.")]
    MissingFields,

    #[error("No token returned from server")]
    MissingToken,

    #[error("Access denied: {} only.", .required.plural_label())]
    AccessDenied { required: Role, actual: Role },

    #[error("Not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct AuthFlow {
    api: ApiClient,
    required_role: Role,
    state: AuthState,
}

impl AuthFlow {
    /// A flow gated on the ADMIN role, starting anonymous.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            required_role: Role::Admin,
            state: AuthState::Anonymous,
        }
    }

    pub fn with_required_role(mut self, role: Role) -> Self {
        self.required_role = role;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match self.state {
            AuthState::Authenticated { ref user } => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    /// Sign in and require the configured role.
    ///
    /// Blank input is rejected without touching the session. Otherwise any
    /// previous credential is dropped first, and on failure the session is
    /// left anonymous with no stored credential.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, LoginError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.trim().is_empty() {
            return Err(LoginError::MissingFields);
        }

        self.api.session().clear_credential();
        self.state = AuthState::Pending;
        match self.try_login(&email, password).await {
            Ok(user) => {
                info!(email = %user.email, "Login successful");
                self.state = AuthState::Authenticated { user: user.clone() };
                Ok(user)
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.state = AuthState::Anonymous;
                Err(e)
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<User, LoginError> {
        let response = self.api.login(email, password).await?;
        let token = response
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(LoginError::MissingToken)?;

        // Reject before anything is persisted when the login payload already
        // says the role is wrong
        if let Some(role) = response.role() {
            self.check_role(role)?;
        }

        let session = self.api.session();
        session.set_credential(token);

        let profile = self.fetch_profile().await;
        if profile.is_err() {
            session.clear_credential();
        }
        profile
    }

    /// Fetch `/auth/me` and apply the role gate.
    async fn fetch_profile(&self) -> Result<User, LoginError> {
        let user = self.api.me().await?;
        self.check_role(user.role)?;
        self.api.session().set_profile(user.clone());
        Ok(user)
    }

    fn check_role(&self, role: Role) -> Result<(), LoginError> {
        if role == self.required_role {
            Ok(())
        } else {
            Err(LoginError::AccessDenied {
                required: self.required_role,
                actual: role,
            })
        }
    }

    /// Resume a persisted session at startup. Returns whether the session
    /// is authenticated afterwards.
    pub async fn restore(&mut self) -> bool {
        if !self.api.session().has_credential() {
            self.state = AuthState::Anonymous;
            return false;
        }
        match self.refetch_me().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Could not restore session");
                false
            }
        }
    }

    /// Re-fetch the profile for the current credential.
    ///
    /// A role mismatch drops the credential. A transport failure leaves it
    /// in place so a later attempt can succeed; a 401 has already cleared it.
    pub async fn refetch_me(&mut self) -> Result<User, LoginError> {
        if !self.api.session().has_credential() {
            self.state = AuthState::Anonymous;
            return Err(LoginError::NotSignedIn);
        }

        self.state = AuthState::Pending;
        match self.fetch_profile().await {
            Ok(user) => {
                self.state = AuthState::Authenticated { user: user.clone() };
                Ok(user)
            }
            Err(e) => {
                if matches!(e, LoginError::AccessDenied { .. }) {
                    self.api.session().clear_credential();
                }
                self.state = AuthState::Anonymous;
                Err(e)
            }
        }
    }

    /// Forget the credential and profile. The backend is not contacted; the
    /// token is simply discarded.
    pub fn logout(&mut self) {
        self.api.session().clear_credential();
        self.state = AuthState::Anonymous;
        info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_message() {
        let err = LoginError::AccessDenied {
            required: Role::Admin,
            actual: Role::Patient,
        };
        assert_eq!(err.to_string(), "Access denied: Admins only.");
    }

    #[test]
    fn test_api_error_message_passes_through() {
        let err = LoginError::from(ApiError::RequestFailed {
            status: 400,
            message: "Invalid credentials".to_string(),
        });
        assert_eq!(err.to_string(), "Invalid credentials");
    }
}
