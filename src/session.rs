//! Authenticated session context
//!
//! The session is resolved once from the [`AuthProvider`] when the process
//! starts and handed explicitly to every view. Signing out invalidates it;
//! nothing looks the user up ambiently afterwards.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::client::UserId;
use crate::error::AuthError;

/// Identity returned by the authentication collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

/// External authentication service
pub trait AuthProvider {
    /// Currently signed-in user, if any
    fn current_user(&self) -> Result<Option<User>, AuthError>;

    /// Terminate the session
    fn sign_out(&mut self) -> Result<(), AuthError>;
}

/// Provider with a fixed, optional user (CLI flag, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
    fail_sign_out: bool,
}

impl StaticAuth {
    pub fn signed_in(id: UserId) -> Self {
        Self {
            user: Some(User { id, email: None }),
            fail_sign_out: false,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Make `sign_out` report a service error
    pub fn failing_sign_out(mut self) -> Self {
        self.fail_sign_out = true;
        self
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.user.clone())
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        if self.fail_sign_out {
            return Err(AuthError::Service("sign-out rejected".to_string()));
        }
        self.user = None;
        Ok(())
    }
}

/// Process-wide session state
#[derive(Debug)]
pub struct Session<A: AuthProvider> {
    auth: A,
    user: Option<User>,
}

impl<A: AuthProvider> Session<A> {
    /// Resolve the current user once at startup
    ///
    /// An auth service failure leaves the session signed out.
    pub fn start(auth: A) -> Self {
        let user = match auth.current_user() {
            Ok(user) => user,
            Err(e) => {
                warn!("Could not resolve current user: {}", e);
                None
            }
        };
        if let Some(u) = &user {
            info!("Session started for user {}", u.id);
        }
        Self { auth, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn owner_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// End the session; on failure the session stays valid
    pub fn sign_out(&mut self) -> Result<(), AuthError> {
        self.auth.sign_out()?;
        self.user = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_sign_out_invalidates() {
        let id = Uuid::new_v4();
        let mut session = Session::start(StaticAuth::signed_in(id));
        assert_eq!(session.owner_id(), Some(id));

        session.sign_out().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.owner_id(), None);
    }

    #[test]
    fn test_failed_sign_out_keeps_session() {
        let id = Uuid::new_v4();
        let mut session = Session::start(StaticAuth::signed_in(id).failing_sign_out());
        assert!(session.sign_out().is_err());
        assert_eq!(session.owner_id(), Some(id));
    }

    #[test]
    fn test_anonymous_session() {
        let session = Session::start(StaticAuth::anonymous());
        assert!(session.user().is_none());
    }
}
