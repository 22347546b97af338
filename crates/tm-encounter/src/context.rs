//! Who is using the session, passed explicitly to every collaborator call.

use serde::{Deserialize, Serialize};

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable user id, used for ownership checks.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl UserIdentity {
    /// A user with the given id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Credentials for the current session. Starts anonymous or authenticated,
/// can have its token refreshed, and is torn down by [`logout`](Self::logout).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    user: Option<UserIdentity>,
    token: Option<String>,
}

impl SessionContext {
    /// A context with no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context for a signed-in user.
    pub fn authenticated(user: UserIdentity, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token.into()),
        }
    }

    /// Replace the access token. Has no effect on an anonymous context.
    pub fn refresh(&mut self, token: impl Into<String>) {
        if self.user.is_some() {
            self.token = Some(token.into());
        }
    }

    /// Drop all credentials.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// The signed-in user's id, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    /// The current access token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether both a user and a token are present.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}
