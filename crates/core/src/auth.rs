use serde::{Deserialize, Serialize};

/// Authenticated caller resolved from a bearer token.
///
/// Handlers receive this value explicitly and pass it to services that act
/// on behalf of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    subject: String,
    username: Option<String>,
    email: Option<String>,
}

impl CallerIdentity {
    /// Creates a caller identity from token introspection data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        username: Option<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            username,
            email,
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the preferred username, if the provider returned one.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
