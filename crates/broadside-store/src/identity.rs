//! Identity hook: who is the local player?
//!
//! Broadside doesn't implement sign-in itself. The [`IdentityProvider`]
//! trait is the seam where an auth backend plugs in; the session layer
//! asks it for the current user before any room operation and refuses to
//! act for an anonymous client. Tests and local play use
//! [`StaticIdentity`].

use broadside_model::Uid;

/// The signed-in user as the session layer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub uid: Uid,
    /// Name shown to the opponent; stored into the room document on
    /// create/join.
    pub display_name: String,
}

/// Resolves the current user, if anyone is signed in.
///
/// `Send + Sync + 'static` so a provider can be shared across tasks for
/// the life of the process.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Returns the current user, or `None` when nobody is signed in.
    fn current_user(&self) -> impl std::future::Future<Output = Option<UserProfile>> + Send;
}

/// A fixed identity, decided at construction. Used by tests and the
/// local demo; a real deployment implements [`IdentityProvider`] against
/// its auth service instead.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    profile: UserProfile,
}

impl StaticIdentity {
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            profile: UserProfile {
                uid: Uid::new(uid),
                display_name: display_name.into(),
            },
        }
    }
}

impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Option<UserProfile> {
        Some(self.profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_identity_always_resolves() {
        let identity = StaticIdentity::new("u-1", "Alice");
        let profile = identity.current_user().await.unwrap();
        assert_eq!(profile.uid, Uid::new("u-1"));
        assert_eq!(profile.display_name, "Alice");
    }
}
