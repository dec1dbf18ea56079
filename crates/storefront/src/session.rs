//! Account session values and the identity-provider feed.
//!
//! The identity provider owns authentication; the storefront only observes
//! the resulting session value. [`SessionFeed`] is the injection point: the
//! provider publishes transitions, the cart engine subscribes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use emberwick_core::AccountId;

/// The current identity context: guest or a specific account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountSession {
    /// No account is active; the cart lives in the local store.
    #[default]
    Guest,
    /// An account is active; the cart lives in the remote store under this ID.
    Account(AccountId),
}

impl AccountSession {
    /// Returns the active account ID, if any.
    #[must_use]
    pub const fn account_id(&self) -> Option<&AccountId> {
        match self {
            Self::Guest => None,
            Self::Account(id) => Some(id),
        }
    }

    /// Whether no account is active.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }
}

/// Publisher side of the session value, held by the identity provider glue.
///
/// Wraps a `tokio::sync::watch` channel: subscribers always see the latest
/// value, and the initial value is delivered as the app-start transition.
#[derive(Debug)]
pub struct SessionFeed {
    tx: watch::Sender<AccountSession>,
}

impl SessionFeed {
    /// Create a feed starting in the guest state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AccountSession::Guest);
        Self { tx }
    }

    /// Subscribe to session transitions.
    ///
    /// The receiver immediately observes the current value, then each
    /// subsequent transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AccountSession> {
        self.tx.subscribe()
    }

    /// Publish a login for the given account.
    pub fn login(&self, account: AccountId) {
        // send only fails with no receivers; the value is still stored
        let _ = self.tx.send(AccountSession::Account(account));
    }

    /// Publish a logout back to the guest state.
    pub fn logout(&self) {
        let _ = self.tx.send(AccountSession::Guest);
    }

    /// The session value as of now.
    #[must_use]
    pub fn current(&self) -> AccountSession {
        self.tx.borrow().clone()
    }
}

impl Default for SessionFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_starts_as_guest() {
        let feed = SessionFeed::new();
        assert!(feed.current().is_guest());
    }

    #[test]
    fn test_login_logout_transitions() {
        let feed = SessionFeed::new();
        feed.login(AccountId::new("acct-1"));
        assert_eq!(
            feed.current().account_id().map(AccountId::as_str),
            Some("acct-1")
        );

        feed.logout();
        assert!(feed.current().is_guest());
    }

    #[tokio::test]
    async fn test_subscriber_observes_transitions() {
        let feed = SessionFeed::new();
        let mut rx = feed.subscribe();
        assert!(rx.borrow_and_update().is_guest());

        feed.login(AccountId::new("acct-2"));
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_guest());
    }
}
