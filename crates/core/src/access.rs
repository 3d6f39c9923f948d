//! Signed-in profiles and the admin allow-list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId, UserRole};

/// The identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: UserId,
    pub email: Option<Email>,
    pub role: Option<UserRole>,
}

/// Email addresses allowed to manage the catalog.
///
/// Membership is exact string equality, case included. The set is data, so
/// it can be loaded from configuration and replaced while running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminAllowList(BTreeSet<String>);

impl AdminAllowList {
    #[must_use]
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            emails
                .into_iter()
                .map(Into::into)
                .map(|e| e.trim().to_owned())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    /// Parse a comma-separated list such as `ADMIN_EMAILS`.
    #[must_use]
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.0.contains(email)
    }

    /// Whether `profile` may use the admin dashboard. Profiles without an
    /// email never qualify.
    #[must_use]
    pub fn is_admin(&self, profile: &UserProfile) -> bool {
        profile
            .email
            .as_ref()
            .is_some_and(|email| self.contains(email.as_str()))
    }

    /// Returns `true` if the address was not already present.
    pub fn insert(&mut self, email: &Email) -> bool {
        self.0.insert(email.as_str().to_owned())
    }

    /// Returns `true` if the address was present.
    pub fn remove(&mut self, email: &str) -> bool {
        self.0.remove(email)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
