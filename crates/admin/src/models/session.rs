//! Values kept in the admin session.

/// Session keys for admin authentication data.
pub mod keys {
    /// The signed-in [`UserProfile`](twinkle_core::UserProfile).
    pub const CURRENT_PROFILE: &str = "current_profile";
}
