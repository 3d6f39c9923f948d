use chrono::{DateTime, Utc};
use twinkle_core::{Email, UserId};

/// An email + password identity for the dashboard.
///
/// An account alone grants nothing; the email must also be allow-listed.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
