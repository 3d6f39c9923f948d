//! Domain models for admin.

pub mod account;
pub mod session;

pub use account::AdminAccount;
pub use session::keys as session_keys;
