//! Business logic services for admin.
//!
//! - `auth` - Email + password sign-in and password hashing
//! - `gate` - Allow-list gate and the session event stream

pub mod auth;
pub mod gate;

pub use auth::{
    AuthError, IdentityProvider, MemoryIdentityProvider, MockIdentityProvider, PgIdentityProvider,
    hash_password, validate_password, verify_password,
};
pub use gate::{AuthGate, SessionEvent, spawn_audit_log};
