//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added by the binary)
//! 2. Request ID (`x-request-id`, generated when absent and echoed back)
//! 3. `TraceLayer` (request span with status and latency)
//! 4. Security headers (no caching, no framing)
//! 5. Session layer (tower-sessions)
//!
//! Authorization is per handler through the [`RequireAdmin`] extractor.

pub mod auth;
pub mod session;

pub use auth::{
    AdminRejection, OptionalProfile, RequireAdmin, clear_current_profile, set_current_profile,
};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
