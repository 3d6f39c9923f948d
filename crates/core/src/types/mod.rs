//! Core types for Twinkle.
//!
//! Type-safe wrappers for the catalog's domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod role;

pub use category::{Category, CategoryError, SubCategory};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use role::UserRole;
