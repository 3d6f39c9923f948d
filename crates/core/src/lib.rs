//! Twinkle Core - Shared domain types.
//!
//! This crate provides the types and pure logic used by every Twinkle component:
//! - `catalog` - Product access layer (Postgres, object storage)
//! - `storefront` - Public shop with catalog, product pages and WhatsApp checkout
//! - `admin` - Product management dashboard behind the email allow-list
//! - `cli` - Migrations, accounts and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Enable the `postgres` feature for `sqlx` encodings.
//!
//! # Modules
//!
//! - [`types`] - Newtypes for ids, emails, prices and categories
//! - [`product`] - The product record and its create/patch payloads
//! - [`catalog`] - Category filtering over a fetched product set
//! - [`gallery`] - Active-image selection for the product page
//! - [`draft`] - Admin form draft and its submission rules
//! - [`access`] - User profiles and the admin allow-list
//! - [`checkout`] - WhatsApp order hand-off links

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod catalog;
pub mod checkout;
pub mod draft;
pub mod gallery;
pub mod product;
pub mod types;

pub use access::{AdminAllowList, UserProfile};
pub use catalog::{CategoryFilter, featured_products, filter_products};
pub use checkout::WhatsAppCheckout;
pub use draft::{DraftSubmission, ProductDraft};
pub use gallery::Gallery;
pub use product::{NewProduct, Product, ProductPatch};
pub use types::*;
