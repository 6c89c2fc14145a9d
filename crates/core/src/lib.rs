//! Corner Shop Core - Shared types and access policies.
//!
//! This crate provides the pieces every other Corner Shop component agrees on:
//! - `storefront` - HTTP service, repositories and business services
//! - `cli` - Command-line tools for migrations, users and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Database encodings for the domain types are available
//! behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, roles and the small closed enums
//! - [`access`] - The authorization gate deciding who may do what
//! - [`forms`] - Validation of registration, product and checkout input

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod forms;
pub mod types;

pub use access::{AccessError, Action, Viewer, authorize};
pub use forms::{FieldError, ValidationErrors};
pub use types::*;
