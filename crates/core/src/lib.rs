//! Record Console Core - Shared types library.
//!
//! This crate provides the types used across all Record Console components:
//! - `admin` - The console web server and record gateway
//! - `cli` - Command-line tools for migrations, seeding and raw queries
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Collection kinds, loosely-typed documents and pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
