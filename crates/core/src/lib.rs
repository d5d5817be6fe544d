//! Domain types and pure logic for the studio backend.
//!
//! Nothing in this crate touches the network or the database: it holds the
//! error type, request validation, the fixed variant tables, and the image
//! pipeline that turns an upload into its stored derivatives.

pub mod collection;
pub mod error;
pub mod hashing;
pub mod imaging;
pub mod types;
pub mod variants;
