//! # Domain
//!
//! Plain data shared across the Nexus crates: the server configuration tree and a few
//! string constants. Only `serde` is allowed here.

pub mod config;
pub mod constants;
