//! Static configuration
//!
//! Loaded once at start-up from an optional TOML file plus `TB__*`
//! environment overrides, then passed explicitly to whoever needs it.

mod structs;

pub use structs::*;
