//! libris application library
//!
//! The books module (books, reviews, cache-aside listing) plus the process
//! lifecycle that wires it to Postgres, the cache and the HTTP server.

#![recursion_limit = "256"]

pub mod bootstrap;
pub mod health;
pub mod modules;

/// Re-export commonly used types
pub use modules::*;
