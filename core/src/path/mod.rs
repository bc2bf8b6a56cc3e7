//! Dotted-path addressing into a document tree.
//!
//! Paths like `server.tls.cert` are split into key segments by
//! [`segments`] and resolved against a `serde_json::Value` by [`access`].

pub mod access;
pub mod segments;

pub use access::{delete, get, has, lookup, set, Lookup};
pub use segments::{parse_segments, DottedPath, BLOCKED_KEYS};
