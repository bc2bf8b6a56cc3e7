//! Dotted-path access to JSON and YAML configuration files.
//!
//! [`path`] holds the pure tree algorithms (`has`, `get`, `set`, `delete`
//! over a `serde_json::Value`); [`store`] binds a tree to a file on disk
//! and writes the whole document back after every change.
//!
//! ```no_run
//! use dotconf_core::Configuration;
//!
//! let mut config = Configuration::open("config.yaml")?;
//! config.set("server.port", 8080)?;
//! assert!(config.has("server.port"));
//! # Ok::<(), dotconf_core::ConfigError>(())
//! ```

pub mod path;
pub mod store;

pub use path::{DottedPath, Lookup};
pub use store::{CodecError, ConfigError, Configuration, Format};
