//! Command-line definitions for dotconf.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use dotconf_core::Format;
use serde_json::Value;


/// Read and edit JSON/YAML configuration files by dotted path.
#[derive(Parser, Debug)]
#[command(name = "dotconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to operate on.
    #[arg(short = 'f', long = "file", env = "DOTCONF_FILE", value_name = "PATH")]
    pub file: PathBuf,

    /// Force a format instead of detecting it from the extension.
    #[arg(long = "format", value_name = "json|yaml")]
    pub format: Option<Format>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the value at a path as JSON.
    Get {
        path: String,
        /// Value to print when the path is missing.
        #[arg(long = "default", value_parser = parse_value)]
        default: Option<Value>,
    },
    /// Exit 0 if the path exists, 1 otherwise.
    Has { path: String },
    /// Set the value at a path. JSON is accepted; anything else is a string.
    Set {
        path: String,
        #[arg(value_parser = parse_value)]
        value: Value,
    },
    /// Remove the key at a path.
    Delete { path: String },
}


/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}


/// Default log filter for a given `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
