//! dotconf CLI — read and edit configuration files by dotted path.
//!
//! # Usage
//!
//! ```text
//! dotconf -f config.yaml get config.foo
//! dotconf -f config.yaml get config.port --default 8080
//! dotconf -f config.yaml has config.foo
//! dotconf -f config.yaml set config.foo '"baz"'
//! dotconf -f config.yaml delete config.foo
//! ```

mod args;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dotconf_core::Configuration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use args::{log_level, Cli, Command};


fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose))),
        )
        .init();

    let mut config = match cli.format {
        Some(format) => Configuration::open_with_format(&cli.file, format),
        None => Configuration::open(&cli.file),
    }
    .with_context(|| format!("loading {}", cli.file.display()))?;
    debug!(file = %cli.file.display(), format = %config.format(), "opened");

    match cli.command {
        Command::Get { path, default } => match config.get(&path, default.as_ref()) {
            Some(value) => {
                println!("{}", serde_json::to_string_pretty(value)?);
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(ExitCode::FAILURE),
        },
        Command::Has { path } => {
            let present = config.has(&path);
            println!("{}", present);
            Ok(if present { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Set { path, value } => {
            config
                .set(&path, value)
                .with_context(|| format!("setting '{}'", path))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { path } => {
            config
                .delete(&path)
                .with_context(|| format!("deleting '{}'", path))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
