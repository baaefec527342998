//! Errors raised while reading, writing or checking `config.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// Why the dashboard configuration could not be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {path}")]
    Read {
        /// File that was opened.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// 1-based; 0 when the parser gave no position.
        line: usize,
        /// 1-based; 0 when the parser gave no position.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// `--config` named a file that does not exist.
    #[error("no configuration file at {path}")]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// `config init` without `--force` found an existing file.
    #[error("{path} already exists (use --force to replace it)")]
    AlreadyExists {
        /// Existing file.
        path: PathBuf,
    },

    /// Writing the template or its backup failed.
    #[error("cannot write {path}")]
    Write {
        /// Destination file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value parsed but is not acceptable.
    #[error("Invalid value for {field}: {value:?} ({message})")]
    InvalidValue {
        /// Dotted key of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        message: String,
    },
}
