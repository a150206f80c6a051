//! Error types for loading and normalizing configuration

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Validation failures raised while normalizing a [`RawConfig`](crate::RawConfig).
///
/// All of them are fatal: normalization returns no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Neither the configuration nor a conventional vendor location supplies the field.
    #[error(
        "expected a \"{field}\" parameter that must contain the absolute path to the {library} vendor library; \
         define \"{field}\" under the \"propel\" root node in your configuration"
    )]
    MissingRequiredField {
        field: &'static str,
        library: &'static str,
    },

    /// A connection record carries no `driver`.
    #[error("connection \"{connection}\" has no \"driver\"; set dbal.connections.{connection}.driver")]
    MissingDriver { connection: String },

    /// `default_connection` names a connection that is not declared.
    #[error("default connection \"{name}\" is not declared under dbal.connections (available: {available})")]
    UnknownDefaultConnection { name: String, available: String },
}

impl NormalizeError {
    /// Name of the offending configuration field, when the error is about one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            NormalizeError::MissingRequiredField { field, .. } => Some(field),
            NormalizeError::MissingDriver { .. } => Some("driver"),
            NormalizeError::UnknownDefaultConnection { .. } => Some("default_connection"),
        }
    }
}

/// Library-wide error for the load-merge-normalize pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}
