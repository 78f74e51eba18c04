// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for streamcodec.
//!
//! Provides error types for stream pipeline operations:
//! - Builder configuration
//! - Registry lookups
//! - Chain execution
//! - Transform option and data validation

use std::fmt;

use super::Direction;

/// Errors that can occur while configuring or executing a stream pipeline.
#[derive(Debug)]
pub enum StreamError {
    /// Conflicting declaration modes, or a deferred declaration without a file name
    InvalidConfiguration {
        /// Why the declaration was rejected
        reason: String,
    },

    /// Extension symbol is not present in the registry
    UnknownTransformType {
        /// The offending symbol
        symbol: String,
    },

    /// Extension is known but has no factory for the requested direction
    UnsupportedTransform {
        /// The extension symbol
        symbol: String,
        /// Requested direction
        direction: Direction,
    },

    /// The terminal callback was not available when a layer invoked it
    MissingCallback,

    /// A transform returned without invoking its inner callback
    CallbackNotInvoked {
        /// Outermost extension symbol of the chain
        symbol: String,
    },

    /// A transform rejected one of its options
    InvalidOption {
        /// Transform that rejected the option
        transform: String,
        /// Option key
        option: String,
        /// Why it was rejected
        reason: String,
    },

    /// Malformed data seen by a transform
    Format {
        /// Transform that saw the data
        transform: String,
        /// Error message
        message: String,
    },

    /// Configuration file could not be read or parsed
    Config {
        /// Error message
        message: String,
    },

    /// I/O failure raised by a stream or transform
    Io(std::io::Error),

    /// Other error
    Other(String),
}

impl StreamError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        StreamError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create an "unknown transform type" error.
    pub fn unknown_transform(symbol: impl Into<String>) -> Self {
        StreamError::UnknownTransformType {
            symbol: symbol.into(),
        }
    }

    /// Create an "unsupported transform" error.
    pub fn unsupported(symbol: impl Into<String>, direction: Direction) -> Self {
        StreamError::UnsupportedTransform {
            symbol: symbol.into(),
            direction,
        }
    }

    /// Create a "callback not invoked" error.
    pub fn callback_not_invoked(symbol: impl Into<String>) -> Self {
        StreamError::CallbackNotInvoked {
            symbol: symbol.into(),
        }
    }

    /// Create an invalid option error.
    pub fn invalid_option(
        transform: impl Into<String>,
        option: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        StreamError::InvalidOption {
            transform: transform.into(),
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Create a format error.
    pub fn format(transform: impl Into<String>, message: impl Into<String>) -> Self {
        StreamError::Format {
            transform: transform.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        StreamError::Config {
            message: message.into(),
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            StreamError::InvalidConfiguration { reason } => vec![("reason", reason.clone())],
            StreamError::UnknownTransformType { symbol } => vec![("symbol", symbol.clone())],
            StreamError::UnsupportedTransform { symbol, direction } => vec![
                ("symbol", symbol.clone()),
                ("direction", direction.to_string()),
            ],
            StreamError::MissingCallback => Vec::new(),
            StreamError::CallbackNotInvoked { symbol } => vec![("symbol", symbol.clone())],
            StreamError::InvalidOption {
                transform,
                option,
                reason,
            } => vec![
                ("transform", transform.clone()),
                ("option", option.clone()),
                ("reason", reason.clone()),
            ],
            StreamError::Format { transform, message } => {
                vec![("transform", transform.clone()), ("message", message.clone())]
            }
            StreamError::Config { message } => vec![("message", message.clone())],
            StreamError::Io(err) => vec![
                ("kind", format!("{:?}", err.kind())),
                ("message", err.to_string()),
            ],
            StreamError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::InvalidConfiguration { reason } => {
                write!(f, "Invalid stream configuration: {reason}")
            }
            StreamError::UnknownTransformType { symbol } => {
                write!(f, "Unknown stream type: '{symbol}'")
            }
            StreamError::UnsupportedTransform { symbol, direction } => {
                write!(f, "No {direction} registered for stream type: '{symbol}'")
            }
            StreamError::MissingCallback => {
                write!(f, "Stream pipeline is missing its terminal callback")
            }
            StreamError::CallbackNotInvoked { symbol } => {
                write!(f, "Stream type '{symbol}' returned without invoking its inner stream")
            }
            StreamError::InvalidOption {
                transform,
                option,
                reason,
            } => write!(f, "Invalid option '{option}' for stream type '{transform}': {reason}"),
            StreamError::Format { transform, message } => {
                write!(f, "{transform} format error: {message}")
            }
            StreamError::Config { message } => write!(f, "Configuration error: {message}"),
            StreamError::Io(err) => write!(f, "I/O error: {err}"),
            StreamError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::Io(err)
    }
}

/// Result type for streamcodec operations.
pub type Result<T> = std::result::Result<T, StreamError>;
