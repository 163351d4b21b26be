//! Error types for the governance dashboard.
//!
//! This module defines every error that can occur while connecting a wallet,
//! talking to the node, encoding contract calls, or loading configuration.

use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Wallet connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// A call was submitted while no wallet session was active
    #[error("Connector not connected.")]
    NotConnected,

    /// JSON-RPC error returned by the node, kept verbatim
    #[error("{message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message reported by the node
        message: String,
    },

    /// Node answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Network communication error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Contract interface or argument encoding error
    #[error("ABI error: {0}")]
    Abi(String),

    /// Local signer failed to sign a transaction
    #[error("Signing error: {0}")]
    Signing(String),

    /// Invalid response from the node
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// URL parse error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Coarse classification of [`DashboardError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connect/disconnect failures
    Connection,
    /// Signature rejection, broadcast failure, reverted execution
    CallSubmission,
    /// Configuration could not be loaded or is invalid
    Configuration,
}

impl DashboardError {
    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::Connection(_) => ErrorCategory::Connection,
            DashboardError::Config(_)
            | DashboardError::UrlParse(_)
            | DashboardError::Io(_)
            | DashboardError::Toml(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::CallSubmission,
        }
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
