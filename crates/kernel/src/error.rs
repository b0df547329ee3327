//! Error taxonomy for calls against the remote books collection

use std::fmt;

use thiserror::Error;

/// The four operations of the books contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    AdjustCopies,
    Delete,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::AdjustCopies => "adjust_copies",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side failure of a books operation.
///
/// Rejections carry only the status code. The server's error body is never
/// parsed, so no field-level detail exists at this layer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{operation} rejected with status {status}")]
    Rejected { operation: Operation, status: u16 },

    #[error("{operation} failed in transport: {message}")]
    Transport {
        operation: Operation,
        message: String,
    },

    #[error("{operation} returned an unreadable body: {message}")]
    Decode {
        operation: Operation,
        message: String,
    },

    #[error("invalid books endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

impl ApiError {
    /// Create a rejection error from a non-success status
    pub const fn rejected(operation: Operation, status: u16) -> Self {
        Self::Rejected { operation, status }
    }

    /// Create a transport error
    pub fn transport(operation: Operation, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(operation: Operation, message: impl Into<String>) -> Self {
        Self::Decode {
            operation,
            message: message.into(),
        }
    }

    /// Create an endpoint configuration error
    pub fn invalid_endpoint(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Operation that failed, if the error came from a call
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Rejected { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
            Self::InvalidEndpoint { .. } => None,
        }
    }

    /// Status code of a server rejection
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
