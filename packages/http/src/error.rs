//! Error type for the Oxygen client and the status classifier.
//!
//! Failures fall into four families:
//!
//! - **transport**: the exchange never produced an HTTP response
//!   (connection refused, DNS, timeout). Surfaced as-is, never classified.
//! - **protocol**: a response arrived with a non-2xx status. Classified by
//!   [`classify`].
//! - **decode**: a 2xx response whose node headers are unusable.
//! - **precondition**: an argument the client rejects before any network
//!   activity.

use crate::codes::{ErrorCode, ErrorEnvelope};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory not empty")]
    DirectoryNotEmpty,

    #[error("Not enough permissions to perform task{}", describe(.code, .description))]
    InsufficientPermissions {
        code: Option<i64>,
        description: String,
    },

    #[error("Range not satisfiable")]
    RangeNotSatisfiable,

    #[error("HTTP request returned non-2xx status code {status}")]
    RequestFailed { status: u16, code: Option<i64> },

    #[error("Response is missing the node id header")]
    MissingNodeId,

    #[error("Unable to convert node id string {value:?} to integer")]
    InvalidNodeId { value: String },

    #[error(
        "Non-zero offset values are not currently supported for write operations (got {offset})"
    )]
    WriteOffsetNotSupported { offset: u64 },

    #[error("A zero-length read window cannot be expressed as a byte range")]
    EmptyRange,
}

fn describe(code: &Option<i64>, description: &str) -> String {
    match ((*code).and_then(ErrorCode::from_code), description.is_empty()) {
        (_, false) => format!(": {}", description),
        (Some(code), true) => format!(": {}", code),
        (None, true) => String::new(),
    }
}

impl Error {
    /// Wrap any error as a transport failure.
    pub fn transport(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Transport(error.into())
    }

    /// The exchange itself failed; there was no HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Io(_))
    }

    /// The service answered with a non-2xx status.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Error::DirectoryNotEmpty
                | Error::InsufficientPermissions { .. }
                | Error::RangeNotSatisfiable
                | Error::RequestFailed { .. }
        )
    }

    /// The service answered 2xx but the node headers were unusable.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::MissingNodeId | Error::InvalidNodeId { .. })
    }

    /// The client rejected an argument before sending anything.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::WriteOffsetNotSupported { .. } | Error::EmptyRange)
    }

    /// The HTTP status behind a protocol failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::DirectoryNotEmpty | Error::InsufficientPermissions { .. } => Some(403),
            Error::RangeNotSatisfiable => Some(416),
            Error::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Transport(Box::new(error))
    }
}

/// Map a non-2xx status and its body into a typed error.
///
/// Only 403 looks at the body: the envelope's code separates a non-empty
/// directory from a permission failure. Every status other than 403 and 416
/// collapses into [`Error::RequestFailed`], which still carries the status
/// and any envelope code for callers that want finer detail.
pub fn classify(status: u16, body: &[u8]) -> Error {
    let envelope = ErrorEnvelope::parse(body);

    match status {
        403 => match envelope.error_code() {
            Some(ErrorCode::DirectoryNotEmpty) => Error::DirectoryNotEmpty,
            _ => Error::InsufficientPermissions {
                code: envelope.code,
                description: envelope.description,
            },
        },
        416 => Error::RangeNotSatisfiable,
        _ => Error::RequestFailed {
            status,
            code: envelope.code,
        },
    }
}
