//! Wire types passed between the request preparer, the executors and the client.

use std::io::Read;

use bytes::Bytes;
use http::header::HeaderMap;
use url::Url;

/// HTTP verbs the Oxygen protocol uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Resolve attributes.
    HEAD,
    /// Read content.
    GET,
    /// Create or overwrite.
    POST,
    /// Rename.
    PATCH,
    /// Remove.
    DELETE,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::HEAD => http::Method::HEAD,
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PATCH => http::Method::PATCH,
            Method::DELETE => http::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", http::Method::from(*self))
    }
}

/// Body of an outgoing request.
pub enum RequestBody {
    Empty,
    Bytes(Bytes),
    /// Streamed from the caller without buffering.
    Reader(Box<dyn Read + Send>),
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }

    /// Read the whole body into memory.
    pub fn into_bytes(self) -> std::io::Result<Bytes> {
        match self {
            RequestBody::Empty => Ok(Bytes::new()),
            RequestBody::Bytes(bytes) => Ok(bytes),
            RequestBody::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBody::Empty => write!(f, "Empty"),
            RequestBody::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            RequestBody::Reader(_) => write!(f, "Reader(..)"),
        }
    }
}

/// A request ready to hand to an [`HttpExecutor`](crate::HttpExecutor).
#[derive(Debug)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

/// A response as returned by an executor, body still unread.
///
/// Dropping the response releases the underlying connection.
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Box<dyn Read + Send>,
}

impl RawResponse {
    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the rest of the body, then release the connection.
    pub fn into_body_bytes(mut self) -> std::io::Result<Bytes> {
        let mut buf = Vec::new();
        self.body.read_to_end(&mut buf)?;
        Ok(Bytes::from(buf))
    }
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
