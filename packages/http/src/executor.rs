//! HTTP execution abstraction.
//!
//! The client talks to the network only through [`HttpExecutor`], so tests
//! can swap in a mock and assert on the exact requests without any network
//! calls.

use std::time::Duration;

use reqwest::blocking::{Body, Client};

use crate::error::Error;
use crate::types::{PreparedRequest, RawResponse, RequestBody};

/// Default deadline for one exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for executing HTTP requests.
///
/// Implementations send the request and hand back the response with its body
/// unread. Any status is a successful execution; `Err` means no response was
/// obtained at all and is reported to callers as a transport failure.
pub trait HttpExecutor: Send + Sync {
    fn execute(&self, request: PreparedRequest) -> Result<RawResponse, Error>;
}

impl<T: HttpExecutor + ?Sized> HttpExecutor for Box<T> {
    fn execute(&self, request: PreparedRequest) -> Result<RawResponse, Error> {
        self.as_ref().execute(request)
    }
}

/// Production HTTP executor using reqwest.
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Create a new executor with the given timeout.
    ///
    /// The timeout bounds the whole exchange, including reading the response
    /// body. `None` disables it.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self, Error> {
        Self::new(Some(DEFAULT_TIMEOUT))
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn execute(&self, request: PreparedRequest) -> Result<RawResponse, Error> {
        let method: http::Method = request.method.into();

        let mut req_builder = self
            .client
            .request(method, request.url)
            .headers(request.headers);

        req_builder = match request.body {
            RequestBody::Empty => req_builder,
            RequestBody::Bytes(bytes) => req_builder.body(bytes),
            RequestBody::Reader(reader) => req_builder.body(Body::new(reader)),
        };

        let response = req_builder.send()?;

        Ok(RawResponse {
            status: response.status().as_u16(),
            headers: response.headers().clone(),
            body: Box::new(response),
        })
    }
}
