//! Building one HTTP request per logical operation.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RANGE};

use crate::error::Error;
use crate::target::RequestTarget;
use crate::types::{Method, PreparedRequest, RequestBody};

/// A read window: `size` bytes starting at `offset`, or everything from
/// `offset` when `size` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteRange {
    pub offset: u64,
    pub size: Option<u64>,
}

impl ByteRange {
    /// The whole content. Sends no `Range` header.
    pub fn full() -> Self {
        Self::default()
    }

    /// Everything from `offset` to the end.
    pub fn starting_at(offset: u64) -> Self {
        Self { offset, size: None }
    }

    /// `size` bytes starting at `offset`.
    pub fn window(offset: u64, size: u64) -> Self {
        Self {
            offset,
            size: Some(size),
        }
    }

    pub fn is_full(&self) -> bool {
        self.offset == 0 && self.size.is_none()
    }

    /// The `Range` header value, or `None` when the whole content is wanted.
    pub fn header_value(&self) -> Result<Option<String>, Error> {
        match self.size {
            None if self.offset == 0 => Ok(None),
            None => Ok(Some(format!("bytes={}-", self.offset))),
            Some(0) => Err(Error::EmptyRange),
            Some(size) => Ok(Some(format!(
                "bytes={}-{}",
                self.offset,
                self.offset.saturating_add(size - 1)
            ))),
        }
    }
}

/// Prepares requests, attaching the access token to each.
///
/// An empty token is still sent; the service then only grants access to
/// public content.
#[derive(Debug, Clone)]
pub struct RequestPreparer {
    authorization: HeaderValue,
}

impl RequestPreparer {
    pub fn new(token: &str) -> Result<Self, Error> {
        let mut authorization = HeaderValue::from_str(token)?;
        authorization.set_sensitive(true);
        Ok(Self { authorization })
    }

    fn prepare(
        &self,
        method: Method,
        target: &RequestTarget,
        body: RequestBody,
    ) -> PreparedRequest {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization.clone());

        PreparedRequest {
            method,
            url: target.to_url(),
            headers,
            body,
        }
    }

    /// HEAD, for resolving attributes.
    pub fn head(&self, target: &RequestTarget) -> PreparedRequest {
        self.prepare(Method::HEAD, target, RequestBody::Empty)
    }

    /// GET, with a `Range` header unless the whole content is wanted.
    pub fn get(&self, target: &RequestTarget, range: ByteRange) -> Result<PreparedRequest, Error> {
        let range_value = range.header_value()?;
        let mut request = self.prepare(Method::GET, target, RequestBody::Empty);
        if let Some(value) = range_value {
            request.headers.insert(RANGE, HeaderValue::from_str(&value)?);
        }
        Ok(request)
    }

    /// POST of whole content. Only offset zero is supported.
    pub fn post(
        &self,
        target: &RequestTarget,
        offset: u64,
        body: RequestBody,
    ) -> Result<PreparedRequest, Error> {
        if offset != 0 {
            return Err(Error::WriteOffsetNotSupported { offset });
        }
        Ok(self.prepare(Method::POST, target, body))
    }

    /// PATCH with a JSON body.
    pub fn patch<T: serde::Serialize>(
        &self,
        target: &RequestTarget,
        body: &T,
    ) -> Result<PreparedRequest, Error> {
        let json = serde_json::to_vec(body)?;
        let body = RequestBody::Bytes(Bytes::from(json));
        let mut request = self.prepare(Method::PATCH, target, body);
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(request)
    }

    pub fn delete(&self, target: &RequestTarget) -> PreparedRequest {
        self.prepare(Method::DELETE, target, RequestBody::Empty)
    }
}
