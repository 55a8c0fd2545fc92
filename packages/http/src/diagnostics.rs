//! Exchange logging.
//!
//! [`DiagnosticExecutor`] wraps another executor and logs every request and
//! response, bodies included, at `debug` level. Both bodies are read into
//! memory and replayed as fresh readers, so whatever runs after the wrapper
//! sees exactly what it would have seen without it. That includes read
//! failures: a body that breaks mid-read is replayed up to the break and then
//! fails the same way.

use std::io::{self, Cursor, Read};

use bytes::Bytes;

use crate::error::Error;
use crate::executor::HttpExecutor;
use crate::types::{PreparedRequest, RawResponse, RequestBody};

/// Bodies longer than this are logged truncated.
const BODY_PREVIEW_LIMIT: usize = 4096;

pub struct DiagnosticExecutor<E> {
    inner: E,
}

impl<E: HttpExecutor> DiagnosticExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

/// Buffered bytes, then the error that cut the original read short.
struct Replay {
    buffered: Cursor<Bytes>,
    failure: Option<io::Error>,
}

impl Read for Replay {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.buffered.read(buf)?;
        if n > 0 || buf.is_empty() {
            return Ok(n);
        }
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(0),
        }
    }
}

fn preview(body: &Bytes) -> String {
    let shown = &body[..body.len().min(BODY_PREVIEW_LIMIT)];
    let mut text = String::from_utf8_lossy(shown).into_owned();
    if body.len() > BODY_PREVIEW_LIMIT {
        text.push_str(&format!("... ({} bytes total)", body.len()));
    }
    text
}

impl<E: HttpExecutor> HttpExecutor for DiagnosticExecutor<E> {
    fn execute(&self, mut request: PreparedRequest) -> Result<RawResponse, Error> {
        let body = std::mem::replace(&mut request.body, RequestBody::Empty);
        let sent = if body.is_empty() {
            None
        } else {
            // Without the wrapper the same failure surfaces from the transport.
            let bytes = body.into_bytes().map_err(Error::transport)?;
            request.body = RequestBody::Bytes(bytes.clone());
            Some(bytes)
        };

        log::debug!(
            "--> {} {} headers={:?}",
            request.method,
            request.url,
            request.headers
        );
        if let Some(bytes) = &sent {
            log::debug!("--> body: {}", preview(bytes));
        }

        let response = match self.inner.execute(request) {
            Ok(response) => response,
            Err(e) => {
                log::debug!("<-- transport failure: {}", e);
                return Err(e);
            }
        };

        let RawResponse {
            status,
            headers,
            mut body,
        } = response;

        let mut buf = Vec::new();
        let failure = body.read_to_end(&mut buf).err();
        drop(body);
        let received = Bytes::from(buf);

        log::debug!("<-- {} headers={:?}", status, headers);
        log::debug!("<-- body: {}", preview(&received));
        if let Some(e) = &failure {
            log::debug!("<-- body read failed after {} bytes: {}", received.len(), e);
        }

        Ok(RawResponse {
            status,
            headers,
            body: Box::new(Replay {
                buffered: Cursor::new(received),
                failure,
            }),
        })
    }
}
