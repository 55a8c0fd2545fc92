//! The Oxygen HTTP client.
//!
//! Every operation is one blocking HTTP exchange:
//!
//! | operation | verb |
//! |-----------|------|
//! | resolve   | HEAD |
//! | read      | GET (with `Range` for partial reads) |
//! | create / overwrite | POST |
//! | rename    | PATCH |
//! | delete    | DELETE |

use std::io::{self, Read};
use std::sync::Arc;

use oxygen_cache::Cache;
use serde::Serialize;

use crate::attributes::NodeAttributes;
use crate::config::ClientConfig;
use crate::diagnostics::DiagnosticExecutor;
use crate::error::{classify, Error};
use crate::executor::{HttpExecutor, ReqwestExecutor};
use crate::request::{ByteRange, RequestPreparer};
use crate::target::{Endpoint, RequestTarget};
use crate::types::{PreparedRequest, RawResponse, RequestBody};
use crate::NodeId;

/// Id of the root directory.
pub const ROOT_NODE_ID: NodeId = 1;

/// Body of a rename request: the new location, addressed by parent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PatchParameters {
    path: String,
    path_using_id: bool,
}

/// Content of a node being read.
///
/// Holds the response open. The connection is released when this is dropped
/// or [`closed`](NodeContent::close), whether or not it was read to the end.
pub struct NodeContent {
    body: Box<dyn Read + Send>,
}

impl NodeContent {
    /// Release the connection without reading further.
    pub fn close(self) {}
}

impl Read for NodeContent {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}

impl std::fmt::Debug for NodeContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeContent").finish_non_exhaustive()
    }
}

/// Client for the Oxygen storage service over HTTP.
///
/// All methods take `&self` and the client is `Send + Sync`: per-call state
/// lives on the stack, and the only shared state is the immutable
/// configuration and the optional cache.
///
/// # Example
///
/// ```ignore
/// use oxygen_http::{ByteRange, HttpClient};
///
/// let client = HttpClient::new("https://oxygen.example.com", "token")?;
/// client.create_path("docs/hello.txt", "hello".as_bytes())?;
///
/// let (attr, mut content) = client.read_path("docs/hello.txt", ByteRange::window(1, 3))?;
/// let mut text = String::new();
/// content.read_to_string(&mut text)?;
/// assert_eq!(text, "ell");
/// assert_eq!(attr.size, 5);
/// ```
pub struct HttpClient {
    endpoint: Endpoint,
    preparer: RequestPreparer,
    executor: Box<dyn HttpExecutor>,
    cache: Option<Arc<dyn Cache>>,
    logging: bool,
}

impl HttpClient {
    /// Create a client using the default configuration for `endpoint`.
    pub fn new(endpoint: &str, token: &str) -> Result<Self, Error> {
        Self::from_config(ClientConfig::new(endpoint).with_token(token))
    }

    /// Create a reqwest-backed client from a configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self, Error> {
        let executor = ReqwestExecutor::new(config.timeout())?;
        Self::with_executor(config, executor)
    }

    /// Create a client that sends requests through a custom executor.
    pub fn with_executor(
        config: ClientConfig,
        executor: impl HttpExecutor + 'static,
    ) -> Result<Self, Error> {
        let client = Self {
            endpoint: Endpoint::parse(&config.endpoint)?,
            preparer: RequestPreparer::new(&config.token)?,
            executor: Box::new(executor),
            cache: None,
            logging: false,
        };

        Ok(if config.log_exchanges {
            client.start_logging()
        } else {
            client
        })
    }

    /// Log every request and response from now on, bodies included.
    pub fn start_logging(mut self) -> Self {
        if !self.logging {
            self.executor = Box::new(DiagnosticExecutor::new(self.executor));
            self.logging = true;
        }
        self
    }

    /// Install a cache. It is evicted for every node this client modifies.
    pub fn set_cache(&mut self, cache: Arc<dyn Cache>) {
        self.cache = Some(cache);
    }

    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.set_cache(cache);
        self
    }

    pub fn cache(&self) -> Option<&Arc<dyn Cache>> {
        self.cache.as_ref()
    }

    /// Resolve the attributes of `path` starting from node `start`. An empty
    /// path resolves `start` itself.
    pub fn resolve_path_from_node(
        &self,
        start: NodeId,
        path: &str,
    ) -> Result<NodeAttributes, Error> {
        let target = self.endpoint.node_path(start, path);
        self.exchange_attributes(self.preparer.head(&target))
    }

    /// Resolve `path` starting from the root.
    pub fn resolve_path(&self, path: &str) -> Result<NodeAttributes, Error> {
        self.resolve_path_from_node(ROOT_NODE_ID, path)
    }

    pub fn resolve_node(&self, id: NodeId) -> Result<NodeAttributes, Error> {
        self.resolve_path_from_node(id, "")
    }

    /// Read a window of node `id`.
    pub fn read_node(
        &self,
        id: NodeId,
        range: ByteRange,
    ) -> Result<(NodeAttributes, NodeContent), Error> {
        self.read(&self.endpoint.node(id), range)
    }

    /// Read a window of the node at `path`.
    pub fn read_path(
        &self,
        path: &str,
        range: ByteRange,
    ) -> Result<(NodeAttributes, NodeContent), Error> {
        self.read(&self.endpoint.target(path), range)
    }

    /// Replace the content of node `id`. Only `offset == 0` is supported.
    pub fn overwrite_node<R>(
        &self,
        id: NodeId,
        offset: u64,
        data: R,
    ) -> Result<NodeAttributes, Error>
    where
        R: Read + Send + 'static,
    {
        let target = self.endpoint.node(id).overwrite();
        self.write(&target, offset, data)
    }

    /// Create or replace the node at `path`. Only `offset == 0` is supported.
    pub fn overwrite_path<R>(
        &self,
        path: &str,
        offset: u64,
        data: R,
    ) -> Result<NodeAttributes, Error>
    where
        R: Read + Send + 'static,
    {
        let target = self.endpoint.target(path).overwrite();
        self.write(&target, offset, data)
    }

    /// Create or replace `path` under node `id`. Only `offset == 0` is
    /// supported.
    pub fn overwrite_path_from_node<R>(
        &self,
        id: NodeId,
        path: &str,
        offset: u64,
        data: R,
    ) -> Result<NodeAttributes, Error>
    where
        R: Read + Send + 'static,
    {
        let target = self.endpoint.node_path(id, path).overwrite();
        self.write(&target, offset, data)
    }

    /// Create `path` under node `id`. Fails if it already exists.
    pub fn create_path_from_node<R>(
        &self,
        id: NodeId,
        path: &str,
        data: R,
    ) -> Result<NodeAttributes, Error>
    where
        R: Read + Send + 'static,
    {
        let target = self.endpoint.node_path(id, path);
        self.write(&target, 0, data)
    }

    /// Create the node at `path`. Fails if it already exists.
    pub fn create_path<R>(&self, path: &str, data: R) -> Result<NodeAttributes, Error>
    where
        R: Read + Send + 'static,
    {
        let target = self.endpoint.target(path);
        self.write(&target, 0, data)
    }

    /// Delete the entry `entry` of directory node `id`.
    pub fn delete_from_node(&self, id: NodeId, entry: &str) -> Result<(), Error> {
        let target = self.endpoint.node_path(id, entry);
        let attr = self.exchange_attributes(self.preparer.delete(&target))?;
        self.evict(attr.id);
        Ok(())
    }

    /// Move entry `old_name` of node `old_id` to `new_name` under node
    /// `new_id`, replacing anything already there.
    pub fn rename_from_node_to_node(
        &self,
        old_id: NodeId,
        old_name: &str,
        new_id: NodeId,
        new_name: &str,
    ) -> Result<(), Error> {
        let target = self.endpoint.node_path(old_id, old_name).overwrite();
        let parameters = PatchParameters {
            path: format!("/{}/{}", new_id, new_name),
            path_using_id: true,
        };
        let attr = self.exchange_attributes(self.preparer.patch(&target, &parameters)?)?;
        self.evict(attr.id);
        Ok(())
    }

    fn read(
        &self,
        target: &RequestTarget,
        range: ByteRange,
    ) -> Result<(NodeAttributes, NodeContent), Error> {
        let request = self.preparer.get(target, range)?;
        let (attr, response) = self.exchange(request)?;
        Ok((attr, NodeContent { body: response.body }))
    }

    fn write<R>(
        &self,
        target: &RequestTarget,
        offset: u64,
        data: R,
    ) -> Result<NodeAttributes, Error>
    where
        R: Read + Send + 'static,
    {
        let request = self
            .preparer
            .post(target, offset, RequestBody::Reader(Box::new(data)))?;
        let attr = self.exchange_attributes(request)?;
        self.evict(attr.id);
        Ok(attr)
    }

    /// Run an exchange whose body the caller does not need. The response is
    /// released before returning.
    fn exchange_attributes(&self, request: PreparedRequest) -> Result<NodeAttributes, Error> {
        let (attr, response) = self.exchange(request)?;
        drop(response);
        Ok(attr)
    }

    fn exchange(&self, request: PreparedRequest) -> Result<(NodeAttributes, RawResponse), Error> {
        let method = request.method;
        let url = request.url.clone();
        log::debug!("{} {}", method, url);

        let response = self.executor.execute(request).map_err(|e| {
            log::debug!("{} {} failed: {}", method, url, e);
            e
        })?;

        if !response.is_success() {
            let status = response.status;
            // Best-effort: an unreadable body classifies like an empty one.
            let body = response.into_body_bytes().unwrap_or_default();
            let error = classify(status, &body);
            log::debug!("{} {} returned {}: {}", method, url, status, error);
            return Err(error);
        }

        match NodeAttributes::from_headers(&response.headers) {
            Ok(attr) => Ok((attr, response)),
            Err(e) => {
                log::warn!(
                    "{} {} returned {} with unusable node headers: {}",
                    method,
                    url,
                    response.status,
                    e
                );
                Err(e)
            }
        }
    }

    fn evict(&self, id: NodeId) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.evict(id) {
                log::warn!("Failed to evict node {} from cache: {}", id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::NodeKind;
    use crate::codes::ErrorCode;
    use crate::executor::mock::{MockExecutor, MockResponse};
    use crate::types::Method;
    use oxygen_cache::MemoryCache;

    const ENDPOINT: &str = "http://oxygen.test";

    fn file(id: NodeId, size: i64) -> MockResponse {
        MockResponse::node(NodeAttributes {
            id,
            kind: NodeKind::File,
            size,
        })
    }

    fn client(mock: &MockExecutor) -> HttpClient {
        HttpClient::with_executor(ClientConfig::new(ENDPOINT).with_token("tok"), mock.clone())
            .unwrap()
    }

    fn read_string(mut content: NodeContent) -> String {
        let mut out = String::new();
        content.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        fn assert_send<T: Send>() {}
        assert_send_sync::<HttpClient>();
        assert_send::<NodeContent>();
    }

    #[test]
    fn resolve_operations_use_head_and_id_routing() {
        let mock = MockExecutor::new()
            .with_response(file(5, 10))
            .with_response(file(6, 0))
            .with_response(file(7, 0));
        let client = client(&mock);

        assert_eq!(client.resolve_path_from_node(3, "a/b").unwrap().id, 5);
        assert_eq!(client.resolve_path("docs").unwrap().id, 6);
        assert_eq!(client.resolve_node(7).unwrap().id, 7);

        let urls: Vec<String> = mock
            .recorded_requests()
            .iter()
            .map(|r| {
                assert_eq!(r.method, Method::HEAD);
                assert_eq!(r.header("authorization"), Some("tok"));
                r.url.to_string()
            })
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://oxygen.test/3/a/b?id=true",
                "http://oxygen.test/1/docs?id=true",
                "http://oxygen.test/7?id=true",
            ]
        );
    }

    #[test]
    fn read_node_sends_range_and_returns_stream() {
        let mock =
            MockExecutor::new().with_response(file(4, 20).with_status(206).with_body("01234"));
        let client = client(&mock);

        let (attr, content) = client.read_node(4, ByteRange::window(10, 5)).unwrap();
        assert_eq!(attr.size, 20);
        assert_eq!(read_string(content), "01234");

        let recorded = &mock.recorded_requests()[0];
        assert_eq!(recorded.method, Method::GET);
        assert_eq!(recorded.url.as_str(), "http://oxygen.test/4?id=true");
        assert_eq!(recorded.header("range"), Some("bytes=10-14"));
    }

    #[test]
    fn read_path_is_not_id_routed() {
        let mock = MockExecutor::new().with_response(file(9, 3).with_body("abc"));
        let client = client(&mock);

        let (_, content) = client.read_path("a/b", ByteRange::starting_at(10)).unwrap();
        content.close();

        let recorded = &mock.recorded_requests()[0];
        assert_eq!(recorded.url.as_str(), "http://oxygen.test/a/b");
        assert_eq!(recorded.header("range"), Some("bytes=10-"));
    }

    #[test]
    fn full_read_sends_no_range() {
        let mock = MockExecutor::new().with_response(file(9, 3).with_body("abc"));
        let client = client(&mock);

        let (_, content) = client.read_node(9, ByteRange::full()).unwrap();
        assert_eq!(read_string(content), "abc");
        assert_eq!(mock.recorded_requests()[0].header("range"), None);
    }

    #[test]
    fn write_variants_build_expected_targets() {
        let mock = MockExecutor::new()
            .with_response(file(1, 1))
            .with_response(file(2, 1))
            .with_response(file(3, 1))
            .with_response(file(4, 1))
            .with_response(file(5, 1));
        let client = client(&mock);

        client.overwrite_node(7, 0, "a".as_bytes()).unwrap();
        client.overwrite_path("x/y", 0, "b".as_bytes()).unwrap();
        client.overwrite_path_from_node(3, "y", 0, "c".as_bytes()).unwrap();
        client.create_path_from_node(3, "z", "d".as_bytes()).unwrap();
        client.create_path("x/z", "e".as_bytes()).unwrap();

        let recorded = mock.recorded_requests();
        let shapes: Vec<(String, &[u8])> = recorded
            .iter()
            .map(|r| {
                assert_eq!(r.method, Method::POST);
                (r.url.to_string(), &r.body[..])
            })
            .collect();
        assert_eq!(
            shapes,
            vec![
                ("http://oxygen.test/7?id=true&overwrite=true".to_string(), &b"a"[..]),
                ("http://oxygen.test/x/y?overwrite=true".to_string(), &b"b"[..]),
                ("http://oxygen.test/3/y?id=true&overwrite=true".to_string(), &b"c"[..]),
                ("http://oxygen.test/3/z?id=true".to_string(), &b"d"[..]),
                ("http://oxygen.test/x/z".to_string(), &b"e"[..]),
            ]
        );
    }

    #[test]
    fn nonzero_write_offset_fails_without_network() {
        let mock = MockExecutor::new();
        let client = client(&mock);

        let results = vec![
            client.overwrite_node(7, 1, "a".as_bytes()),
            client.overwrite_path("x", 5, "a".as_bytes()),
            client.overwrite_path_from_node(3, "y", u64::MAX, "a".as_bytes()),
        ];

        for result in results {
            let err = result.unwrap_err();
            assert!(matches!(err, Error::WriteOffsetNotSupported { .. }));
            assert!(err.is_precondition());
        }
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn empty_read_window_fails_without_network() {
        let mock = MockExecutor::new();
        let client = client(&mock);

        let err = client.read_node(1, ByteRange::window(0, 0)).unwrap_err();
        assert!(matches!(err, Error::EmptyRange));
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn rename_patches_with_new_location() {
        let mock = MockExecutor::new().with_response(file(7, 0));
        let client = client(&mock);

        client.rename_from_node_to_node(3, "x", 9, "y").unwrap();

        let recorded = &mock.recorded_requests()[0];
        assert_eq!(recorded.method, Method::PATCH);
        assert_eq!(
            recorded.url.as_str(),
            "http://oxygen.test/3/x?id=true&overwrite=true"
        );
        assert_eq!(&recorded.body[..], br#"{"path":"/9/y","path_using_id":true}"#);
    }

    #[test]
    fn rename_addresses_the_old_entry_by_its_parent_id() {
        let mock = MockExecutor::new().with_response(file(11, 0));
        let client = client(&mock);

        client.rename_from_node_to_node(7, "x", 9, "y").unwrap();

        let recorded = &mock.recorded_requests()[0];
        assert_eq!(recorded.url.path(), "/7/x");
        assert_eq!(recorded.url.query(), Some("id=true&overwrite=true"));
        assert_eq!(&recorded.body[..], br#"{"path":"/9/y","path_using_id":true}"#);
    }

    #[test]
    fn delete_targets_entry_of_node() {
        let mock = MockExecutor::new().with_response(file(12, 0));
        let client = client(&mock);

        client.delete_from_node(3, "old.txt").unwrap();

        let recorded = &mock.recorded_requests()[0];
        assert_eq!(recorded.method, Method::DELETE);
        assert_eq!(recorded.url.as_str(), "http://oxygen.test/3/old.txt?id=true");
        assert!(recorded.body.is_empty());
    }

    #[test]
    fn success_without_node_id_is_a_decode_failure() {
        for status in [200, 201, 204, 206] {
            let mock = MockExecutor::new().with_response(
                MockResponse::new(status)
                    .with_header("Node-Type", "file")
                    .with_header("Node-Size", "5"),
            );
            let client = client(&mock);

            let err = client.resolve_node(3).unwrap_err();
            assert!(matches!(err, Error::MissingNodeId), "status {}", status);
            assert!(err.is_decode());
        }

        let mock = MockExecutor::new().with_response(MockResponse::new(200));
        let err = client(&mock).delete_from_node(1, "a").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn forbidden_is_classified_by_body_code() {
        let body = format!(r#"{{"code": {}}}"#, ErrorCode::DirectoryNotEmpty.code());
        let mock = MockExecutor::new()
            .with_response(MockResponse::new(403).with_body(body))
            .with_response(MockResponse::new(403));
        let client = client(&mock);

        assert!(matches!(
            client.delete_from_node(1, "dir"),
            Err(Error::DirectoryNotEmpty)
        ));
        assert!(matches!(
            client.delete_from_node(1, "dir"),
            Err(Error::InsufficientPermissions { .. })
        ));
    }

    #[test]
    fn other_failures_are_classified() {
        let mock = MockExecutor::new()
            .with_response(MockResponse::new(416).with_body("garbage"))
            .with_response(MockResponse::new(404));
        let client = client(&mock);

        assert!(matches!(
            client.read_node(1, ByteRange::starting_at(100)),
            Err(Error::RangeNotSatisfiable)
        ));
        assert!(matches!(
            client.resolve_path("missing"),
            Err(Error::RequestFailed { status: 404, .. })
        ));
    }

    #[test]
    fn error_responses_never_decode_attributes() {
        // Node headers on an error response are ignored.
        let mock = MockExecutor::new().with_response(file(3, 3).with_status(500));
        let err = client(&mock).resolve_node(3).unwrap_err();
        assert!(matches!(err, Error::RequestFailed { status: 500, .. }));
    }

    #[test]
    fn transport_failures_are_not_classified() {
        let mock = MockExecutor::new().fail_with("connection refused");
        let err = client(&mock).resolve_node(1).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn logging_does_not_change_results() {
        let mock = MockExecutor::new()
            .with_response(file(4, 5).with_body("hello"))
            .with_response(MockResponse::new(403).with_body(r#"{"code": 35}"#));
        let client = client(&mock).start_logging().start_logging();

        let (attr, content) = client.read_node(4, ByteRange::full()).unwrap();
        assert_eq!(attr.size, 5);
        assert_eq!(read_string(content), "hello");

        assert!(matches!(
            client.delete_from_node(1, "dir"),
            Err(Error::DirectoryNotEmpty)
        ));
    }

    #[test]
    fn logging_keeps_classification_of_unreadable_error_bodies() {
        let broken_forbidden = || {
            MockResponse::new(403)
                .with_body(r#"{"co"#)
                .with_broken_body(io::ErrorKind::ConnectionReset)
        };

        let plain = client(&MockExecutor::new().with_response(broken_forbidden()));
        let logged =
            client(&MockExecutor::new().with_response(broken_forbidden())).start_logging();

        for client in [plain, logged] {
            let err = client.delete_from_node(1, "dir").unwrap_err();
            assert!(
                matches!(err, Error::InsufficientPermissions { code: None, .. }),
                "{:?}",
                err
            );
        }
    }

    #[test]
    fn logging_keeps_content_read_failures() {
        let broken_file = || {
            file(4, 10)
                .with_body("01234")
                .with_broken_body(io::ErrorKind::ConnectionReset)
        };

        let plain = client(&MockExecutor::new().with_response(broken_file()));
        let logged = client(&MockExecutor::new().with_response(broken_file())).start_logging();

        for client in [plain, logged] {
            let (attr, mut content) = client.read_node(4, ByteRange::full()).unwrap();
            assert_eq!(attr.size, 10);

            let mut buf = Vec::new();
            let err = content.read_to_end(&mut buf).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
            assert_eq!(buf, b"01234");
        }
    }

    #[test]
    fn logging_from_config() {
        let mock = MockExecutor::new().with_response(file(1, 0));
        let client = HttpClient::with_executor(
            ClientConfig::new(ENDPOINT).with_exchange_logging(true),
            mock.clone(),
        )
        .unwrap();
        assert!(client.logging);

        client
            .create_path("f", std::io::Cursor::new(b"body".to_vec()))
            .unwrap();
        assert_eq!(&mock.recorded_requests()[0].body[..], b"body");
    }

    #[test]
    fn writes_evict_the_cached_node() {
        let cache = Arc::new(MemoryCache::new());
        cache.put(7, &mut "stale".as_bytes()).unwrap();
        cache.put(8, &mut "stale".as_bytes()).unwrap();
        cache.put(9, &mut "keep".as_bytes()).unwrap();

        let mock = MockExecutor::new()
            .with_response(file(7, 3))
            .with_response(file(8, 0));
        let client = client(&mock).with_cache(cache.clone());

        client.overwrite_node(7, 0, "new".as_bytes()).unwrap();
        client.delete_from_node(1, "eight").unwrap();

        assert!(!cache.contains(7));
        assert!(!cache.contains(8));
        assert!(cache.contains(9));
    }

    #[test]
    fn failed_writes_leave_cache_alone() {
        let cache = Arc::new(MemoryCache::new());
        cache.put(7, &mut "cached".as_bytes()).unwrap();

        let mock = MockExecutor::new().with_response(MockResponse::new(500));
        let mut client = client(&mock);
        client.set_cache(cache.clone());
        assert!(client.cache().is_some());

        assert!(client.overwrite_node(7, 0, "new".as_bytes()).is_err());
        assert!(cache.contains(7));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mock = MockExecutor::new();
        assert!(matches!(
            HttpClient::with_executor(ClientConfig::new("::nope::"), mock.clone()),
            Err(Error::InvalidEndpoint(_))
        ));
        assert!(matches!(
            HttpClient::with_executor(ClientConfig::new(ENDPOINT).with_token("a\nb"), mock),
            Err(Error::InvalidHeaderValue(_))
        ));
    }
}
