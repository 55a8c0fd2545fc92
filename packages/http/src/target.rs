//! Request URL construction.
//!
//! A [`RequestTarget`] is an immutable value: each augmentation consumes the
//! target and returns a new one, so two augmentations can never overwrite each
//! other. Nothing here validates the path; a malformed node id is the
//! service's to reject.
//!
//! Each path segment is percent-encoded on its own, `%` and all, so a name
//! always reaches the service as the name the caller gave. `.` and `..`
//! segments are dropped: a target never climbs above the node it starts from.

use url::Url;

use crate::NodeId;

const ID_QUERY: &str = "id=true";
const OVERWRITE_QUERY: &str = "overwrite=true";

/// The service endpoint every target is built on.
///
/// Holds the scheme, host and an optional base path taken from the configured
/// endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    /// Parse an endpoint such as `https://oxygen.example.com` or
    /// `http://localhost:8080/api/`.
    pub fn parse(endpoint: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(endpoint)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::SetHostOnCannotBeABaseUrl);
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    /// Target a path relative to the endpoint.
    pub fn target(&self, path: &str) -> RequestTarget {
        RequestTarget {
            base: self.base.clone(),
            path: path.trim_start_matches('/').to_string(),
            route_by_id: false,
            overwrite: false,
        }
    }

    /// `/{id}`, routed by id.
    pub fn node(&self, id: NodeId) -> RequestTarget {
        self.target(&id.to_string()).route_by_id()
    }

    /// `/{id}/{path}`, routed by id. An empty `path` targets the node itself.
    pub fn node_path(&self, id: NodeId, path: &str) -> RequestTarget {
        if path.is_empty() {
            self.node(id)
        } else {
            self.target(&format!("{}/{}", id, path)).route_by_id()
        }
    }
}

/// One request URL plus its query flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    base: Url,
    path: String,
    route_by_id: bool,
    overwrite: bool,
}

impl RequestTarget {
    /// Treat the leading path segment as a numeric node id rather than a name.
    pub fn route_by_id(mut self) -> Self {
        self.route_by_id = true;
        self
    }

    /// Replace an existing node at the target instead of rejecting the write.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// `id=true` and `overwrite=true` joined by `&`, each at most once.
    pub fn query(&self) -> Option<String> {
        let flags: Vec<&str> = [
            (self.route_by_id, ID_QUERY),
            (self.overwrite, OVERWRITE_QUERY),
        ]
        .into_iter()
        .filter_map(|(set, flag)| set.then_some(flag))
        .collect();

        if flags.is_empty() {
            None
        } else {
            Some(flags.join("&"))
        }
    }

    /// Render the full URL.
    pub fn to_url(&self) -> Url {
        let mut url = self.base.clone();
        // Endpoint::parse rejects cannot-be-a-base URLs, so segments exist.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(self.path.split('/'));
        }
        url.set_query(self.query().as_deref());
        url
    }
}
