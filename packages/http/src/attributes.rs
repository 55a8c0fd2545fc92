//! Node attributes carried in response headers.
//!
//! Every successful response describes the node it touched with three
//! headers: `Node-Id` (mandatory), `Node-Type` and `Node-Size`.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::NodeId;

pub const NODE_ID_HEADER: HeaderName = HeaderName::from_static("node-id");
pub const NODE_TYPE_HEADER: HeaderName = HeaderName::from_static("node-type");
pub const NODE_SIZE_HEADER: HeaderName = HeaderName::from_static("node-size");

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Invalid,
    Directory,
    File,
}

impl NodeKind {
    /// Map a `Node-Type` header value. Anything unrecognised is `Invalid`.
    pub fn from_header(value: &str) -> Self {
        match value {
            "directory" => NodeKind::Directory,
            "file" => NodeKind::File,
            _ => NodeKind::Invalid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Invalid => "invalid",
            NodeKind::Directory => "directory",
            NodeKind::File => "file",
        }
    }
}

/// Attributes of a node, as reported by the service on a successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttributes {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Content length in bytes.
    pub size: i64,
}

impl NodeAttributes {
    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Decode the node headers of a 2xx response.
    ///
    /// A missing or non-numeric id fails the call. A missing or malformed size
    /// is zero.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, Error> {
        let id_value = headers
            .get(NODE_ID_HEADER)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingNodeId)?;

        let id = id_value
            .parse::<NodeId>()
            .map_err(|_| Error::InvalidNodeId { value: id_value })?;

        let size = header_str(headers, &NODE_SIZE_HEADER)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);

        let kind = header_str(headers, &NODE_TYPE_HEADER)
            .map(NodeKind::from_header)
            .unwrap_or_default();

        Ok(Self { id, kind, size })
    }

    /// Encode these attributes as response headers.
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(NODE_ID_HEADER, HeaderValue::from(self.id));
        headers.insert(NODE_TYPE_HEADER, HeaderValue::from_static(self.kind.as_str()));
        headers.insert(NODE_SIZE_HEADER, HeaderValue::from(self.size));
        headers
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
