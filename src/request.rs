use std::net::SocketAddr;

use http::{HeaderMap, HeaderValue, Method, Uri, header::AsHeaderName};

pub struct Request {
    pub(crate) parts: http::request::Parts,
    /// The path left after the router stripped the mount prefix. Always
    /// starts with `/`.
    pub(crate) path: String,
    pub(crate) ip: SocketAddr,
}

impl Request {
    #[inline]
    pub(crate) fn new(parts: http::request::Parts, path: String, peer_addr: SocketAddr) -> Self {
        Request {
            parts,
            path,
            ip: peer_addr,
        }
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Request path relative to the mount point.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        &self.parts.headers
    }

    /// Returns the specified Header value as a &str.
    #[inline]
    pub fn header<K>(&self, key: K) -> Option<&str>
    where
        K: AsHeaderName,
    {
        self.parts.headers.get(key).and_then(|v| v.to_str().ok())
    }

    #[inline]
    pub fn ip(&self) -> SocketAddr {
        self.ip
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", self.method())
            .field("uri", self.uri())
            .field("path", &self.path)
            .finish()
    }
}
