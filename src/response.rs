use bytes::Bytes;
use http::{self, HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use http_body_util::Full;
use hyper::body::Body as _;
use std::fmt;

use crate::error::Error;

pub type HttpBody = Full<Bytes>;
pub type HttpResponse<T = HttpBody> = http::Response<T>;

pub struct Response {
    pub(crate) inner: HttpResponse,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[inline]
    pub fn new() -> Self {
        Response {
            inner: HttpResponse::new(HttpBody::default()),
        }
    }

    #[inline]
    pub fn status_code(&self) -> StatusCode {
        self.inner.status()
    }

    /// Sets the HTTP status for the response.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        *self.inner.status_mut() = status;
        self
    }

    /// Sets the status code and the correct status message in the body if the response body is **empty**.
    pub fn send_status(&mut self, status: StatusCode) -> &mut Self {
        self.status(status);

        if self.inner.body().size_hint().exact() == Some(0) {
            *self.inner.body_mut() = status.canonical_reason().unwrap_or("").into();
        }

        self
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        self.inner.headers()
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap<HeaderValue> {
        self.inner.headers_mut()
    }

    /// Sets one or more headers, replacing earlier values:
    /// - A single tuple: `res.set(("Content-Type", "text/plain"))?`
    /// - An array of tuples: `res.set([("Content-Type", "text/plain"), ("ETag", "123")])?`
    #[inline]
    pub fn set<H>(&mut self, headers: H) -> Result<&mut Self, Error>
    where
        H: SetIntoHeaders,
    {
        headers.into_headers(self.inner.headers_mut())?;
        Ok(self)
    }

    #[inline]
    pub fn send(&mut self, body: impl Into<HttpBody>) -> &mut Self {
        *self.inner.body_mut() = body.into();
        self
    }

    #[inline]
    pub fn content_type<V>(&mut self, value: V) -> Result<&mut Self, Error>
    where
        V: TryInto<HeaderValue>,
        Error: From<V::Error>,
    {
        self.set((header::CONTENT_TYPE, value))
    }

    /// Answers with `301 Moved Permanently` pointing at `location`.
    pub fn redirect(&mut self, location: &str) -> Result<&mut Self, Error> {
        self.set((header::LOCATION, location))?;
        Ok(self.send_status(StatusCode::MOVED_PERMANENTLY))
    }

    #[inline]
    pub(crate) fn into_inner(self) -> HttpResponse {
        self.inner
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status_code", &self.inner.status())
            .field("body", &self.inner.body())
            .finish()
    }
}

pub trait SetIntoHeaders {
    fn into_headers(self, map: &mut HeaderMap) -> Result<(), Error>;
}

impl<K, V> SetIntoHeaders for (K, V)
where
    K: TryInto<HeaderName>,
    V: TryInto<HeaderValue>,
    Error: From<K::Error> + From<V::Error>,
{
    fn into_headers(self, map: &mut HeaderMap) -> Result<(), Error> {
        let k = self.0.try_into()?;
        let v = self.1.try_into()?;
        map.insert(k, v);
        Ok(())
    }
}

impl<K, V, const N: usize> SetIntoHeaders for [(K, V); N]
where
    K: TryInto<HeaderName>,
    V: TryInto<HeaderValue>,
    Error: From<K::Error> + From<V::Error>,
{
    fn into_headers(self, map: &mut HeaderMap) -> Result<(), Error> {
        for (key, value) in self {
            let k = key.try_into()?;
            let v = value.try_into()?;
            map.insert(k, v);
        }
        Ok(())
    }
}
