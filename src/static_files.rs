use std::{
    borrow::Cow,
    fmt::Write as _,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use bytes::Bytes;
use http::{Method, StatusCode, header};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rust_embed::{EmbeddedFile, RustEmbed};

use crate::{
    bundle::{Bundle, DirEntry},
    error::Error,
    handler::Handler,
    request::Request,
    response::Response,
};

/// Serves the files of a [`Bundle`] over HTTP.
///
/// Directories answer with their index file when the bundle has one and with
/// a generated listing otherwise. Content types are guessed from the file
/// extension.
pub struct FileServer<E> {
    bundle: Bundle<E>,
    index: &'static str,
    max_age: u32,
    listing: bool,
}

impl<E: RustEmbed> FileServer<E> {
    pub fn new(bundle: Bundle<E>) -> Self {
        Self {
            bundle,
            index: "index.html",
            max_age: 0,
            listing: true,
        }
    }

    /// Sets the file served for directory requests. An empty name turns index
    /// lookup off.
    pub fn index(mut self, file: &'static str) -> Self {
        self.index = file.trim_matches('/');
        self
    }

    /// Adds `Cache-Control: max-age=<seconds>` to served files. `0` leaves the
    /// header out.
    pub fn max_age(mut self, seconds: u32) -> Self {
        self.max_age = seconds;
        self
    }

    /// Whether directories without an index file get a generated listing.
    /// When disabled they answer 404.
    pub fn listing(mut self, enable: bool) -> Self {
        self.listing = enable;
        self
    }

    fn serve(&self, req: &Request, res: &mut Response) -> Result<(), Error> {
        if req.method() != Method::GET && req.method() != Method::HEAD {
            tracing::debug!("method not allowed: {} {}", req.method(), req.path());
            res.set((header::ALLOW, "GET, HEAD"))?;
            res.send_status(StatusCode::METHOD_NOT_ALLOWED);
            return Ok(());
        }

        let raw = req.path();
        if !self.index.is_empty()
            && raw
                .strip_suffix(self.index)
                .is_some_and(|dir| dir.ends_with('/'))
        {
            res.redirect("./")?;
            return Ok(());
        }

        let cleaned = clean_path(raw);
        let name = match cleaned.trim_start_matches('/') {
            "" => ".",
            name => name,
        };
        // Last segment of the raw path, so a trailing `.` or `..` stays relative.
        let base = match raw.trim_end_matches('/').rsplit('/').next() {
            Some("") | None => ".",
            Some(base) => base,
        };

        if self.bundle.is_dir(name) {
            if !raw.ends_with('/') {
                res.redirect(&format!("{base}/"))?;
                return Ok(());
            }

            if !self.index.is_empty() {
                let index = if name == "." {
                    self.index.to_owned()
                } else {
                    format!("{name}/{}", self.index)
                };
                if let Ok(file) = self.bundle.open(&index) {
                    return self.send_file(req, res, &index, file);
                }
            }

            if !self.listing {
                res.send_status(StatusCode::NOT_FOUND);
                return Ok(());
            }
            let entries = self.bundle.read_dir(name)?;
            return send_listing(res, &entries);
        }

        match self.bundle.open(name) {
            Ok(_) if raw.ends_with('/') => {
                res.redirect(&format!("../{base}"))?;
                Ok(())
            }
            Ok(file) => self.send_file(req, res, name, file),
            Err(Error::NotFound(_) | Error::InvalidPath(_)) => {
                tracing::debug!("file not found in bundle: {name}");
                res.send_status(StatusCode::NOT_FOUND);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn send_file(
        &self,
        req: &Request,
        res: &mut Response,
        name: &str,
        file: EmbeddedFile,
    ) -> Result<(), Error> {
        let mime = mime_guess::from_path(name).first_or_octet_stream();
        res.content_type(mime.as_ref())?;

        if self.max_age > 0 {
            res.set((header::CACHE_CONTROL, format!("max-age={}", self.max_age)))?;
        }

        if let Some(secs) = file.metadata.last_modified() {
            let modified = UNIX_EPOCH + Duration::from_secs(secs);
            res.set((header::LAST_MODIFIED, httpdate::fmt_http_date(modified)))?;

            if not_modified_since(req, modified) {
                res.status(StatusCode::NOT_MODIFIED);
                return Ok(());
            }
        }

        let body = match file.data {
            Cow::Borrowed(data) => Bytes::from_static(data),
            Cow::Owned(data) => Bytes::from(data),
        };
        res.status(StatusCode::OK).send(body);
        Ok(())
    }
}

impl<E: RustEmbed + 'static> Handler for FileServer<E> {
    fn call(&self, req: &Request, res: &mut Response) {
        if let Err(e) = self.serve(req, res) {
            tracing::warn!("failed to serve {}: {e}", req.path());
            res.send_status(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn not_modified_since(req: &Request, modified: SystemTime) -> bool {
    req.header(header::IF_MODIFIED_SINCE)
        .and_then(|v| httpdate::parse_http_date(v).ok())
        .is_some_and(|since| modified <= since)
}

fn send_listing(res: &mut Response, entries: &[DirEntry]) -> Result<(), Error> {
    let mut html = String::from(
        "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n",
    );
    for entry in entries {
        let suffix = if entry.is_dir() { "/" } else { "" };
        let _ = writeln!(
            html,
            "<a href=\"{}{suffix}\">{}{suffix}</a>",
            escape_href(entry.name()),
            escape_html(entry.name()),
        );
    }
    html.push_str("</pre>\n");

    res.content_type("text/html; charset=utf-8")?;
    res.status(StatusCode::OK).send(html);
    Ok(())
}

/// Resolves `.`, `..` and repeated slashes. The result is rooted and never
/// climbs above `/`.
pub(crate) fn clean_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for elem in path.split('/') {
        match elem {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            elem => parts.push(elem),
        }
    }

    let mut out = String::with_capacity(path.len() + 1);
    for part in &parts {
        out.push('/');
        out.push_str(part);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            ch => out.push(ch),
        }
    }
    Cow::Owned(out)
}

// Everything outside the unreserved set. A `:` is encoded too, otherwise a
// relative link could read as a scheme.
const HREF: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn escape_href(s: &str) -> Cow<'_, str> {
    utf8_percent_encode(s, HREF).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_path_resolves_dots() {
        assert_eq!(clean_path(""), "/");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("/sample1.json"), "/sample1.json");
        assert_eq!(clean_path("//docs///guide.txt"), "/docs/guide.txt");
        assert_eq!(clean_path("/docs/./guide.txt"), "/docs/guide.txt");
        assert_eq!(clean_path("/docs/../sample1.json"), "/sample1.json");
        assert_eq!(clean_path("/../../etc/passwd"), "/etc/passwd");
        assert_eq!(clean_path("/docs/"), "/docs");
    }

    #[test]
    fn escapes() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&#34;c&#39;");
        assert!(matches!(escape_html("plain.txt"), Cow::Borrowed(_)));

        assert_eq!(escape_href("sample1.json"), "sample1.json");
        assert_eq!(escape_href("a b:c"), "a%20b%3Ac");
        assert_eq!(escape_href("é"), "%C3%A9");
    }
}
