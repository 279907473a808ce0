use std::{fmt, sync::Arc};

use crate::handler::Handler;

#[derive(Clone)]
pub(crate) struct Mount {
    pub(crate) prefix: String,
    pub(crate) handler: Arc<dyn Handler>,
}

/// Maps URL prefixes to handlers.
///
/// A handler mounted at `/static` sees `/static/app.js` as `/app.js`; the
/// longest prefix that matches on a segment boundary wins.
#[derive(Clone, Default)]
pub struct Router {
    mounts: Vec<Mount>,
}

impl Router {
    #[inline(never)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(never)]
    pub fn mount(mut self, prefix: impl Into<String>, handler: impl Handler) -> Self {
        let prefix = prefix.into();
        if prefix != "/" && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            panic!("Prefix must start with / and not end with / - got {prefix}");
        }
        if self.mounts.iter().any(|m| m.prefix == prefix) {
            panic!("Handler already mounted at {prefix}");
        }
        self.mounts.push(Mount {
            prefix,
            handler: Arc::new(handler),
        });
        self
    }

    /// Finds the handler for `path` and returns it with the path it should
    /// see, prefix removed.
    pub(crate) fn at<'p>(&self, path: &'p str) -> Option<(&Mount, &'p str)> {
        self.mounts
            .iter()
            .filter_map(|m| strip_mount(&m.prefix, path).map(|rest| (m, rest)))
            .max_by_key(|(m, _)| m.prefix.len())
    }

    pub(crate) fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.mounts.iter().map(|m| m.prefix.as_str())
    }
}

fn strip_mount<'p>(prefix: &str, path: &'p str) -> Option<&'p str> {
    if prefix == "/" {
        return Some(path);
    }
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.prefixes()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{request::Request, response::Response};

    fn noop(_: &Request, _: &mut Response) {}

    #[test]
    fn longest_prefix_wins() {
        let router = Router::new().mount("/", noop).mount("/static", noop);

        let (m, rest) = router.at("/static/app.js").unwrap();
        assert_eq!(m.prefix, "/static");
        assert_eq!(rest, "/app.js");

        let (m, rest) = router.at("/static").unwrap();
        assert_eq!(m.prefix, "/static");
        assert_eq!(rest, "/");

        let (m, rest) = router.at("/staticfoo").unwrap();
        assert_eq!(m.prefix, "/");
        assert_eq!(rest, "/staticfoo");
    }

    #[test]
    fn no_mount_no_match() {
        let router = Router::new().mount("/static", noop);
        assert!(router.at("/other").is_none());
    }

    #[test]
    #[should_panic(expected = "Prefix must start with /")]
    fn trailing_slash_prefix_panics() {
        let _ = Router::new().mount("/static/", noop);
    }
}
