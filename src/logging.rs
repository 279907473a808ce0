use std::{fmt, time::Duration};

use http::{Method, StatusCode};

pub(crate) struct FormattedDuration(pub(crate) Duration);

impl fmt::Display for FormattedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos() as u64;
        if nanos >= 1_000_000_000 {
            let ms = nanos / 1_000_000;
            write!(f, "{}.{:03}s", ms / 1000, ms % 1000)
        } else if nanos >= 1_000_000 {
            let us = nanos / 1_000;
            write!(f, "{}.{:03}ms", us / 1000, us % 1000)
        } else {
            write!(f, "{}.{:03}µs", nanos / 1000, nanos % 1000)
        }
    }
}

/// One access-log line per request.
pub(crate) fn log_request(
    status: StatusCode,
    elapsed: Duration,
    peer: std::net::SocketAddr,
    method: &Method,
    path: &str,
) {
    tracing::info!(
        "{} | {:^10} | {} | {:^7} | {}",
        status.as_u16(),
        FormattedDuration(elapsed),
        peer,
        method.as_str(),
        path,
    );
}
