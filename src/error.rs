use std::{convert::Infallible, io};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}: file does not exist")]
    NotFound(String),

    #[error("{0}: invalid path")]
    InvalidPath(String),

    #[error("{0}: is a directory")]
    IsDir(String),

    #[error("{0}: not a directory")]
    NotDir(String),

    #[error("failed to decode: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse address")]
    FailedToParseAddr,

    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}

impl Error {
    /// True for lookups that missed, as opposed to malformed input.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<Infallible> for Error {
    fn from(_: Infallible) -> Self {
        panic!("Infallible can never be constructed")
    }
}
