//! Asset bundles compiled into the binary, read back as files, listed as
//! directories, decoded as JSON and served over HTTP.

pub use http_body_util;
pub use hyper;
pub use rust_embed;

mod app;
pub mod assets;
mod bundle;
mod error;
mod handler;
mod logging;
mod record;
mod request;
mod response;
mod router;
mod static_files;

pub mod prelude {
    pub use crate::app::{App, DEFAULT_ADDR, ServerHandle};
    pub use crate::bundle::{Bundle, DirEntry};
    pub use crate::error::Error as EmbedError;
    pub use crate::handler::Handler;
    pub use crate::record::Sample1;
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use crate::router::Router;
    pub use crate::static_files::FileServer;
    pub use http::StatusCode;
    pub use http::method::Method;
}

pub use crate::bundle::valid_path;
pub use crate::error::Error;
pub use crate::response::{HttpBody, HttpResponse};
pub use app::config::Config;
pub use tokio_util::sync::CancellationToken;
