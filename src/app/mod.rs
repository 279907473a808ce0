use std::{borrow::Cow, convert::Infallible, net, sync::Arc, time::Instant};

use http::{Method, StatusCode};
use hyper::{Request as HyperRequest, body::Incoming as IncomingBody};
use hyper_util::rt::{TokioExecutor, TokioIo};
use percent_encoding::percent_decode_str;
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;

pub(crate) mod config;

use crate::{
    error::Error,
    logging,
    request::Request,
    response::{HttpBody, HttpResponse, Response},
    router::Router,
};

/// Where the demo server listens unless told otherwise.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8088";

pub struct App {
    pub(crate) router: Router,
    pub(crate) config: config::Config,
    dump_routes: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        App {
            router: Router::new(),
            config: config::Config::default(),
            dump_routes: false,
        }
    }

    pub fn config(mut self, config: config::Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the router for the application.
    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Logs the mounted prefixes at startup.
    pub fn dump_routes(mut self, enable: bool) -> Self {
        self.dump_routes = enable;
        self
    }
}

impl App {
    /// Listen with ctrl+c shutdown
    pub async fn listen<A>(self, addr: A) -> Result<(), Error>
    where
        A: net::ToSocketAddrs + std::fmt::Debug,
    {
        let token = CancellationToken::new();
        let t = token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => t.cancel(),
                Err(e) => tracing::warn!("failed to install CTRL+C signal handler: {e}"),
            }
        });
        self.listen_shutdown(addr, token).await
    }

    /// Listen with custom shutdown signal
    pub async fn listen_shutdown<A>(self, addr: A, shutdown: CancellationToken) -> Result<(), Error>
    where
        A: net::ToSocketAddrs + std::fmt::Debug,
    {
        let listener = bind(addr).await?;
        serve(Arc::new(self), listener, shutdown).await;
        Ok(())
    }

    /// Binds `addr` and serves on a background task.
    ///
    /// The socket is bound before this returns, so requests can be sent right
    /// away. The server stops when the returned handle is shut down or
    /// dropped.
    pub async fn spawn<A>(self, addr: A) -> Result<ServerHandle, Error>
    where
        A: net::ToSocketAddrs + std::fmt::Debug,
    {
        let listener = bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(serve(Arc::new(self), listener, shutdown.clone()));

        Ok(ServerHandle {
            local_addr,
            shutdown,
            task: Some(task),
        })
    }
}

/// A server running on a background task.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: net::SocketAddr,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    #[inline]
    pub fn local_addr(&self) -> net::SocketAddr {
        self.local_addr
    }

    /// `http://<local addr><path>`
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.local_addr, path)
    }

    /// Stops accepting connections and waits for open ones to drain.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("server task failed: {e}");
            }
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn bind<A>(addr: A) -> Result<TcpListener, Error>
where
    A: net::ToSocketAddrs + std::fmt::Debug,
{
    let addr = addr
        .to_socket_addrs()?
        .next()
        .ok_or(Error::FailedToParseAddr)?;

    Ok(TcpListener::bind(addr).await?)
}

async fn serve(app: Arc<App>, listener: TcpListener, shutdown: CancellationToken) {
    if app.dump_routes {
        tracing::info!("App Router: {:#?}", app.router);
    }

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Http app listening on http://{}", addr),
        Err(e) => tracing::warn!("listening on an unknown address: {e}"),
    }

    let server = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new());
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();

    let _ = shutdown
        .run_until_cancelled(async {
            loop {
                let (stream, peer_addr) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::debug!("failed to accept connection: {e}");
                        continue;
                    }
                };
                let io = TokioIo::new(stream);
                let app = app.clone();
                let service = hyper::service::service_fn(move |req| {
                    handle_request(req, app.clone(), peer_addr)
                });

                let conn = server.serve_connection_with_upgrades(io, service);
                let fut = graceful.watch(conn.into_owned());
                tokio::spawn(async move {
                    if let Err(e) = fut.await {
                        tracing::trace!("connection failed: {e:?}");
                    }
                });
            }
        })
        .await;

    tracing::info!("Shutdown signal received!");

    tracing::info!(
        "Waiting for connections to close (timeout: {:?})...",
        app.config.shutdown_timeout
    );

    match tokio::time::timeout(app.config.shutdown_timeout, graceful.shutdown()).await {
        Ok(_) => tracing::info!("All connections closed!"),
        Err(_) => tracing::info!("Shutdown timed out!"),
    }
}

async fn handle_request(
    request: HyperRequest<IncomingBody>,
    app: Arc<App>,
    peer_addr: net::SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let (parts, _body) = request.into_parts();
    let method = parts.method.clone();
    let path = normalize_path(parts.uri.path()).into_owned();

    let mut res = Response::new();
    match app.router.at(&path) {
        Some((mount, rest)) => {
            let req = Request::new(parts, rest.to_owned(), peer_addr);
            mount.handler.call(&req, &mut res);
        }
        None => {
            tracing::debug!("requested path not found: {path}");
            res.send_status(StatusCode::NOT_FOUND);
        }
    }

    if method == Method::HEAD {
        *res.inner.body_mut() = HttpBody::default();
    }

    if app.config.log_requests {
        logging::log_request(
            res.status_code(),
            started.elapsed(),
            peer_addr,
            &method,
            &path,
        );
    }

    Ok(res.into_inner())
}

/// Percent-decodes the path and turns backslashes into slashes. Trailing
/// slashes are kept; the file server redirects on them.
fn normalize_path(s: &str) -> Cow<'_, str> {
    let decoded = percent_decode_str(s).decode_utf8_lossy();
    if decoded.contains('\\') {
        Cow::Owned(decoded.replace('\\', "/"))
    } else {
        decoded
    }
}
