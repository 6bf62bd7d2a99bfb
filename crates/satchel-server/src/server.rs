//! HTTP server hosting one endpoint.
//!
//! Every request is collected into memory, served by the endpoint on the
//! blocking pool into a [`BufferedResponse`], and written back by Hyper.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use satchel_core::{BufferedResponse, Endpoint};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::shutdown::{ConnectionTracker, ShutdownSignal};
use crate::{ServerConfig, ServerError};

type HttpResponse = Response<Full<Bytes>>;

/// An HTTP server for a single [`Endpoint`].
///
/// # Example
///
/// ```rust,ignore
/// use satchel_server::{Server, ServerConfig, ShutdownSignal};
///
/// let bound = Server::new(ServerConfig::default(), endpoint).bind().await?;
/// println!("listening on {}", bound.local_addr());
/// bound.serve(ShutdownSignal::with_os_signals()).await?;
/// ```
pub struct Server {
    config: ServerConfig,
    endpoint: Arc<dyn Endpoint>,
}

impl Server {
    /// Creates a server for `endpoint`.
    pub fn new<E: Endpoint>(config: ServerConfig, endpoint: E) -> Self {
        Self::from_shared(config, Arc::new(endpoint))
    }

    /// Creates a server for an already shared endpoint.
    pub fn from_shared(config: ServerConfig, endpoint: Arc<dyn Endpoint>) -> Self {
        Self { config, endpoint }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the listener without accepting connections yet.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        Ok(BoundServer {
            listener,
            local_addr,
            shared: Arc::new(Shared {
                endpoint: self.endpoint,
                max_body_bytes: self.config.max_body_bytes(),
            }),
            config: self.config,
        })
    }

    /// Binds and serves until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Binds and serves until `shutdown` is triggered.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        self.bind().await?.serve(shutdown).await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A server whose listener is bound.
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    shared: Arc<Shared>,
    config: ServerConfig,
}

struct Shared {
    endpoint: Arc<dyn Endpoint>,
    max_body_bytes: usize,
}

impl BoundServer {
    /// Returns the address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until `shutdown` is triggered, then waits for open
    /// connections up to the shutdown timeout.
    pub async fn serve(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let tracker = ConnectionTracker::new();
        info!(addr = %self.local_addr, "server listening");

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let shared = Arc::clone(&self.shared);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(shared, stream, shutdown).await {
                                debug!(remote_addr = %remote_addr, error = %e, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => error!(error = %e, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    info!("shutdown triggered, no longer accepting connections");
                    break;
                }
            }
        }

        let timeout = self.config.shutdown_timeout();
        info!(
            active = tracker.active_connections(),
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "draining connections"
        );

        if tokio::time::timeout(timeout, tracker.wait_for_drain())
            .await
            .is_err()
        {
            warn!(
                active = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            );
        }

        info!("server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for BoundServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundServer")
            .field("local_addr", &self.local_addr)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn serve_connection(
    shared: Arc<Shared>,
    stream: TcpStream,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let service = service_fn(move |request: Request<Incoming>| {
        let shared = Arc::clone(&shared);
        async move { Ok::<_, Infallible>(handle_request(&shared, request).await) }
    });

    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}

async fn handle_request(shared: &Shared, request: Request<Incoming>) -> HttpResponse {
    let (parts, body) = request.into_parts();
    debug!(method = %parts.method, path = parts.uri.path(), "request received");

    let body = match Limited::new(body, shared.max_body_bytes).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            warn!(limit = shared.max_body_bytes, "request body too large");
            return plain(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
        }
        Err(e) => {
            warn!(error = %e, "failed to read request body");
            return plain(StatusCode::BAD_REQUEST, "failed to read request body");
        }
    };

    let request = Request::from_parts(parts, body);
    let endpoint = Arc::clone(&shared.endpoint);

    let served = tokio::task::spawn_blocking(move || {
        let mut response = BufferedResponse::new();
        endpoint.serve(&mut response, &request);
        response.into_http()
    })
    .await;

    match served {
        Ok(response) => response.map(Full::new),
        Err(e) => {
            error!(error = %e, "endpoint panicked");
            plain(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

fn plain(status: StatusCode, message: &'static str) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::from_static(message.as_bytes())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_core::ResponseSink;
    use std::io::Write;

    fn hello(sink: &mut dyn ResponseSink, _request: &Request<Bytes>) {
        let _ = sink.write_all(b"hello");
    }

    #[test]
    fn test_plain_response() {
        let response = plain(StatusCode::PAYLOAD_TOO_LARGE, "too big");
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_bind_reports_ephemeral_port() {
        let config = ServerConfig::builder().http_addr("127.0.0.1:0").build();
        let bound = Server::new(config, hello).bind().await.unwrap();
        assert_ne!(bound.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_rejects_invalid_address() {
        let config = ServerConfig::builder().http_addr("localhost").build();
        let err = Server::new(config, hello).bind().await.unwrap_err();
        assert!(matches!(err, ServerError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let config = ServerConfig::builder().http_addr("127.0.0.1:0").build();
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            Server::new(config, hello).run_with_shutdown(shutdown),
        )
        .await
        .expect("server should stop");
        assert!(result.is_ok());
    }
}
