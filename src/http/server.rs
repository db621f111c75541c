//! HTTP server and per-connection driver.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Drive each connection through decode → dispatch → encode cycles
//! - Apply the keep-alive decision and response compression
//! - Stop accepting on shutdown and drain live connections
//!
//! # Design Decisions
//! - One task per connection; requests on a connection are sequential
//! - Malformed input, idle timeout and transport failure all close the
//!   connection without a response and without retry
//! - Dispatcher failures are statuses, so they never end a connection

use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::broadcast;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::http::compression::Compressor;
use crate::http::decoder::{Decoder, ParseOutcome};
use crate::http::encoder::write_response;
use crate::http::policy;
use crate::http::request::{Request, CONNECTION};
use crate::net::{ConnectionId, ConnectionState, ConnectionTracker, Listener, ListenerError};
use crate::routing::{Dispatcher, RouteTable, StaticRouter};

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Runs request/response cycles on a single connection.
pub struct ConnectionDriver<D> {
    dispatcher: Arc<D>,
    decoder: Decoder,
    compressor: Compressor,
}

impl<D: Dispatcher> ConnectionDriver<D> {
    pub fn new(dispatcher: Arc<D>, decoder: Decoder, compressor: Compressor) -> Self {
        Self {
            dispatcher,
            decoder,
            compressor,
        }
    }

    /// Serve `stream` until the peer closes, misbehaves, idles out, or a
    /// response says `Connection: close`. Returns the number of responses sent.
    pub async fn drive<S>(&self, stream: S, id: ConnectionId) -> usize
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (read_half, mut writer) = tokio::io::split(stream);
        let mut reader = BufReader::new(read_half);
        let mut state = ConnectionState::Reading;
        let mut served = 0;

        while state != ConnectionState::Closed {
            let request = match self.decoder.decode(&mut reader).await {
                ParseOutcome::Parsed(request) => request,
                ParseOutcome::Incomplete => {
                    tracing::debug!(connection_id = %id, "Malformed or short request, closing");
                    break;
                }
                ParseOutcome::TransportFailure(e) if e.kind() == io::ErrorKind::TimedOut => {
                    tracing::debug!(connection_id = %id, "Idle timeout, closing");
                    break;
                }
                ParseOutcome::TransportFailure(e) => {
                    tracing::warn!(connection_id = %id, error = %e, "Read failed, closing");
                    break;
                }
            };
            state = transition(id, state, ConnectionState::Dispatched);

            let span = tracing::debug_span!(
                "request",
                connection_id = %id,
                request_id = %Uuid::new_v4(),
                method = %request.method(),
                target = %request.target(),
            );
            let next = match self.respond(&request, &mut writer).instrument(span).await {
                Ok(keep_alive) => {
                    served += 1;
                    if keep_alive {
                        ConnectionState::Reading
                    } else {
                        ConnectionState::Closed
                    }
                }
                Err(e) => {
                    tracing::warn!(connection_id = %id, error = %e, "Write failed, closing");
                    ConnectionState::Closed
                }
            };
            state = transition(id, state, next);
        }

        let _ = writer.shutdown().await;
        served
    }

    /// One dispatched cycle. Returns the keep-alive decision.
    async fn respond<W>(&self, request: &Request, writer: &mut W) -> io::Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        let mut response = self.dispatcher.dispatch(request).await;

        let keep_alive = policy::should_keep_alive(request);
        response.set_header(CONNECTION, policy::connection_header_value(keep_alive));
        self.compressor.apply(request, &mut response);

        write_response(writer, &response).await?;
        tracing::debug!(
            status = response.status().code(),
            keep_alive,
            "Response sent"
        );
        Ok(keep_alive)
    }
}

fn transition(id: ConnectionId, from: ConnectionState, to: ConnectionState) -> ConnectionState {
    tracing::trace!(connection_id = %id, ?from, ?to, "Connection state change");
    to
}

/// HTTP/1.x server over a bounded TCP listener.
pub struct HttpServer<D = StaticRouter> {
    config: ServerConfig,
    driver: Arc<ConnectionDriver<D>>,
    tracker: ConnectionTracker,
}

impl HttpServer<StaticRouter> {
    /// Create a server answering the built-in routes.
    pub fn new(config: ServerConfig) -> Self {
        let router = StaticRouter::new(RouteTable::default(), config.files.directory.clone());
        Self::with_dispatcher(config, router)
    }
}

impl<D: Dispatcher> HttpServer<D> {
    /// Create a server answering requests with `dispatcher`.
    pub fn with_dispatcher(config: ServerConfig, dispatcher: D) -> Self {
        let driver = ConnectionDriver::new(
            Arc::new(dispatcher),
            Decoder::from_config(&config),
            Compressor::new(&config.compression),
        );
        Self {
            config,
            driver: Arc::new(driver),
            tracker: ConnectionTracker::new(),
        }
    }

    /// Run the server until `shutdown` fires, then drain live connections for
    /// up to the configured grace period. The port is released before the
    /// drain, so late clients are refused instead of queued.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Bind)?;
        tracing::info!(
            address = %addr,
            pool_size = listener.pool_size(),
            idle_timeout_secs = self.config.timeouts.idle_secs,
            "HTTP server starting"
        );

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer, permit)) => {
                        let guard = self.tracker.track();
                        let driver = Arc::clone(&self.driver);
                        let span = tracing::info_span!(
                            "connection",
                            connection_id = %guard.id(),
                            peer = %peer,
                        );
                        tokio::spawn(
                            async move {
                                let served = driver.drive(stream, guard.id()).await;
                                tracing::debug!(served, "Connection closed");
                                drop(permit);
                                drop(guard);
                            }
                            .instrument(span),
                        );
                    }
                    Err(ListenerError::Accept(e)) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                    Err(e) => return Err(e),
                },
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested, no longer accepting");
                    break;
                }
            }
        }
        drop(listener);

        let grace = self.config.timeouts.shutdown_grace();
        if tokio::time::timeout(grace, self.tracker.wait_until_idle())
            .await
            .is_err()
        {
            tracing::warn!(
                remaining = self.tracker.active_count(),
                grace_secs = grace.as_secs(),
                "Connections still open after grace period"
            );
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
