//! TCP listener implementation with a bounded worker pool.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming TCP connections
//! - Enforce `pool_size` concurrent connections via semaphore
//! - Surface accept errors without tearing down the listener

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    Bind(std::io::Error),
    /// Failed to accept connection.
    #[error("Failed to accept: {0}")]
    Accept(std::io::Error),
    /// The worker pool was shut down.
    #[error("Worker pool closed")]
    PoolClosed,
}

/// A TCP listener that serves at most `pool_size` connections at once.
///
/// A pool slot is acquired *before* accepting, so when every worker is
/// busy new connections wait in the kernel accept queue.
pub struct Listener {
    inner: TcpListener,
    pool: Arc<Semaphore>,
    pool_size: usize,
}

impl Listener {
    /// Bind to the configured address with the configured pool size.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
            ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        Ok(Self::from_tcp(listener, config.pool_size))
    }

    /// Wrap an already bound listener.
    pub fn from_tcp(inner: TcpListener, pool_size: usize) -> Self {
        if let Ok(local_addr) = inner.local_addr() {
            tracing::info!(address = %local_addr, pool_size, "Listener bound");
        }
        Self {
            inner,
            pool: Arc::new(Semaphore::new(pool_size)),
            pool_size,
        }
    }

    /// Accept a new connection once a worker slot is free.
    ///
    /// Returns the stream and a permit that must be held for the connection's lifetime.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, WorkerPermit), ListenerError> {
        let permit = self
            .pool
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ListenerError::PoolClosed)?;

        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        tracing::debug!(
            peer_addr = %addr,
            idle_workers = self.pool.available_permits(),
            "Connection accepted"
        );

        Ok((stream, addr, WorkerPermit { _permit: permit }))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// Worker slots not currently serving a connection.
    pub fn idle_workers(&self) -> usize {
        self.pool.available_permits()
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }
}

/// A worker slot held by one connection.
///
/// Dropping it returns the slot to the pool, even if the connection task panics.
#[derive(Debug)]
pub struct WorkerPermit {
    _permit: OwnedSemaphorePermit,
}
