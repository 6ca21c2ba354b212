//! Framed Listener
//!
//! Thin wrapper over `TcpListener`: accepted streams come back
//! already wrapped as [`FrameConnection`]s with empty read state.

use std::net::{SocketAddr, TcpListener, ToSocketAddrs};

use crate::config::Config;
use crate::error::Result;
use super::FrameConnection;

/// Accepts incoming framed connections on a TCP address.
pub struct FrameListener {
    listener: TcpListener,

    /// Applied to every accepted connection
    config: Config,
}

impl FrameListener {
    /// Bind to the given address with default configuration.
    ///
    /// The address format is anything `TcpListener::bind` accepts,
    /// e.g. `"127.0.0.1:13338"` or `"0.0.0.0:0"`.
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        Self::bind_with_config(addr, Config::default())
    }

    /// Bind with explicit configuration for accepted connections.
    pub fn bind_with_config(addr: impl ToSocketAddrs, config: Config) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;

        tracing::debug!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, config })
    }

    /// Block until a client connects; return the wrapped connection.
    pub fn accept(&self) -> Result<FrameConnection> {
        let (stream, peer) = self.listener.accept()?;

        tracing::debug!("Accepted connection from {}", peer);

        FrameConnection::from_stream(stream, &self.config)
    }

    /// The local address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}
