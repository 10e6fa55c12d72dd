// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Blocking remote console clients.
//!
//! - [`rcon`] - Source engine RCON, binary packets over TCP.
//! - [`telnet`] - line-oriented telnet console with a password prompt.
//! - [`webrcon`] - JSON messages over a WebSocket.
//!
//! Each client opens a fresh connection per call and implements
//! [`rcon_core::ProtocolClient`].

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use rcon_core::ProtocolError;
use tracing::debug;

pub mod rcon;
pub mod telnet;
pub mod webrcon;

pub use rcon::RconClient;
pub use telnet::TelnetClient;
pub use webrcon::WebRconClient;

/// Socket timeouts shared by all clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// How long to wait for the TCP connection to be established.
    pub dial_timeout: Duration,
    /// Read and write timeout for every socket operation after connecting.
    pub deadline: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            dial_timeout: Duration::from_secs(5),
            deadline: Duration::from_secs(5),
        }
    }
}

/// Connect to `address` (`host:port`), trying each resolved address in turn.
pub(crate) fn dial(address: &str, options: &ClientOptions) -> Result<TcpStream, ProtocolError> {
    let dial_error = |source: io::Error| ProtocolError::Dial {
        address: address.to_string(),
        source,
    };

    let mut last_error = None;
    for addr in address.to_socket_addrs().map_err(dial_error)? {
        match TcpStream::connect_timeout(&addr, options.dial_timeout) {
            Ok(stream) => {
                stream.set_read_timeout(Some(options.deadline))?;
                stream.set_write_timeout(Some(options.deadline))?;
                debug!(%addr, "connected");
                return Ok(stream);
            }
            Err(e) => {
                debug!(%addr, error = %e, "connect failed");
                last_error = Some(e);
            }
        }
    }

    Err(dial_error(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "address resolved to nothing")
    })))
}

/// Read timeouts surface as `WouldBlock` on unix and `TimedOut` on windows.
pub(crate) fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
