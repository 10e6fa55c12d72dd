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

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors raised by a protocol client while talking to a remote console.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("could not connect to {address}: {source}")]
    Dial {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("command too long: {0} bytes")]
    CommandTooLong(usize),
    #[error("invalid packet id: {0}")]
    InvalidPacketId(i32),
    #[error("invalid packet size: {0}")]
    InvalidPacketSize(i32),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("websocket error: {0}")]
    WebSocket(String),
    #[error("{operation} is not supported by the {protocol} protocol")]
    Unsupported {
        protocol: &'static str,
        operation: &'static str,
    },
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The exchange failed after some of the reply was already received.
    #[error("{source}")]
    Partial {
        output: String,
        #[source]
        source: Box<ProtocolError>,
    },
}

impl ProtocolError {
    /// Reply text received before the failure, if any.
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            ProtocolError::Partial { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Wraps `self` with whatever output was already collected. Empty output
    /// leaves the error untouched.
    pub fn with_partial_output(self, output: String) -> ProtocolError {
        if output.is_empty() {
            return self;
        }
        ProtocolError::Partial {
            output,
            source: Box::new(self),
        }
    }
}

/// One wire protocol family.
///
/// Every call is self-contained: it connects, authenticates, does its work
/// and disconnects. Nothing is assumed about earlier calls.
pub trait ProtocolClient {
    /// Short protocol name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Run one command and return the raw reply.
    fn execute(&self, address: &str, password: &str, command: &str)
    -> Result<String, ProtocolError>;

    /// Authenticate without running anything.
    fn check_credentials(&self, _address: &str, _password: &str) -> Result<(), ProtocolError> {
        Err(ProtocolError::Unsupported {
            protocol: self.name(),
            operation: "credential check",
        })
    }

    /// Drive a whole interactive session over the given terminal streams,
    /// for protocols that keep their own connection open between commands.
    fn interactive(
        &self,
        _input: &mut dyn BufRead,
        _output: &mut dyn Write,
        _address: &str,
        _password: &str,
    ) -> Result<(), ProtocolError> {
        Err(ProtocolError::Unsupported {
            protocol: self.name(),
            operation: "interactive mode",
        })
    }
}
