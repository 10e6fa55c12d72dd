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

//! WebRCON client (Rust dedicated servers).
//!
//! The password travels in the URL path, `ws://host:port/password`. Commands
//! and replies are JSON text frames correlated by `Identifier`; the server
//! also pushes unsolicited console output with other identifiers, which is
//! skipped.

use std::net::TcpStream;

use rcon_core::{ProtocolClient, ProtocolError};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use tungstenite::handshake::HandshakeError;
use tungstenite::handshake::client::ClientHandshake;
use tungstenite::http::StatusCode;
use tungstenite::{Message, WebSocket};

use crate::{ClientOptions, dial};

/// Value of `Name` in every request.
pub const REQUEST_NAME: &str = "WebRcon";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Request<'a> {
    pub identifier: i32,
    pub message: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reply {
    #[serde(default)]
    pub message: String,
    pub identifier: i32,
    #[serde(default, rename = "Type")]
    pub kind: String,
    #[serde(default)]
    pub stacktrace: String,
}

#[derive(Debug, Default, Clone)]
pub struct WebRconClient {
    options: ClientOptions,
}

impl WebRconClient {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

impl ProtocolClient for WebRconClient {
    fn name(&self) -> &'static str {
        "web"
    }

    fn execute(
        &self,
        address: &str,
        password: &str,
        command: &str,
    ) -> Result<String, ProtocolError> {
        let mut conn = WebRconConnection::open(address, password, &self.options)?;
        let reply = conn.execute(command);
        conn.close();
        reply
    }

    fn check_credentials(&self, address: &str, password: &str) -> Result<(), ProtocolError> {
        WebRconConnection::open(address, password, &self.options)?.close();
        Ok(())
    }
}

struct WebRconConnection {
    socket: WebSocket<TcpStream>,
    last_id: i32,
}

impl WebRconConnection {
    fn open(address: &str, password: &str, options: &ClientOptions) -> Result<Self, ProtocolError> {
        let stream = dial(address, options)?;
        let url = format!("ws://{address}/{password}");
        let (socket, _response) =
            tungstenite::client(url.as_str(), stream).map_err(handshake_error)?;
        debug!(address, "webrcon connected");
        Ok(Self { socket, last_id: 0 })
    }

    fn execute(&mut self, command: &str) -> Result<String, ProtocolError> {
        self.last_id += 1;
        let id = self.last_id;

        let request = serde_json::to_string(&Request {
            identifier: id,
            message: command,
            name: REQUEST_NAME,
        })
        .map_err(|e| ProtocolError::WebSocket(e.to_string()))?;
        self.socket
            .send(Message::text(request))
            .map_err(socket_error)?;

        loop {
            match self.socket.read().map_err(socket_error)? {
                Message::Text(text) => {
                    let reply: Reply = serde_json::from_str(text.as_str())
                        .map_err(|e| ProtocolError::UnexpectedResponse(e.to_string()))?;
                    if reply.identifier == id {
                        return Ok(reply.message);
                    }
                    trace!(identifier = reply.identifier, kind = %reply.kind, "skipping message");
                }
                Message::Close(_) => {
                    return Err(ProtocolError::UnexpectedResponse(
                        "connection closed before reply".to_string(),
                    ));
                }
                _ => {}
            }
        }
    }

    fn close(mut self) {
        if let Err(e) = self.socket.close(None).and_then(|_| self.socket.flush()) {
            trace!(error = %e, "webrcon close");
        }
    }
}

fn socket_error(e: tungstenite::Error) -> ProtocolError {
    match e {
        tungstenite::Error::Io(e) => ProtocolError::Io(e),
        other => ProtocolError::WebSocket(other.to_string()),
    }
}

fn handshake_error(e: HandshakeError<ClientHandshake<TcpStream>>) -> ProtocolError {
    match e {
        HandshakeError::Failure(tungstenite::Error::Http(response))
            if response.status() == StatusCode::UNAUTHORIZED
                || response.status() == StatusCode::FORBIDDEN =>
        {
            ProtocolError::AuthenticationFailed
        }
        HandshakeError::Failure(e) => socket_error(e),
        HandshakeError::Interrupted(_) => {
            ProtocolError::WebSocket("handshake interrupted".to_string())
        }
    }
}
