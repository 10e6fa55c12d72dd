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

//! Source RCON client.

use std::io::Write;
use std::net::TcpStream;

use rcon_core::{ProtocolClient, ProtocolError};
use tracing::{debug, trace};

use crate::{ClientOptions, dial};

pub mod packet;

use packet::{
    AUTH_FAILED_ID, MAX_COMMAND_LEN, Packet, SERVERDATA_AUTH, SERVERDATA_AUTH_RESPONSE,
    SERVERDATA_EXECCOMMAND, SERVERDATA_RESPONSE_VALUE,
};

#[derive(Debug, Default, Clone)]
pub struct RconClient {
    options: ClientOptions,
}

impl RconClient {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

impl ProtocolClient for RconClient {
    fn name(&self) -> &'static str {
        "rcon"
    }

    fn execute(
        &self,
        address: &str,
        password: &str,
        command: &str,
    ) -> Result<String, ProtocolError> {
        if command.len() > MAX_COMMAND_LEN {
            return Err(ProtocolError::CommandTooLong(command.len()));
        }
        let mut conn = RconConnection::open(address, password, &self.options)?;
        conn.execute(command)
    }

    fn check_credentials(&self, address: &str, password: &str) -> Result<(), ProtocolError> {
        RconConnection::open(address, password, &self.options).map(|_| ())
    }
}

/// An authenticated connection. Dropping it closes the socket.
struct RconConnection {
    stream: TcpStream,
    last_id: i32,
}

impl RconConnection {
    fn open(address: &str, password: &str, options: &ClientOptions) -> Result<Self, ProtocolError> {
        let stream = dial(address, options)?;
        let mut conn = Self { stream, last_id: 0 };
        conn.authenticate(password)?;
        debug!(address, "rcon authenticated");
        Ok(conn)
    }

    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn send(&mut self, packet: &Packet) -> Result<(), ProtocolError> {
        trace!(id = packet.id, kind = packet.kind, "send packet");
        self.stream.write_all(&packet.encode())?;
        Ok(())
    }

    fn receive(&mut self) -> Result<Packet, ProtocolError> {
        let packet = Packet::read_from(&mut self.stream)?;
        trace!(id = packet.id, kind = packet.kind, "received packet");
        Ok(packet)
    }

    fn authenticate(&mut self, password: &str) -> Result<(), ProtocolError> {
        let id = self.next_id();
        self.send(&Packet::new(id, SERVERDATA_AUTH, password))?;

        // Source servers answer with an empty response value before the auth
        // response; others send only the auth response.
        let mut response = self.receive()?;
        if response.kind == SERVERDATA_RESPONSE_VALUE {
            response = self.receive()?;
        }

        if response.kind != SERVERDATA_AUTH_RESPONSE {
            return Err(ProtocolError::UnexpectedResponse(format!(
                "packet type {} in reply to auth",
                response.kind
            )));
        }
        if response.id == AUTH_FAILED_ID {
            return Err(ProtocolError::AuthenticationFailed);
        }
        if response.id != id {
            return Err(ProtocolError::InvalidPacketId(response.id));
        }
        Ok(())
    }

    fn execute(&mut self, command: &str) -> Result<String, ProtocolError> {
        let id = self.next_id();
        self.send(&Packet::new(id, SERVERDATA_EXECCOMMAND, command))?;

        let response = self.receive()?;
        if response.id != id {
            return Err(ProtocolError::InvalidPacketId(response.id));
        }
        if response.kind != SERVERDATA_RESPONSE_VALUE {
            return Err(ProtocolError::UnexpectedResponse(format!(
                "packet type {} in reply to command",
                response.kind
            )));
        }
        Ok(response.body)
    }
}
