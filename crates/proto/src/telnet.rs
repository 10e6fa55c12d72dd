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

//! Telnet console client, as spoken by 7 Days to Die dedicated servers.
//!
//! The server greets with a password prompt, answers the password with either
//! a success or a rejection line, and afterwards echoes free-form text for
//! every command. Replies carry no terminator, so a reply is "everything
//! received until the connection goes quiet".

use std::io::{BufRead, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use rcon_core::{COMMAND_QUIT, ProtocolClient, ProtocolError, waiting_banner};
use tracing::{debug, trace};

use crate::{ClientOptions, dial, is_timeout};

pub const PROMPT_PASSWORD: &str = "Please enter password:";
pub const LOGON_SUCCESSFUL: &str = "Logon successful.";
pub const PASSWORD_INCORRECT: &str = "Password incorrect";

/// Sent before hanging up so the server frees the console slot.
pub const COMMAND_EXIT: &str = "exit";

const DEFAULT_IDLE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct TelnetClient {
    options: ClientOptions,
    idle: Duration,
}

impl Default for TelnetClient {
    fn default() -> Self {
        Self::new(ClientOptions::default())
    }
}

impl TelnetClient {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            options,
            idle: DEFAULT_IDLE,
        }
    }

    /// How long the connection must stay quiet before a reply is considered
    /// complete.
    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    fn open(&self, address: &str, password: &str) -> Result<TelnetConnection, ProtocolError> {
        let stream = dial(address, &self.options)?;
        let mut conn = TelnetConnection {
            stream,
            deadline: self.options.deadline,
            idle: self.idle,
            pending: Vec::new(),
        };
        conn.authenticate(password)?;
        debug!(address, "telnet authenticated");
        Ok(conn)
    }
}

impl ProtocolClient for TelnetClient {
    fn name(&self) -> &'static str {
        "telnet"
    }

    fn execute(
        &self,
        address: &str,
        password: &str,
        command: &str,
    ) -> Result<String, ProtocolError> {
        let mut conn = self.open(address, password)?;
        // Whatever the server prints right after logon is not part of the reply.
        conn.read_until_idle()?;
        conn.send_line(command)?;
        let reply = conn.read_until_idle()?;
        conn.close();
        Ok(reply)
    }

    fn interactive(
        &self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        address: &str,
        password: &str,
    ) -> Result<(), ProtocolError> {
        let mut conn = self.open(address, password)?;
        print_reply(output, &conn.read_until_idle()?)?;
        writeln!(output, "{}", waiting_banner(address))?;

        loop {
            write!(output, "> ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let command = line.trim_end_matches(['\r', '\n']);
            if command.is_empty() {
                continue;
            }
            if command == COMMAND_QUIT {
                break;
            }

            conn.send_line(command)?;
            match conn.read_until_idle() {
                Ok(reply) => print_reply(output, &reply)?,
                Err(e) => {
                    if let Some(partial) = e.partial_output() {
                        print_reply(output, partial)?;
                    }
                    return Err(e);
                }
            }
        }

        conn.close();
        Ok(())
    }
}

fn print_reply(output: &mut dyn Write, reply: &str) -> Result<(), ProtocolError> {
    let reply = reply.trim();
    if !reply.is_empty() {
        writeln!(output, "{reply}")?;
    }
    Ok(())
}

struct TelnetConnection {
    stream: TcpStream,
    deadline: Duration,
    idle: Duration,
    /// Bytes read past the last marker, not yet handed out.
    pending: Vec<u8>,
}

impl TelnetConnection {
    fn authenticate(&mut self, password: &str) -> Result<(), ProtocolError> {
        self.read_until(&[PROMPT_PASSWORD])?;
        self.send_line(password)?;
        match self.read_until(&[LOGON_SUCCESSFUL, PASSWORD_INCORRECT])? {
            LOGON_SUCCESSFUL => Ok(()),
            _ => Err(ProtocolError::AuthenticationFailed),
        }
    }

    fn send_line(&mut self, line: &str) -> Result<(), ProtocolError> {
        trace!(line, "send");
        self.stream.write_all(line.as_bytes())?;
        self.stream.write_all(b"\r\n")?;
        Ok(())
    }

    /// Read until one of `markers` shows up, returning the marker seen.
    /// Silence longer than the deadline is an error here.
    fn read_until<'m>(&mut self, markers: &[&'m str]) -> Result<&'m str, ProtocolError> {
        self.stream.set_read_timeout(Some(self.deadline))?;
        let mut buf = [0u8; 1024];
        loop {
            if let Some((marker, end)) = find_marker(&self.pending, markers) {
                self.pending.drain(..end);
                return Ok(marker);
            }
            let n = self.stream.read(&mut buf)?;
            if n == 0 {
                return Err(ProtocolError::UnexpectedResponse(format!(
                    "connection closed while waiting for {markers:?}"
                )));
            }
            self.pending.extend_from_slice(&buf[..n]);
        }
    }

    /// Collect everything until the connection stays quiet for the idle
    /// window or the server hangs up.
    fn read_until_idle(&mut self) -> Result<String, ProtocolError> {
        self.stream.set_read_timeout(Some(self.idle))?;
        let mut received = std::mem::take(&mut self.pending);
        let mut buf = [0u8; 4096];
        loop {
            match self.stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => received.extend_from_slice(&buf[..n]),
                Err(e) if is_timeout(&e) => break,
                Err(e) => {
                    return Err(ProtocolError::Io(e).with_partial_output(normalize(&received)));
                }
            }
        }
        Ok(normalize(&received))
    }

    fn close(mut self) {
        if let Err(e) = self.send_line(COMMAND_EXIT) {
            debug!(error = %e, "telnet exit failed");
        }
    }
}

/// Earliest marker in `haystack` and the offset just past it.
fn find_marker<'m>(haystack: &[u8], markers: &[&'m str]) -> Option<(&'m str, usize)> {
    markers
        .iter()
        .filter_map(|marker| {
            haystack
                .windows(marker.len())
                .position(|window| window == marker.as_bytes())
                .map(|pos| (*marker, pos + marker.len()))
        })
        .min_by_key(|(_, end)| *end)
}

fn normalize(received: &[u8]) -> String {
    String::from_utf8_lossy(received).replace("\r\n", "\n")
}
