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

use std::io::Write;

use rcon_core::{FileLog, LogSink, ProtocolClient, ProtocolType, Session};
use rcon_proto::{ClientOptions, RconClient, TelnetClient, WebRconClient};
use tracing::{debug, warn};

use crate::ExecutorError;

/// Routes commands to the client for a session's protocol and records them
/// in the command log.
pub struct Dispatcher {
    rcon: Box<dyn ProtocolClient>,
    telnet: Box<dyn ProtocolClient>,
    web: Box<dyn ProtocolClient>,
    log: Box<dyn LogSink>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::with_options(ClientOptions::default())
    }
}

impl Dispatcher {
    pub fn new(
        rcon: Box<dyn ProtocolClient>,
        telnet: Box<dyn ProtocolClient>,
        web: Box<dyn ProtocolClient>,
        log: Box<dyn LogSink>,
    ) -> Self {
        Self {
            rcon,
            telnet,
            web,
            log,
        }
    }

    /// The real network clients, logging to files.
    pub fn with_options(options: ClientOptions) -> Self {
        Self::new(
            Box::new(RconClient::new(options)),
            Box::new(TelnetClient::new(options)),
            Box::new(WebRconClient::new(options)),
            Box::new(FileLog),
        )
    }

    pub fn client_for(&self, protocol: &ProtocolType) -> &dyn ProtocolClient {
        match protocol {
            ProtocolType::Telnet => self.telnet.as_ref(),
            ProtocolType::WebRcon => self.web.as_ref(),
            // Anything not named explicitly, known or not, goes to the default.
            ProtocolType::Rcon | ProtocolType::Unspecified | ProtocolType::Unrecognized(_) => {
                self.rcon.as_ref()
            }
        }
    }

    pub fn telnet(&self) -> &dyn ProtocolClient {
        self.telnet.as_ref()
    }

    /// Run `command`, print the trimmed reply, and log it if the session has
    /// a log path.
    ///
    /// Output received before a protocol failure is still printed and logged.
    /// A log failure is only reported when the command itself succeeded.
    pub fn execute(
        &self,
        output: &mut dyn Write,
        session: &Session,
        command: &str,
    ) -> Result<String, ExecutorError> {
        if command.is_empty() {
            return Err(ExecutorError::EmptyCommand);
        }

        let client = self.client_for(&session.protocol);
        debug!(
            protocol = client.name(),
            address = %session.address,
            command,
            "executing"
        );

        let (result, failure) =
            match client.execute(&session.address, &session.password, command) {
                Ok(reply) => (reply.trim().to_string(), None),
                Err(e) => (
                    e.partial_output().unwrap_or_default().trim().to_string(),
                    Some(e),
                ),
            };

        if !result.is_empty() {
            writeln!(output, "{result}").map_err(ExecutorError::Terminal)?;
        }

        let logged = match session.log_path() {
            Some(path) => self.log.write(path, &session.address, command, &result),
            None => Ok(()),
        };

        match (failure, logged) {
            (None, Ok(())) => Ok(result),
            (None, Err(e)) => Err(ExecutorError::Log(e)),
            (Some(failure), Ok(())) => Err(failure.into()),
            (Some(failure), Err(e)) => {
                warn!(error = %e, "write log error");
                Err(failure.into())
            }
        }
    }

    /// Authenticate against the session's endpoint without running anything.
    pub fn check_credentials(&self, session: &Session) -> Result<(), ExecutorError> {
        let client = match session.protocol {
            ProtocolType::WebRcon => self.web.as_ref(),
            _ => self.rcon.as_ref(),
        };
        client.check_credentials(&session.address, &session.password)?;
        Ok(())
    }
}
