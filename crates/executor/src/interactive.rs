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

//! Terminal mode: prompt for whatever the session is missing, settle on a
//! protocol, check the credentials and then run commands line by line until
//! `:q` or end of input.

use std::io::{BufRead, Write};

use rcon_core::{COMMAND_QUIT, ProtocolType, Session, waiting_banner};
use tracing::{debug, info};

use crate::{ATTEMPTS_LIMIT, Dispatcher, ExecutorError};

pub const PROMPT_ADDRESS: &str = "Enter remote host and port [ip:port]: ";
pub const PROMPT_PASSWORD: &str = "Enter password: ";
pub const PROMPT_PROTOCOL: &str = "Enter protocol type (empty for rcon): ";
pub const PROMPT_COMMAND: &str = "> ";

/// Where protocol negotiation left the session.
#[derive(Debug, PartialEq, Eq)]
enum Negotiated {
    /// The telnet client runs the rest of the session itself.
    Telnet,
    /// Credentials were accepted; commands go through the dispatcher.
    Verified,
}

pub fn run<R: BufRead, W: Write>(
    dispatcher: &Dispatcher,
    input: &mut R,
    output: &mut W,
    session: &mut Session,
) -> Result<(), ExecutorError> {
    // An empty answer is accepted as is; the credential check rejects it later.
    if session.address.is_empty() {
        session.address = ask(input, output, PROMPT_ADDRESS)?;
    }
    if session.password.is_empty() {
        session.password = ask(input, output, PROMPT_PASSWORD)?;
    }

    match negotiate(dispatcher, input, output, session)? {
        Negotiated::Telnet => {
            debug!(address = %session.address, "handing session to telnet");
            dispatcher
                .telnet()
                .interactive(input, output, &session.address, &session.password)?;
            Ok(())
        }
        Negotiated::Verified => command_loop(dispatcher, input, output, session),
    }
}

fn negotiate<R: BufRead, W: Write>(
    dispatcher: &Dispatcher,
    input: &mut R,
    output: &mut W,
    session: &mut Session,
) -> Result<Negotiated, ExecutorError> {
    let mut attempts = 0;
    loop {
        if session.protocol.is_unspecified() {
            session.protocol = ProtocolType::from(ask(input, output, PROMPT_PROTOCOL)?);
        }

        match &session.protocol {
            ProtocolType::Telnet => return Ok(Negotiated::Telnet),
            ProtocolType::Unspecified | ProtocolType::Rcon | ProtocolType::WebRcon => {
                dispatcher.check_credentials(session)?;
                return Ok(Negotiated::Verified);
            }
            // Dispatch would fall back to rcon here; the prompt insists on a
            // name it knows.
            ProtocolType::Unrecognized(name) => {
                attempts += 1;
                debug!(name, attempts, "unsupported protocol type");
                session.protocol = ProtocolType::Unspecified;
                writeln!(
                    output,
                    "Unsupported protocol type. Allowed {} protocols",
                    allowed_protocols()
                )
                .map_err(ExecutorError::Terminal)?;
                if attempts >= ATTEMPTS_LIMIT {
                    return Err(ExecutorError::TooManyFails);
                }
            }
        }
    }
}

fn command_loop<R: BufRead, W: Write>(
    dispatcher: &Dispatcher,
    input: &mut R,
    output: &mut W,
    session: &Session,
) -> Result<(), ExecutorError> {
    writeln!(output, "{}", waiting_banner(&session.address)).map_err(ExecutorError::Terminal)?;

    loop {
        prompt(output, PROMPT_COMMAND)?;
        let Some(line) = read_line(input)? else {
            debug!("end of input");
            return Ok(());
        };

        if line.is_empty() {
            continue;
        }
        if line == COMMAND_QUIT {
            info!(address = %session.address, "session closed");
            return Ok(());
        }

        dispatcher.execute(output, session, &line)?;
    }
}

/// `"rcon", "web" and "telnet"`
fn allowed_protocols() -> String {
    let names: Vec<String> = ProtocolType::SUPPORTED
        .iter()
        .map(|protocol| format!("{:?}", protocol.name()))
        .collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
        _ => names.concat(),
    }
}

fn prompt<W: Write>(output: &mut W, text: &str) -> Result<(), ExecutorError> {
    output
        .write_all(text.as_bytes())
        .and_then(|_| output.flush())
        .map_err(ExecutorError::Terminal)
}

/// One line without its terminator; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>, ExecutorError> {
    let mut line = String::new();
    if input
        .read_line(&mut line)
        .map_err(ExecutorError::Terminal)?
        == 0
    {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> Result<String, ExecutorError> {
    prompt(output, text)?;
    Ok(read_line(input)?
        .map(|answer| answer.trim().to_string())
        .unwrap_or_default())
}
