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

//! Drives remote console sessions: works out where to connect from flags and
//! the config file, then either runs one command or hands the terminal over
//! to an interactive loop.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rcon_core::{ConfigError, ProtocolError, Session};
use thiserror::Error;
use tracing::debug;

pub mod dispatch;
pub mod interactive;
pub mod resolve;
pub mod single;

pub use dispatch::Dispatcher;
pub use resolve::{Unresolved, resolve};

/// How many unsupported protocol names a user may type before giving up.
pub const ATTEMPTS_LIMIT: usize = 3;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("address is not set: to set address add -a host:port")]
    EmptyAddress,
    #[error("password is not set: to set password add -p password")]
    EmptyPassword,
    #[error("command is not set")]
    EmptyCommand,
    #[error("too many failed attempts")]
    TooManyFails,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("write log error: {0}")]
    Log(#[source] io::Error),
    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),
}

/// Everything the command line asked for.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Connection details given as flags; empty fields are looked up in the
    /// config file.
    pub flags: Session,
    /// Present and non-empty selects single command mode.
    pub command: Option<String>,
    pub env: Option<String>,
    pub config: Option<PathBuf>,
}

/// Built once at start-up and owns the terminal streams for the rest of the
/// process.
pub struct Executor<R, W> {
    dispatcher: Dispatcher,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Executor<R, W> {
    pub fn new(dispatcher: Dispatcher, input: R, output: W) -> Self {
        Self {
            dispatcher,
            input,
            output,
        }
    }

    pub fn run(&mut self, invocation: Invocation) -> Result<(), ExecutorError> {
        let mut session = resolve(
            invocation.flags,
            invocation.config.as_deref(),
            invocation.env.as_deref(),
        )
        .map_err(|unresolved| {
            debug!(session = ?unresolved.session, "session left unresolved");
            ExecutorError::Config(unresolved.source)
        })?;

        match invocation.command.as_deref() {
            Some(command) if !command.is_empty() => {
                single::run(&self.dispatcher, &mut self.output, &session, command)
            }
            _ => interactive::run(
                &self.dispatcher,
                &mut self.input,
                &mut self.output,
                &mut session,
            ),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
