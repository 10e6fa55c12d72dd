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

//! Types shared between the protocol clients and the executor.
//!
//! - [`session`] - the resolved connection context and protocol selector.
//! - [`client`] - the call contract every wire protocol client satisfies.
//! - [`config`] - loading of the per-environment configuration file.
//! - [`logbook`] - the append-only log of executed commands.

pub mod client;
pub mod config;
pub mod logbook;
pub mod session;

pub use client::{ProtocolClient, ProtocolError};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_ENV, DEFAULT_CONFIG_NAME, Environment};
pub use logbook::{FileLog, LogSink};
pub use session::{ProtocolType, Session};

/// Typing this in any interactive loop ends the session.
pub const COMMAND_QUIT: &str = ":q";

/// Line announcing that an interactive session is ready for commands.
pub fn waiting_banner(address: &str) -> String {
    format!("Waiting commands for {address} (or type {COMMAND_QUIT} to exit)")
}
