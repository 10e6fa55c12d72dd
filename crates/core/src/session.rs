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

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Which wire protocol a session talks.
///
/// Names as typed on the command line or in a config file: `rcon`, `telnet`
/// and `web`. The empty string is `Unspecified`. Anything else is kept
/// verbatim as `Unrecognized` so callers decide for themselves whether an
/// unknown name is an error or falls back to the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProtocolType {
    #[default]
    Unspecified,
    /// Source engine RCON over TCP.
    Rcon,
    /// Line-oriented telnet console.
    Telnet,
    /// JSON messages over a WebSocket.
    WebRcon,
    Unrecognized(String),
}

impl ProtocolType {
    /// Protocol used when none was asked for.
    pub const DEFAULT: ProtocolType = ProtocolType::Rcon;

    /// The protocols a user may choose from, in the order they are advertised.
    pub const SUPPORTED: [ProtocolType; 3] = [
        ProtocolType::Rcon,
        ProtocolType::WebRcon,
        ProtocolType::Telnet,
    ];

    pub fn name(&self) -> &str {
        match self {
            ProtocolType::Unspecified => "",
            ProtocolType::Rcon => "rcon",
            ProtocolType::Telnet => "telnet",
            ProtocolType::WebRcon => "web",
            ProtocolType::Unrecognized(name) => name,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, ProtocolType::Unspecified)
    }
}

impl From<&str> for ProtocolType {
    fn from(name: &str) -> Self {
        match name {
            "" => ProtocolType::Unspecified,
            "rcon" => ProtocolType::Rcon,
            "telnet" => ProtocolType::Telnet,
            "web" => ProtocolType::WebRcon,
            other => ProtocolType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for ProtocolType {
    fn from(name: String) -> Self {
        ProtocolType::from(name.as_str())
    }
}

impl From<ProtocolType> for String {
    fn from(protocol: ProtocolType) -> Self {
        match protocol {
            ProtocolType::Unrecognized(name) => name,
            other => other.name().to_string(),
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Connection details for one invocation.
///
/// Empty strings mean "not provided yet". The executor fills gaps from the
/// config file or by prompting, and refuses to dispatch while `address` or
/// `password` is still empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub address: String,
    pub password: String,
    pub protocol: ProtocolType,
    /// Command log file; empty disables logging.
    pub log: String,
}

impl Session {
    pub fn log_path(&self) -> Option<&Path> {
        if self.log.is_empty() {
            None
        } else {
            Some(Path::new(&self.log))
        }
    }
}
