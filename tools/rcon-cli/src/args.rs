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

use std::path::PathBuf;

use clap_derive::Parser;
use rcon_core::{DEFAULT_CONFIG_NAME, ProtocolType, Session};
use rcon_executor::Invocation;

#[derive(Parser, Debug)]
#[command(
    name = "rcon",
    version,
    about = "CLI for executing queries on a remote server",
    long_about = concat!(
        "CLI for executing queries on a remote server.\n\n",
        "Can be run in two modes: a single query, or a terminal that reads\n",
        "commands from standard input. To start the terminal just leave out\n",
        "the command to execute."
    )
)]
pub struct Args {
    #[arg(
        short = 'a',
        long,
        value_name = "host:port",
        help = "Set host and port to remote server. Example 127.0.0.1:16260"
    )]
    pub address: Option<String>,

    #[arg(
        short = 'p',
        long,
        value_name = "password",
        help = "Set password to remote server"
    )]
    pub password: Option<String>,

    #[arg(
        short = 't',
        long = "type",
        value_name = "rcon|telnet|web",
        help = "Allows to specify type of connection. Default value is rcon"
    )]
    pub protocol: Option<String>,

    #[arg(
        short = 'l',
        long,
        value_name = "path",
        help = "Path and name of the log file. If not specified, it is taken from the config"
    )]
    pub log: Option<String>,

    #[arg(
        short = 'c',
        long,
        value_name = "command",
        help = "Command to execute on remote server. Required flag to run in single mode"
    )]
    pub command: Option<String>,

    #[arg(
        short = 'e',
        long,
        value_name = "env",
        help = "Allows to select server credentials from selected environment in the configuration file"
    )]
    pub env: Option<String>,

    #[arg(
        long,
        value_name = "path",
        help = format!(
            "Allows to specify the path and name of the configuration file. Default value is {DEFAULT_CONFIG_NAME}"
        )
    )]
    pub cfg: Option<PathBuf>,

    #[arg(long, help = "Enable debug logging to stderr")]
    pub debug: bool,
}

impl From<Args> for Invocation {
    fn from(args: Args) -> Self {
        let flags = Session {
            address: args.address.unwrap_or_default(),
            password: args.password.unwrap_or_default(),
            protocol: args
                .protocol
                .map(ProtocolType::from)
                .unwrap_or_default(),
            log: args.log.unwrap_or_default(),
        };
        Invocation {
            flags,
            command: args.command,
            env: args.env,
            config: args.cfg,
        }
    }
}
