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

//! `rcon`: run a command on, or open a terminal to, a game server console.

mod args;

use std::io;

use clap::Parser;
use eyre::Error;
use rcon_executor::{Dispatcher, Executor, Invocation};
use tracing::{Level, debug};

use crate::args::Args;

fn main() -> Result<(), Error> {
    color_eyre::install()?;

    let args: Args = Args::parse();

    // Diagnostics go to stderr; stdout belongs to the remote console.
    let main_subscriber = tracing_subscriber::fmt()
        .compact()
        .with_ansi(true)
        .with_target(false)
        .with_writer(io::stderr)
        .with_max_level(if args.debug { Level::DEBUG } else { Level::WARN })
        .finish();
    tracing::subscriber::set_global_default(main_subscriber)?;

    let invocation = Invocation::from(args);
    debug!(
        address = %invocation.flags.address,
        protocol = %invocation.flags.protocol,
        env = ?invocation.env,
        "starting"
    );

    let mut executor = Executor::new(Dispatcher::default(), io::stdin().lock(), io::stdout());
    executor.run(invocation)?;
    Ok(())
}
