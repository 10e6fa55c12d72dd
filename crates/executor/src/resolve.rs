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

use std::path::Path;

use rcon_core::{Config, ConfigError, DEFAULT_CONFIG_ENV, Session};
use thiserror::Error;
use tracing::debug;

/// The config file could not be loaded. Carries the session as far as the
/// flags got it, so an interactive caller can still prompt for the rest.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct Unresolved {
    pub session: Session,
    #[source]
    pub source: ConfigError,
}

/// Merge flag values with the selected config environment.
///
/// Flags win field by field. When the flags already carry both an address
/// and a password the config file is not read at all.
pub fn resolve(
    flags: Session,
    config_path: Option<&Path>,
    env: Option<&str>,
) -> Result<Session, Unresolved> {
    let mut session = flags;
    if !session.address.is_empty() && !session.password.is_empty() {
        return Ok(session);
    }

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(source) => return Err(Unresolved { session, source }),
    };

    let env = env.filter(|env| !env.is_empty()).unwrap_or(DEFAULT_CONFIG_ENV);
    let Some(environment) = config.environment(env) else {
        debug!(env, "environment not present in config");
        return Ok(session);
    };

    fill(&mut session.address, &environment.address);
    fill(&mut session.password, &environment.password);
    fill(&mut session.log, &environment.log);
    if session.protocol.is_unspecified() {
        session.protocol = environment.protocol.clone();
    }

    Ok(session)
}

fn fill(field: &mut String, fallback: &str) {
    if field.is_empty() {
        *field = fallback.to_string();
    }
}
