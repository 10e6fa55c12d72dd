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

//! Configuration file holding connection details per named environment.
//!
//! ```yaml
//! default:
//!   address: "127.0.0.1:16260"
//!   password: "password"
//!   log: "rcon-default.log"
//!   type: "rcon"
//! telnet:
//!   address: "127.0.0.1:8081"
//!   password: "password"
//!   type: "telnet"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Json, Yaml};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::session::ProtocolType;

/// File looked for next to the executable when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "rcon.yaml";

/// Environment used when none is selected.
pub const DEFAULT_CONFIG_ENV: &str = "default";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate default config file: {0}")]
    Locate(#[source] io::Error),
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported config file extension: {0}")]
    UnsupportedExtension(PathBuf),
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },
}

/// Connection details for one environment. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    #[serde(deserialize_with = "scalar_string")]
    pub address: String,
    #[serde(deserialize_with = "scalar_string")]
    pub password: String,
    #[serde(deserialize_with = "scalar_string")]
    pub log: String,
    #[serde(rename = "type")]
    pub protocol: ProtocolType,
}

/// All environments from a config file, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    environments: BTreeMap<String, Environment>,
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_NAME`] next to the running
    /// executable. A missing default file gives an empty config; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let path = Self::default_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "no default config file");
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Parse a YAML (`.yaml`, `.yml`) or JSON (`.json`) file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        std::fs::metadata(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Figment::new().merge(Yaml::file(path)),
            Some("json") => Figment::new().merge(Json::file(path)),
            _ => return Err(ConfigError::UnsupportedExtension(path.to_path_buf())),
        };

        let config: Config = figment.extract().map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        debug!(
            path = %path.display(),
            environments = config.environments.len(),
            "loaded config"
        );
        Ok(config)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let exe = std::env::current_exe().map_err(ConfigError::Locate)?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(DEFAULT_CONFIG_NAME))
    }

    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.get(name)
    }
}

/// Accepts any scalar where a string is expected, so `password: 12345` reads
/// as `"12345"`. A key with no value reads as empty.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct ScalarString;

    impl Visitor<'_> for ScalarString {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(ScalarString)
}
