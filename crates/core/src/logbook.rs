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

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::trace;

/// Durable record of executed commands and their replies.
pub trait LogSink {
    fn write(&self, path: &Path, address: &str, command: &str, result: &str) -> io::Result<()>;
}

/// Appends entries to a plain text file, creating it (and its parent
/// directories) on first use.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLog;

impl LogSink for FileLog {
    fn write(&self, path: &Path, address: &str, command: &str, result: &str) -> io::Result<()> {
        if path.as_os_str().is_empty() {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entry = format_entry(Local::now(), address, command, result);
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(entry.as_bytes())?;
        trace!(path = %path.display(), command, "logged command");
        Ok(())
    }
}

pub fn format_entry(at: DateTime<Local>, address: &str, command: &str, result: &str) -> String {
    format!(
        "[{}] {address}: {command}\n{result}\n\n",
        at.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_entry() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            format_entry(at, "127.0.0.1:16260", "players", "Players connected (0):"),
            "[2024-03-09 14:05:07] 127.0.0.1:16260: players\nPlayers connected (0):\n\n"
        );
    }

    #[test]
    fn test_appends_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rcon.log");

        FileLog.write(&path, "host:1", "status", "ok").unwrap();
        FileLog.write(&path, "host:1", "help", "").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("] host:1: ").count(), 2);
        assert!(contents.starts_with('['));
        assert!(contents.contains("] host:1: status\nok\n\n["));
        assert!(contents.ends_with("] host:1: help\n\n\n"));
    }

    #[test]
    fn test_empty_path_is_noop() {
        FileLog.write(Path::new(""), "host:1", "status", "ok").unwrap();
    }
}
