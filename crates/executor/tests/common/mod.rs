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

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Cursor, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rcon_core::{ProtocolClient, ProtocolError};
use rcon_executor::{Dispatcher, Executor};

/// Something a fake did, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Execute {
        client: &'static str,
        address: String,
        password: String,
        command: String,
    },
    Check {
        client: &'static str,
        address: String,
        password: String,
    },
    Interactive {
        client: &'static str,
        address: String,
        password: String,
    },
    Log {
        path: PathBuf,
        address: String,
        command: String,
        result: String,
    },
}

pub type Journal = Rc<RefCell<Vec<Event>>>;

pub type Reply = Result<String, ProtocolError>;

/// A protocol client that answers from a script and writes every call to a
/// shared journal.
pub struct FakeClient {
    name: &'static str,
    journal: Journal,
    replies: RefCell<VecDeque<Reply>>,
    reject_credentials: bool,
}

impl FakeClient {
    pub fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: journal.clone(),
            replies: RefCell::new(VecDeque::new()),
            reject_credentials: false,
        }
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    pub fn rejecting(mut self) -> Self {
        self.reject_credentials = true;
        self
    }
}

impl ProtocolClient for FakeClient {
    fn name(&self) -> &'static str {
        self.name
    }

    fn execute(&self, address: &str, password: &str, command: &str) -> Reply {
        self.journal.borrow_mut().push(Event::Execute {
            client: self.name,
            address: address.to_string(),
            password: password.to_string(),
            command: command.to_string(),
        });
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("{command} done")))
    }

    fn check_credentials(&self, address: &str, password: &str) -> Result<(), ProtocolError> {
        self.journal.borrow_mut().push(Event::Check {
            client: self.name,
            address: address.to_string(),
            password: password.to_string(),
        });
        if self.reject_credentials {
            Err(ProtocolError::AuthenticationFailed)
        } else {
            Ok(())
        }
    }

    /// Echoes each line back until `:q` or end of input.
    fn interactive(
        &self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        address: &str,
        password: &str,
    ) -> Result<(), ProtocolError> {
        self.journal.borrow_mut().push(Event::Interactive {
            client: self.name,
            address: address.to_string(),
            password: password.to_string(),
        });
        for line in input.lines() {
            let line = line?;
            if line == ":q" {
                break;
            }
            writeln!(output, "telnet: {line}")?;
        }
        Ok(())
    }
}

/// Command log that records entries in the journal, or fails every write.
pub struct FakeLog {
    journal: Journal,
    broken: bool,
}

impl FakeLog {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            broken: false,
        }
    }

    pub fn broken(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            broken: true,
        }
    }
}

impl rcon_core::LogSink for FakeLog {
    fn write(&self, path: &Path, address: &str, command: &str, result: &str) -> io::Result<()> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.journal.borrow_mut().push(Event::Log {
            path: path.to_path_buf(),
            address: address.to_string(),
            command: command.to_string(),
            result: result.to_string(),
        });
        Ok(())
    }
}

/// The three protocol fakes plus the log, wired into a dispatcher.
pub struct Fakes {
    pub rcon: FakeClient,
    pub telnet: FakeClient,
    pub web: FakeClient,
    pub log: FakeLog,
}

impl Fakes {
    pub fn new(journal: &Journal) -> Self {
        Self {
            rcon: FakeClient::new("rcon", journal),
            telnet: FakeClient::new("telnet", journal),
            web: FakeClient::new("web", journal),
            log: FakeLog::new(journal),
        }
    }

    pub fn dispatcher(self) -> Dispatcher {
        Dispatcher::new(
            Box::new(self.rcon),
            Box::new(self.telnet),
            Box::new(self.web),
            Box::new(self.log),
        )
    }

    /// An executor reading `input` as if typed at the terminal.
    pub fn executor(self, input: &str) -> Executor<Cursor<Vec<u8>>, Vec<u8>> {
        Executor::new(
            self.dispatcher(),
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        )
    }
}

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn events(journal: &Journal) -> Vec<Event> {
    journal.borrow().clone()
}

pub fn execute(client: &'static str, address: &str, password: &str, command: &str) -> Event {
    Event::Execute {
        client,
        address: address.to_string(),
        password: password.to_string(),
        command: command.to_string(),
    }
}

pub fn check(client: &'static str, address: &str, password: &str) -> Event {
    Event::Check {
        client,
        address: address.to_string(),
        password: password.to_string(),
    }
}

pub fn logged(path: &str, address: &str, command: &str, result: &str) -> Event {
    Event::Log {
        path: PathBuf::from(path),
        address: address.to_string(),
        command: command.to_string(),
        result: result.to_string(),
    }
}

/// Write `contents` to `name` inside `dir` and return the full path.
pub fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write config file");
    path
}
