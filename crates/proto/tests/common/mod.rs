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

use std::{
    net::{TcpListener, TcpStream},
    thread::{self, JoinHandle},
    time::Duration,
};

use rcon_proto::ClientOptions;

/// A one-shot fake server: accepts a single connection on an ephemeral
/// localhost port and hands it to `handler` on its own thread.
pub struct FakeServer<T> {
    pub address: String,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> FakeServer<T> {
    pub fn spawn<F>(handler: F) -> Self
    where
        F: FnOnce(TcpStream) -> T + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake server");
        let address = listener.local_addr().unwrap().to_string();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("Failed to accept connection");
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            handler(stream)
        });
        Self { address, handle }
    }

    /// Wait for the handler to finish and return what it observed.
    pub fn join(self) -> T {
        self.handle.join().expect("Fake server panicked")
    }
}

/// An address nothing listens on.
pub fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);
    address
}

pub fn test_options() -> ClientOptions {
    ClientOptions {
        dial_timeout: Duration::from_secs(2),
        deadline: Duration::from_secs(2),
    }
}
