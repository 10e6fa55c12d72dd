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

//! Source RCON packet framing.
//!
//! ```text
//! | size: i32 LE | id: i32 LE | type: i32 LE | body ... | 0x00 | 0x00 |
//! ```
//!
//! `size` counts every byte after itself.

use std::io::Read;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use rcon_core::ProtocolError;

pub const SERVERDATA_AUTH: i32 = 3;
pub const SERVERDATA_AUTH_RESPONSE: i32 = 2;
pub const SERVERDATA_EXECCOMMAND: i32 = 2;
pub const SERVERDATA_RESPONSE_VALUE: i32 = 0;

/// Id the server puts in an auth response when the password is wrong.
pub const AUTH_FAILED_ID: i32 = -1;

const HEADER_SIZE: i32 = 8;
const PADDING_SIZE: i32 = 2;

pub const MIN_PACKET_SIZE: i32 = HEADER_SIZE + PADDING_SIZE;
pub const MAX_PACKET_SIZE: i32 = 4096 + MIN_PACKET_SIZE;

/// Longest command body servers reliably accept.
pub const MAX_COMMAND_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub kind: i32,
    pub body: String,
}

impl Packet {
    pub fn new(id: i32, kind: i32, body: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// Value of the leading size field.
    pub fn size(&self) -> i32 {
        self.body.len() as i32 + MIN_PACKET_SIZE
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.size() as usize + 4);
        buf.put_i32_le(self.size());
        buf.put_i32_le(self.id);
        buf.put_i32_le(self.kind);
        buf.put_slice(self.body.as_bytes());
        buf.put_u8(0);
        buf.put_u8(0);
        buf.freeze()
    }

    /// Blocking read of exactly one packet.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, ProtocolError> {
        let mut size = [0u8; 4];
        reader.read_exact(&mut size)?;
        let size = i32::from_le_bytes(size);
        if !(MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&size) {
            return Err(ProtocolError::InvalidPacketSize(size));
        }

        let mut payload = vec![0u8; size as usize];
        reader.read_exact(&mut payload)?;
        let mut payload = Bytes::from(payload);
        let id = payload.get_i32_le();
        let kind = payload.get_i32_le();

        // Servers disagree on how many terminators they send; drop them all.
        let body = payload.as_ref();
        let end = body.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        let body = String::from_utf8_lossy(&body[..end]).into_owned();

        Ok(Self { id, kind, body })
    }
}
