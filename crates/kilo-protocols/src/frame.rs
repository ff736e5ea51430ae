//! Checksummed transport frame.
//!
//! Format ([`FRAME_LEN`] bytes):
//! [9 bytes] message payload
//! [4 bytes] CRC32 over the payload (LE)

use crc32fast::Hasher;
use tracing::debug;

use crate::message::{Message, PAYLOAD_LEN};
use crate::{Error, Result};

/// Bytes in a sealed frame.
pub const FRAME_LEN: usize = PAYLOAD_LEN + 4;

/// CRC32 of a payload.
pub fn checksum(payload: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(payload);
    hasher.finalize()
}

/// A message as it travels over the air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Encode and checksum a message.
    pub fn seal(message: &Message) -> Self {
        let mut buf = [0u8; FRAME_LEN];
        let payload = message.encode();
        buf[..PAYLOAD_LEN].copy_from_slice(&payload);
        buf[PAYLOAD_LEN..].copy_from_slice(&checksum(&payload).to_le_bytes());
        Self(buf)
    }

    /// Wrap raw received bytes. Short buffers are rejected; extra trailing
    /// bytes are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let raw = data.get(..FRAME_LEN).ok_or(Error::Truncated {
            expected: FRAME_LEN,
            actual: data.len(),
        })?;
        let mut buf = [0u8; FRAME_LEN];
        buf.copy_from_slice(raw);
        Ok(Self(buf))
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Verify the checksum and decode the message.
    pub fn open(&self) -> Result<Message> {
        let (payload, crc) = self.0.split_at(PAYLOAD_LEN);
        let received = u32::from_le_bytes([crc[0], crc[1], crc[2], crc[3]]);
        let computed = checksum(payload);
        if computed != received {
            debug!(computed, received, "dropping frame with bad checksum");
            return Err(Error::Checksum {
                expected: computed,
                actual: received,
            });
        }
        Message::decode(payload)
    }
}
