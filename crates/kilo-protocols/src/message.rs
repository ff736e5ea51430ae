//! Fixed-size wire messages.
//!
//! Every message occupies exactly [`PAYLOAD_LEN`] bytes, tagged by its first
//! byte. Integers are little-endian; unused trailing bytes are zero on
//! encode and ignored on decode.
//!
//! ```text
//! NONE  [0x00][ reserved x8 ]
//! ID    [0x01][sender u16][ reserved x6 ]
//! OHN   [0x02][sender u16][ohn u16][dist u32]
//! ```

use std::fmt;

use kilo_topology::NeighborId;

use crate::{Error, Result};

/// Bytes in an encoded message.
pub const PAYLOAD_LEN: usize = 9;

/// Message type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageType {
    /// Keepalive, carries nothing (0x00)
    None = 0x00,
    /// Self announcement (0x01)
    Id = 0x01,
    /// One-hop neighbour gossip (0x02)
    Ohn = 0x02,
}

impl MessageType {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(MessageType::None),
            0x01 => Ok(MessageType::Id),
            0x02 => Ok(MessageType::Ohn),
            other => Err(Error::UnknownType(other)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            MessageType::None => "none",
            MessageType::Id => "id",
            MessageType::Ohn => "ohn",
        }
    }
}

/// A decoded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    None,
    Id {
        sender: NeighborId,
    },
    /// `sender` hears `ohn` at distance `dist`.
    Ohn {
        sender: NeighborId,
        ohn: NeighborId,
        dist: u32,
    },
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::None => MessageType::None,
            Message::Id { .. } => MessageType::Id,
            Message::Ohn { .. } => MessageType::Ohn,
        }
    }

    /// Originating robot, if the message names one.
    pub fn sender(&self) -> Option<NeighborId> {
        match self {
            Message::None => None,
            Message::Id { sender } | Message::Ohn { sender, .. } => Some(*sender),
        }
    }

    pub fn encode(&self) -> [u8; PAYLOAD_LEN] {
        let mut buf = [0u8; PAYLOAD_LEN];
        buf[0] = self.message_type().as_u8();
        match *self {
            Message::None => {}
            Message::Id { sender } => {
                buf[1..3].copy_from_slice(&sender.0.to_le_bytes());
            }
            Message::Ohn { sender, ohn, dist } => {
                buf[1..3].copy_from_slice(&sender.0.to_le_bytes());
                buf[3..5].copy_from_slice(&ohn.0.to_le_bytes());
                buf[5..9].copy_from_slice(&dist.to_le_bytes());
            }
        }
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < PAYLOAD_LEN {
            return Err(Error::Truncated {
                expected: PAYLOAD_LEN,
                actual: data.len(),
            });
        }
        let u16_at = |i: usize| u16::from_le_bytes([data[i], data[i + 1]]);
        Ok(match MessageType::from_u8(data[0])? {
            MessageType::None => Message::None,
            MessageType::Id => Message::Id {
                sender: NeighborId(u16_at(1)),
            },
            MessageType::Ohn => Message::Ohn {
                sender: NeighborId(u16_at(1)),
                ohn: NeighborId(u16_at(3)),
                dist: u32::from_le_bytes([data[5], data[6], data[7], data[8]]),
            },
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message_type().name())?;
        match self {
            Message::None => Ok(()),
            Message::Id { sender } => write!(f, " from {}", sender),
            Message::Ohn { sender, ohn, dist } => {
                write!(f, " from {}: hears {} at {}", sender, ohn, dist)
            }
        }
    }
}

/// Round a distance estimate to its wire representation. Negative and
/// non-finite estimates saturate to zero.
pub fn dist_to_wire(dist: f32) -> u32 {
    if dist.is_finite() && dist > 0.0 {
        dist.round() as u32
    } else {
        0
    }
}
