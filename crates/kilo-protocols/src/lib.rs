//! Kilo Protocols - Neighbour Discovery Over a Lossy Broadcast Channel
//!
//! Robots learn about each other from two fixed-size messages:
//!
//! - **ID** announces the sender. Its receipt, together with the range the
//!   receiver's hardware measured, creates or refreshes a neighbour record.
//! - **OHN** ("one-hop neighbour") gossips an edge: the sender hears some
//!   other robot at a given distance. Receivers that know both ends record
//!   the adjacency and the distance between them.
//!
//! New information is re-gossiped one hop further as an OHN describing the
//! receiver's own edge to the sender.
//!
//! # Framing
//!
//! Messages travel inside a [`Frame`] carrying a CRC32 of the payload.
//! Frames that fail the check are dropped before any handler sees them.
//!
//! # Delivery
//!
//! Frames arrive asynchronously; they are parked in a bounded [`Inbox`] and
//! applied to the neighbour table only by [`drain_inbox`], which the control
//! loop calls at the start of each cycle. Replies wait in a bounded
//! [`Outbox`]. Neither queue allocates.

mod error;
pub mod frame;
pub mod gossip;
pub mod message;
pub mod queue;

pub use error::{Error, Result};
pub use frame::{checksum, Frame, FRAME_LEN};
pub use gossip::{drain_inbox, handle, handle_id, handle_ohn, DrainStats};
pub use message::{dist_to_wire, Message, MessageType, PAYLOAD_LEN};
pub use queue::{Inbox, Outbox, Reception, INBOX_CAPACITY, OUTBOX_CAPACITY};
