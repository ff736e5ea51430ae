//! Bounded message queues.
//!
//! The radio hands received frames to an [`Inbox`] at any time; the control
//! loop drains it once at the start of each cycle, so the neighbour table is
//! never touched mid-computation. Outgoing gossip waits in an [`Outbox`]
//! until the transmitter asks for the next frame.

use heapless::Deque;
use tracing::warn;

use crate::frame::Frame;
use crate::message::Message;
use crate::{Error, Result};

/// Default outbound queue depth.
pub const OUTBOX_CAPACITY: usize = 8;

/// Default inbound queue depth.
pub const INBOX_CAPACITY: usize = 16;

/// Pending outgoing messages.
#[derive(Debug, Clone)]
pub struct Outbox<const N: usize = OUTBOX_CAPACITY> {
    queue: Deque<Message, N>,
    last: Option<Message>,
    repeat_last: bool,
}

impl<const N: usize> Default for Outbox<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Outbox<N> {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            last: None,
            repeat_last: false,
        }
    }

    /// Keep re-sending the last message while the queue is empty.
    pub fn with_repeat_last(mut self, repeat_last: bool) -> Self {
        self.repeat_last = repeat_last;
        self
    }

    pub fn push(&mut self, message: Message) -> Result<()> {
        self.queue.push_back(message).map_err(|dropped| {
            warn!(%dropped, capacity = N, "outbox full, dropping message");
            Error::QueueFull
        })
    }

    /// Message to put on the air now, if any.
    pub fn next_to_send(&mut self) -> Option<Message> {
        match self.queue.pop_front() {
            Some(m) => {
                self.last = Some(m);
                Some(m)
            }
            None if self.repeat_last => self.last,
            None => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// A frame as received, with the range the hardware measured for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reception {
    pub frame: Frame,
    pub dist: f32,
}

/// Received frames awaiting the next cycle boundary.
#[derive(Debug, Clone)]
pub struct Inbox<const N: usize = INBOX_CAPACITY> {
    queue: Deque<Reception, N>,
    dropped: u32,
}

impl<const N: usize> Default for Inbox<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Inbox<N> {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            dropped: 0,
        }
    }

    /// Accept a frame from the radio. When full the frame is counted and
    /// dropped.
    pub fn deliver(&mut self, frame: Frame, dist: f32) -> Result<()> {
        self.queue.push_back(Reception { frame, dist }).map_err(|_| {
            self.dropped = self.dropped.saturating_add(1);
            Error::QueueFull
        })
    }

    /// Take everything received so far, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Reception> + '_ {
        std::iter::from_fn(move || self.queue.pop_front())
    }

    /// Frames lost to overflow since creation.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
