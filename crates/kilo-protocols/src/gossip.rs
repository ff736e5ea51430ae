//! Receive handlers for neighbour discovery.
//!
//! An `ID` from a robot tells us it is in range and, through the measured
//! signal, how far away it is. An `OHN` additionally tells us one of the
//! sender's own neighbours and the sender's distance to it, which gives the
//! table its adjacency edges and inter-neighbour distances.
//!
//! Whenever a message teaches us something new we answer with an `OHN`
//! describing our own edge to its sender, so the fact spreads a hop further.

use kilo_topology::{EvictionPolicy, NeighborId, NeighborTable, Tick};
use tracing::{debug, trace};

use crate::message::{dist_to_wire, Message};
use crate::queue::{Inbox, Outbox};
use crate::{Error, Result};

/// Find or create the record for `id`. A full table makes room by evicting.
///
/// Returns the record's index and whether it was new.
fn admit<P: EvictionPolicy>(table: &mut NeighborTable<P>, id: NeighborId, now: Tick) -> Result<(usize, bool)> {
    let known = table.index_of(id).is_some();
    let index = match table.update_or_insert(id, now) {
        Ok(i) => i,
        Err(kilo_topology::Error::Full { .. }) => table.add_record(id, now)?,
        Err(e) => return Err(e.into()),
    };
    Ok((index, !known))
}

/// The gossip message announcing that `me` hears `sender` at `dist`.
fn echo(me: NeighborId, sender: NeighborId, dist: f32) -> Message {
    Message::Ohn {
        sender: me,
        ohn: sender,
        dist: dist_to_wire(dist),
    }
}

/// Handle an `ID` from `sender`, heard at `dist`.
pub fn handle_id<P: EvictionPolicy>(
    table: &mut NeighborTable<P>,
    me: NeighborId,
    sender: NeighborId,
    dist: f32,
    now: Tick,
) -> Result<Option<Message>> {
    let (index, new) = admit(table, sender, now)?;
    table.set_self_distance(index, dist)?;
    trace!(%sender, index, dist, new, "id received");
    Ok(new.then(|| echo(me, sender, dist)))
}

/// Handle an `OHN` from `sender` (heard at `dist`) reporting that it hears
/// `ohn` at `ohn_dist`.
pub fn handle_ohn<P: EvictionPolicy>(
    table: &mut NeighborTable<P>,
    me: NeighborId,
    sender: NeighborId,
    ohn: NeighborId,
    ohn_dist: u32,
    dist: f32,
    now: Tick,
) -> Result<Option<Message>> {
    let (index, mut new) = admit(table, sender, now)?;
    table.set_self_distance(index, dist)?;

    if let Some(other) = table.index_of(ohn).filter(|&o| o != index) {
        if !table.is_adjacent(index, other) {
            table.set_adjacent(index, other)?;
            table.mark_new_contact(now);
            new = true;
        }
        table.set_distance(index, other, ohn_dist as f32)?;
    }
    trace!(%sender, %ohn, ohn_dist, new, "ohn received");
    Ok(new.then(|| echo(me, sender, dist)))
}

/// Dispatch a decoded message. Messages claiming to come from `me` are
/// ignored.
pub fn handle<P: EvictionPolicy>(
    table: &mut NeighborTable<P>,
    me: NeighborId,
    message: &Message,
    dist: f32,
    now: Tick,
) -> Result<Option<Message>> {
    match *message {
        Message::None => Ok(None),
        Message::Id { sender } | Message::Ohn { sender, .. } if sender == me => Ok(None),
        Message::Id { sender } => handle_id(table, me, sender, dist, now),
        Message::Ohn { sender, ohn, dist: ohn_dist } => {
            handle_ohn(table, me, sender, ohn, ohn_dist, dist, now)
        }
    }
}

/// Tally of one inbox drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrainStats {
    pub received: u32,
    pub rejected: u32,
    pub gossiped: u32,
    pub dropped: u32,
}

/// Apply every queued reception to the table and queue the resulting
/// gossip. Bad frames and handler failures are logged and skipped.
pub fn drain_inbox<P, const I: usize, const O: usize>(
    table: &mut NeighborTable<P>,
    me: NeighborId,
    inbox: &mut Inbox<I>,
    outbox: &mut Outbox<O>,
    now: Tick,
) -> DrainStats
where
    P: EvictionPolicy,
{
    let mut stats = DrainStats::default();
    for rx in inbox.drain() {
        stats.received += 1;
        let reply = rx
            .frame
            .open()
            .and_then(|message| handle(table, me, &message, rx.dist, now));
        match reply {
            Ok(Some(gossip)) => match outbox.push(gossip) {
                Ok(()) => stats.gossiped += 1,
                Err(Error::QueueFull) => stats.dropped += 1,
                Err(e) => debug!(error = %e, "gossip not queued"),
            },
            Ok(None) => {}
            Err(e) => {
                stats.rejected += 1;
                debug!(error = %e, "reception rejected");
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use kilo_topology::MAX_NEIGHBORS;

    const ME: NeighborId = NeighborId(100);

    fn nid(n: u16) -> NeighborId {
        NeighborId(n)
    }

    #[test]
    fn first_id_is_gossiped_once() {
        let mut t = NeighborTable::new();
        let reply = handle_id(&mut t, ME, nid(1), 42.4, 5).unwrap();
        assert_eq!(
            reply,
            Some(Message::Ohn { sender: ME, ohn: nid(1), dist: 42 })
        );
        assert_eq!(t.self_distance(0), Some(42.4));
        assert_eq!(t.last_new_contact(), 5);

        let again = handle_id(&mut t, ME, nid(1), 44.0, 6).unwrap();
        assert_eq!(again, None);
        assert_eq!(t.self_distance(0), Some(44.0));
        assert_eq!(t.get(0).unwrap().last_time, 6);
    }

    #[test]
    fn ohn_adds_edge_and_distance() {
        let mut t = NeighborTable::new();
        handle_id(&mut t, ME, nid(1), 30.0, 1).unwrap();
        handle_id(&mut t, ME, nid(2), 40.0, 1).unwrap();

        let reply = handle_ohn(&mut t, ME, nid(1), nid(2), 55, 31.0, 2).unwrap();
        assert!(reply.is_some());
        assert!(t.is_adjacent(0, 1));
        assert_eq!(t.distance(0, 1), Some(55.0));
        assert_eq!(t.self_distance(0), Some(31.0));

        // same edge again refreshes the distance but is not news
        let reply = handle_ohn(&mut t, ME, nid(1), nid(2), 57, 31.0, 3).unwrap();
        assert_eq!(reply, None);
        assert_eq!(t.distance(0, 1), Some(57.0));
    }

    #[test]
    fn new_edge_counts_as_neighbourhood_change() {
        let mut t = NeighborTable::new();
        handle_id(&mut t, ME, nid(1), 30.0, 0).unwrap();
        handle_id(&mut t, ME, nid(2), 40.0, 0).unwrap();
        assert_eq!(t.last_new_contact(), 0);

        handle_ohn(&mut t, ME, nid(1), nid(2), 55, 30.0, 123).unwrap();
        assert!(t.is_adjacent(0, 1));
        assert_eq!(t.last_new_contact(), 123);

        // a known edge leaves the clock alone
        handle_ohn(&mut t, ME, nid(2), nid(1), 55, 40.0, 200).unwrap();
        assert_eq!(t.last_new_contact(), 123);
    }

    #[test]
    fn ohn_about_unknown_or_self_adds_no_edge() {
        let mut t = NeighborTable::new();
        let reply = handle_ohn(&mut t, ME, nid(1), nid(9), 20, 30.0, 1).unwrap();
        // sender itself is new
        assert!(reply.is_some());
        assert_eq!(t.len(), 1);
        assert!(!t.is_adjacent(0, 0));

        let reply = handle_ohn(&mut t, ME, nid(1), ME, 30, 30.0, 2).unwrap();
        assert_eq!(reply, None);
    }

    #[test]
    fn own_echo_is_ignored() {
        let mut t = NeighborTable::new();
        let m = Message::Id { sender: ME };
        assert_eq!(handle(&mut t, ME, &m, 10.0, 0), Ok(None));
        assert!(t.is_empty());
    }

    #[test]
    fn full_table_evicts_for_newcomer() {
        let mut t = NeighborTable::new();
        for k in 0..MAX_NEIGHBORS as u16 {
            handle_id(&mut t, ME, nid(k + 1), 20.0, k as Tick + 1).unwrap();
        }
        let reply = handle_id(&mut t, ME, nid(99), 20.0, 100).unwrap();
        assert!(reply.is_some());
        assert_eq!(t.len(), MAX_NEIGHBORS);
        assert_eq!(t.index_of(nid(1)), None);
        assert_eq!(t.index_of(nid(99)), Some(0));
    }

    #[test]
    fn invalid_sender_is_an_error() {
        let mut t = NeighborTable::new();
        assert!(matches!(
            handle_id(&mut t, ME, NeighborId::INVALID, 1.0, 0),
            Err(Error::Topology(_))
        ));
    }

    #[test]
    fn drain_applies_frames_and_queues_gossip() {
        let mut t = NeighborTable::new();
        let mut inbox: Inbox = Inbox::new();
        let mut outbox: Outbox = Outbox::new();

        inbox.deliver(Frame::seal(&Message::Id { sender: nid(1) }), 25.0).unwrap();
        inbox
            .deliver(Frame::seal(&Message::Id { sender: nid(2) }), 35.0)
            .unwrap();
        let mut bad = *Frame::seal(&Message::Id { sender: nid(3) }).as_bytes();
        bad[2] ^= 0xff;
        inbox.deliver(Frame::from_bytes(&bad).unwrap(), 45.0).unwrap();
        inbox
            .deliver(
                Frame::seal(&Message::Ohn { sender: nid(2), ohn: nid(1), dist: 50 }),
                35.0,
            )
            .unwrap();

        let stats = drain_inbox(&mut t, ME, &mut inbox, &mut outbox, 7);
        assert_eq!(
            stats,
            DrainStats { received: 4, rejected: 1, gossiped: 3, dropped: 0 }
        );
        assert!(inbox.is_empty());
        assert_eq!(t.len(), 2);
        assert!(t.is_adjacent(0, 1));
        assert_eq!(outbox.len(), 3);
    }
}
