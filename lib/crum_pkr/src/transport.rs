use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;

use crate::{
    event_queue::EventQueue,
    poker_events::GameEvent,
    poker_table::{PokerTable, SeatId},
};

/// Outbound side of a node. Delivery is fire-and-forget.
pub trait Transport: Send + Sync {
    fn send_to(&self, to: SeatId, event: GameEvent);

    /// Every other seat receives the event; the sender does not.
    fn broadcast(&self, event: GameEvent);
}

/// In-process transport. Every message crosses the JSON wire codec so
/// nodes only ever see what a remote peer could have sent.
pub struct LocalHub {
    table: Arc<PokerTable>,
    inboxes: Mutex<BTreeMap<SeatId, Arc<EventQueue>>>,
}

impl LocalHub {
    pub fn new(table: Arc<PokerTable>) -> Arc<Self> {
        Arc::new(Self {
            table,
            inboxes: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn table(&self) -> &Arc<PokerTable> {
        &self.table
    }

    /// Seats a node, returning its inbox and outbound link, and announces
    /// the join to everyone seated so far (the newcomer included).
    pub fn attach(
        self: &Arc<Self>,
        seat: SeatId,
        address: impl Into<String>,
    ) -> Option<(Arc<EventQueue>, LocalLink)> {
        let inbox = Arc::new(EventQueue::new());
        {
            let mut inboxes = self.inboxes.lock();
            if !self.table.join(seat, address) {
                tracing::warn!(seat, "Seat unavailable");
                return None;
            }
            inboxes.insert(seat, inbox.clone());
            let joined = GameEvent::PlayerJoined { seat };
            for queue in inboxes.values() {
                Self::deliver(queue, &joined);
            }
        }
        let link = LocalLink {
            hub: self.clone(),
            seat,
        };
        Some((inbox, link))
    }

    /// Injects an event into one inbox as if it came off the network.
    pub fn emit(&self, to: SeatId, event: &GameEvent) {
        let inboxes = self.inboxes.lock();
        match inboxes.get(&to) {
            Some(queue) => Self::deliver(queue, event),
            None => tracing::debug!(to, kind = event.kind(), "No inbox for seat"),
        }
    }

    fn broadcast_from(&self, from: SeatId, event: &GameEvent) {
        let inboxes = self.inboxes.lock();
        for (_, queue) in inboxes.iter().filter(|(seat, _)| **seat != from) {
            Self::deliver(queue, event);
        }
    }

    fn deliver(queue: &EventQueue, event: &GameEvent) {
        let decoded = event
            .to_json()
            .and_then(|payload| GameEvent::from_json(&payload));
        match decoded {
            Ok(event) => queue.push(event),
            Err(err) => tracing::warn!(%err, kind = event.kind(), "Dropping message"),
        }
    }
}

/// A node's handle on the hub.
#[derive(Clone)]
pub struct LocalLink {
    hub: Arc<LocalHub>,
    seat: SeatId,
}

impl LocalLink {
    pub const fn seat(&self) -> SeatId {
        self.seat
    }
}

impl Transport for LocalLink {
    fn send_to(&self, to: SeatId, event: GameEvent) {
        tracing::debug!(from = self.seat, to, kind = event.kind(), "Send");
        self.hub.emit(to, &event);
    }

    fn broadcast(&self, event: GameEvent) {
        tracing::debug!(from = self.seat, kind = event.kind(), "Broadcast");
        self.hub.broadcast_from(self.seat, &event);
    }
}
