//! Refresh signalling between modals, tables and list coordinators
//!
//! Whoever completes a mutation publishes "refresh requested for <kind>";
//! the coordinator listing that kind flips its refresh token and re-fetches.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shared::EntityKind;
use tokio::sync::broadcast;

const BUS_CAPACITY: usize = 64;

/// Opaque signal: a change, not its value, triggers a re-fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RefreshToken(u64);

impl RefreshToken {
    #[must_use]
    pub fn flipped(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A request to re-fetch every list of one entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequested(pub EntityKind);

/// A request plus its position among the requests published for its kind
#[derive(Debug, Clone, Copy)]
struct Envelope {
    event: RefreshRequested,
    seq: u64,
}

type Sequences = Arc<Mutex<HashMap<EntityKind, u64>>>;

fn published_in(sequences: &Sequences, kind: EntityKind) -> u64 {
    sequences
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&kind)
        .copied()
        .unwrap_or(0)
}

/// Publish/subscribe channel for refresh requests
#[derive(Debug, Clone)]
pub struct RefreshBus {
    sender: broadcast::Sender<Envelope>,
    published: Sequences,
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self {
            sender,
            published: Arc::default(),
        }
    }

    /// Ask every subscriber of `kind` to re-fetch. Returns how many
    /// subscribers were listening.
    pub fn publish(&self, kind: EntityKind) -> usize {
        let mut published = self
            .published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let seq = published.entry(kind).or_insert(0);
        *seq += 1;
        // Sent under the lock so sequence numbers reach the channel in order
        self.sender
            .send(Envelope {
                event: RefreshRequested(kind),
                seq: *seq,
            })
            .unwrap_or(0)
    }

    /// How many requests have been published for `kind`
    pub fn published(&self, kind: EntityKind) -> u64 {
        published_in(&self.published, kind)
    }

    pub fn subscribe(&self, kind: EntityKind) -> RefreshSubscription {
        let published = self
            .published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        RefreshSubscription {
            kind,
            receiver: self.sender.subscribe(),
            seen: published.get(&kind).copied().unwrap_or(0),
            published: Arc::clone(&self.published),
        }
    }
}

/// Receives refresh requests for a single entity kind
#[derive(Debug)]
pub struct RefreshSubscription {
    kind: EntityKind,
    receiver: broadcast::Receiver<Envelope>,
    seen: u64,
    published: Sequences,
}

impl RefreshSubscription {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Sequence number of the last request for this kind received, counting
    /// requests published before the subscription was made
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Wait for the next request for this kind. `None` once the bus is gone.
    ///
    /// Requests missed because the subscriber lagged collapse into one.
    pub async fn recv(&mut self) -> Option<RefreshRequested> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) if envelope.event.0 == self.kind => {
                    if envelope.seq <= self.seen {
                        continue;
                    }
                    self.seen = envelope.seq;
                    return Some(envelope.event);
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    self.seen = published_in(&self.published, self.kind);
                    return Some(RefreshRequested(self.kind));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
