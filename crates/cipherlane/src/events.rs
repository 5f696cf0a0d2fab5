//! Public notifications of accepted writes.
//!
//! A notification says which writer changed which slot. It never carries the
//! value, encrypted or not.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use cipherlane_core::{CheckpointSlot, Identity};

/// Emitted after every accepted lane write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementUpdated {
    /// The writer that made the change.
    pub writer: Identity,
    /// The slot that changed.
    pub slot: CheckpointSlot,
}

/// Append-only public log plus live fan-out to subscribers.
#[derive(Debug)]
pub struct EventNotifier {
    log: Vec<RequirementUpdated>,
    sender: broadcast::Sender<RequirementUpdated>,
}

impl EventNotifier {
    /// Create a notifier whose subscribers buffer up to `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            log: Vec::new(),
            sender,
        }
    }

    /// Record and broadcast an event.
    pub fn emit(&mut self, event: RequirementUpdated) {
        self.log.push(event);
        // No subscribers is not an error; the log still has it.
        let _ = self.sender.send(event);
    }

    /// Every event emitted so far, oldest first.
    pub fn events(&self) -> &[RequirementUpdated] {
        &self.log
    }

    /// Receive events emitted from now on.
    ///
    /// Slow subscribers that fall more than `capacity` events behind observe
    /// `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<RequirementUpdated> {
        self.sender.subscribe()
    }
}
