use crate::{CardId, GroupId, SortMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MarkerReason {
    NoCardsLeft,
    NoMatchingCards,
    SpreadInProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SurfaceEvent {
    CardSpawned {
        card: CardId,
        identity: String,
    },
    CardFlipped {
        card: CardId,
        identity: String,
        face_up: bool,
    },
    CardDetached {
        card: CardId,
        group: GroupId,
    },
    CardDeleted {
        identity: String,
    },
    GroupCreated {
        group: GroupId,
        members: usize,
        mode: SortMode,
    },
    GroupDeleted {
        group: GroupId,
    },
    GroupStacked {
        group: GroupId,
        stacked: bool,
    },
    GroupFlipped {
        group: GroupId,
    },
    BoxReset,
    Marker {
        reason: MarkerReason,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<SurfaceEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: SurfaceEvent) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SurfaceEvent> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
