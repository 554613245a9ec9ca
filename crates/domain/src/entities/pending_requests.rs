use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// Players who asked for an undo or a rematch in the current game instance.
///
/// The two sets are independent; both are emptied together when a rematch starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequests {
    pub undo: BTreeSet<PlayerId>,
    pub rematch: BTreeSet<PlayerId>,
}

impl PendingRequests {
    pub fn from_lists(
        undo: impl IntoIterator<Item = PlayerId>,
        rematch: impl IntoIterator<Item = PlayerId>,
    ) -> Self {
        Self {
            undo: undo.into_iter().collect(),
            rematch: rematch.into_iter().collect(),
        }
    }

    /// Returns false if the player had already asked.
    pub fn request_undo(&mut self, player: PlayerId) -> bool {
        self.undo.insert(player)
    }

    /// Returns false if the player had already asked.
    pub fn request_rematch(&mut self, player: PlayerId) -> bool {
        self.rematch.insert(player)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.rematch.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty() && self.rematch.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str) -> PlayerId {
        PlayerId::parse(id).expect("valid player id")
    }

    #[test]
    fn sets_are_independent_and_deduplicated() {
        let mut pending = PendingRequests::default();
        assert!(pending.request_undo(player("p1")));
        assert!(!pending.request_undo(player("p1")));
        assert!(pending.rematch.is_empty());

        pending.request_rematch(player("p2"));
        pending.clear();
        assert!(pending.is_empty());
    }
}
