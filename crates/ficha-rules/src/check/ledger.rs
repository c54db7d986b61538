//! One-time gambiarra tokens.

use std::collections::BTreeMap;

use ficha_core::CharacterId;
use serde::{Deserialize, Serialize};

use super::BatchId;

/// Which characters have spent their gambiarra, and in which batch.
///
/// Owned by the encounter and carried across every batch it resolves.
/// Rebuilding it per call would silently reset the one-time limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GambiarraLedger {
    used: BTreeMap<CharacterId, BatchId>,
}

impl GambiarraLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a character may spend a gambiarra.
    ///
    /// While editing a batch, a token that batch itself consumed counts as
    /// available again.
    pub fn is_available(&self, id: CharacterId, editing: Option<BatchId>) -> bool {
        match self.used.get(&id) {
            None => true,
            Some(batch) => editing == Some(*batch),
        }
    }

    /// Record a character's gambiarra in a batch.
    pub fn consume(&mut self, id: CharacterId, batch: BatchId) {
        tracing::info!(character = %id, %batch, "gambiarra consumed");
        self.used.insert(id, batch);
    }

    /// Give back every token a batch consumed.
    pub fn release_batch(&mut self, batch: BatchId) {
        self.used.retain(|_, b| *b != batch);
    }

    /// The batch a character spent their gambiarra in.
    pub fn consumed_in(&self, id: CharacterId) -> Option<BatchId> {
        self.used.get(&id).copied()
    }

    /// Characters that have spent their gambiarra.
    pub fn consumed(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.used.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_per_character() {
        let mut ledger = GambiarraLedger::new();
        let ana = CharacterId::new();
        let bia = CharacterId::new();
        assert!(ledger.is_available(ana, None));
        ledger.consume(ana, BatchId(1));
        assert!(!ledger.is_available(ana, None));
        assert!(!ledger.is_available(ana, Some(BatchId(2))));
        assert!(ledger.is_available(bia, None));
        assert_eq!(ledger.consumed().collect::<Vec<_>>(), vec![ana]);
    }

    #[test]
    fn editing_reopens_own_batch() {
        let mut ledger = GambiarraLedger::new();
        let ana = CharacterId::new();
        ledger.consume(ana, BatchId(1));
        assert!(ledger.is_available(ana, Some(BatchId(1))));
        ledger.release_batch(BatchId(1));
        assert!(ledger.is_available(ana, None));
        assert_eq!(ledger.consumed_in(ana), None);
    }

    #[test]
    fn release_only_touches_that_batch() {
        let mut ledger = GambiarraLedger::new();
        let ana = CharacterId::new();
        let bia = CharacterId::new();
        ledger.consume(ana, BatchId(1));
        ledger.consume(bia, BatchId(2));
        ledger.release_batch(BatchId(1));
        assert!(ledger.is_available(ana, None));
        assert_eq!(ledger.consumed_in(bia), Some(BatchId(2)));
    }
}
