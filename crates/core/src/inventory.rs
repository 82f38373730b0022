use crate::identity::{all_identities, CardIdentity};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("identity `{0}` is already in play")]
    AlreadyInPlay(String),
    #[error("identity `{0}` is not in play")]
    NotInPlay(String),
    #[error("unknown identity `{0}`")]
    UnknownIdentity(String),
}

/// The used/unused partition over the fixed identity universe. Invariant:
/// `unused ∪ in_use` equals the universe and the two never overlap, so each
/// identity maps to at most one live card. Only `take` and `put_back`
/// mutate the partition, exactly once per spawn and once per delete.
#[derive(Debug, Clone)]
pub struct Inventory {
    all: Vec<CardIdentity>,
    unused: BTreeSet<String>,
    in_use: Vec<String>,
}

impl Inventory {
    pub fn standard() -> Self {
        Self::with_universe(all_identities())
    }

    pub fn with_universe(all: Vec<CardIdentity>) -> Self {
        let unused = all.iter().map(|id| id.key().to_string()).collect();
        Self {
            all,
            unused,
            in_use: Vec::new(),
        }
    }

    pub fn take(&mut self, key: &str) -> Result<(), InventoryError> {
        if !self.unused.remove(key) {
            return if self.in_use.iter().any(|used| used == key) {
                Err(InventoryError::AlreadyInPlay(key.to_string()))
            } else {
                Err(InventoryError::UnknownIdentity(key.to_string()))
            };
        }
        self.in_use.push(key.to_string());
        Ok(())
    }

    pub fn put_back(&mut self, key: &str) -> Result<(), InventoryError> {
        let Some(position) = self.in_use.iter().position(|used| used == key) else {
            return if self.unused.contains(key) {
                Err(InventoryError::NotInPlay(key.to_string()))
            } else {
                Err(InventoryError::UnknownIdentity(key.to_string()))
            };
        };
        self.in_use.remove(position);
        self.unused.insert(key.to_string());
        Ok(())
    }

    pub fn universe(&self) -> &[CardIdentity] {
        &self.all
    }

    pub fn identity(&self, key: &str) -> Option<&CardIdentity> {
        self.all.iter().find(|id| id.key() == key)
    }

    pub fn is_unused(&self, key: &str) -> bool {
        self.unused.contains(key)
    }

    pub fn is_in_use(&self, key: &str) -> bool {
        self.in_use.iter().any(|used| used == key)
    }

    /// Unused identities in canonical universe order.
    pub fn unused_identities(&self) -> Vec<CardIdentity> {
        self.all
            .iter()
            .filter(|id| self.unused.contains(id.key()))
            .cloned()
            .collect()
    }

    pub fn unused_count(&self) -> usize {
        self.unused.len()
    }

    pub fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    pub fn in_use_keys(&self) -> &[String] {
        &self.in_use
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition_holds(inventory: &Inventory) -> bool {
        let total = inventory.unused_count() + inventory.in_use_count();
        let disjoint = inventory
            .in_use_keys()
            .iter()
            .all(|key| !inventory.is_unused(key));
        total == inventory.universe().len() && disjoint
    }

    #[test]
    fn take_and_put_back_round_trip() {
        let mut inventory = Inventory::standard();
        assert_eq!(inventory.unused_count(), 54);
        inventory.take("spade-(7)").unwrap();
        assert!(inventory.is_in_use("spade-(7)"));
        assert!(!inventory.is_unused("spade-(7)"));
        assert!(partition_holds(&inventory));
        inventory.put_back("spade-(7)").unwrap();
        assert!(inventory.is_unused("spade-(7)"));
        assert!(partition_holds(&inventory));
    }

    #[test]
    fn double_take_is_rejected() {
        let mut inventory = Inventory::standard();
        inventory.take("heart-(1)").unwrap();
        assert!(matches!(
            inventory.take("heart-(1)"),
            Err(InventoryError::AlreadyInPlay(_))
        ));
        assert!(partition_holds(&inventory));
    }

    #[test]
    fn put_back_requires_in_play() {
        let mut inventory = Inventory::standard();
        assert!(matches!(
            inventory.put_back("club-(3)"),
            Err(InventoryError::NotInPlay(_))
        ));
        assert!(matches!(
            inventory.take("dragon-(1)"),
            Err(InventoryError::UnknownIdentity(_))
        ));
    }
}
