//! Spendable resources (luck and magic points).
//!
//! A resource holds a starting value and a current value with
//! `0 <= current <= starting`. Spends that would overdraw fail without
//! changing anything; restores clamp at the starting value.

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Which resource a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Luck, rolled at creation as 2d10+50.
    Luck,
    /// Magic points, equal to POW at creation.
    Magic,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Luck => write!(f, "luck"),
            Self::Magic => write!(f, "magic points"),
        }
    }
}

/// A clamped, spendable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    kind: ResourceKind,
    starting: u32,
    current: u32,
}

impl Resource {
    /// Create a resource at its starting value.
    pub fn new(kind: ResourceKind, starting: u32) -> Self {
        Self {
            kind,
            starting,
            current: starting,
        }
    }

    /// Which resource this is.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The starting (maximum) value.
    pub fn starting(&self) -> u32 {
        self.starting
    }

    /// The current value.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Whether `amount` can be spent.
    pub fn can_spend(&self, amount: u32) -> bool {
        self.current >= amount
    }

    /// Spend `amount`, returning the remaining value.
    ///
    /// Fails without mutation when `amount` exceeds the current value.
    pub fn spend(&mut self, amount: u32) -> MechResult<u32> {
        if !self.can_spend(amount) {
            return Err(MechError::InsufficientResource {
                resource: self.kind,
                requested: amount,
                available: self.current,
            });
        }
        self.current -= amount;
        Ok(self.current)
    }

    /// Restore up to `amount`, clamped at the starting value.
    /// Returns how much was actually restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.starting - self.current);
        self.current += restored;
        restored
    }

    /// Reset both values to a new starting value.
    pub fn reset(&mut self, starting: u32) {
        self.starting = starting;
        self.current = starting;
    }

    /// Returns true if nothing is left.
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Returns true if the resource is at its starting value.
    pub fn is_full(&self) -> bool {
        self.current >= self.starting
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}/{}", self.kind, self.current, self.starting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_full() {
        let luck = Resource::new(ResourceKind::Luck, 60);
        assert_eq!(luck.current(), 60);
        assert!(luck.is_full());
        assert!(!luck.is_empty());
    }

    #[test]
    fn spend_within_balance() {
        let mut luck = Resource::new(ResourceKind::Luck, 60);
        assert_eq!(luck.spend(15).unwrap(), 45);
        assert_eq!(luck.spend(45).unwrap(), 0);
        assert!(luck.is_empty());
    }

    #[test]
    fn overdraw_fails_without_mutation() {
        let mut magic = Resource::new(ResourceKind::Magic, 10);
        let err = magic.spend(11).unwrap_err();
        assert_eq!(
            err,
            MechError::InsufficientResource {
                resource: ResourceKind::Magic,
                requested: 11,
                available: 10,
            }
        );
        assert_eq!(magic.current(), 10);
    }

    #[test]
    fn spend_zero_is_allowed() {
        let mut luck = Resource::new(ResourceKind::Luck, 0);
        assert_eq!(luck.spend(0).unwrap(), 0);
    }

    #[test]
    fn restore_clamps() {
        let mut luck = Resource::new(ResourceKind::Luck, 50);
        luck.spend(20).unwrap();
        assert_eq!(luck.restore(5), 5);
        assert_eq!(luck.restore(100), 15);
        assert_eq!(luck.current(), 50);
        assert_eq!(luck.restore(0), 0);
    }

    #[test]
    fn reset_refills() {
        let mut magic = Resource::new(ResourceKind::Magic, 55);
        magic.spend(10).unwrap();
        magic.reset(65);
        assert_eq!(magic.starting(), 65);
        assert_eq!(magic.current(), 65);
    }

    #[test]
    fn display() {
        let luck = Resource::new(ResourceKind::Luck, 58);
        assert_eq!(luck.to_string(), "luck: 58/58");
    }
}
