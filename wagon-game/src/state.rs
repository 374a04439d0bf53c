use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{INITIAL_DAYS, INITIAL_DISTANCE, INITIAL_SUPPLIES};

/// Immutable snapshot of the wagon's resources.
///
/// Values are only produced by the reducer (or [`WorldState::initial`]); a
/// transition always builds a fresh value instead of mutating its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldState {
    pub supplies: i64,
    pub distance: u64,
    pub days: u64,
}

impl WorldState {
    /// Canonical starting state: 100 supplies, nothing travelled, day zero.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            supplies: INITIAL_SUPPLIES,
            distance: INITIAL_DISTANCE,
            days: INITIAL_DAYS,
        }
    }

    #[must_use]
    pub const fn new(supplies: i64, distance: u64, days: u64) -> Self {
        Self {
            supplies,
            distance,
            days,
        }
    }

    /// Supplies went below zero, which only an accident can cause.
    #[must_use]
    pub const fn is_starved(&self) -> bool {
        self.supplies < 0
    }

    /// Whether spending `cost` leaves supplies at or above zero.
    #[must_use]
    pub const fn can_afford(&self, cost: i64) -> bool {
        self.supplies.saturating_sub(cost) >= 0
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ supplies: {}, distance: {}, days: {} }}",
            self.supplies, self.distance, self.days
        )
    }
}
