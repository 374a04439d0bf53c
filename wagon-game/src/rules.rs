//! Rule table for the reducer.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    GATHER_SUPPLY_GAIN, INITIAL_DAYS, INITIAL_DISTANCE, INITIAL_SUPPLIES,
    TIPPED_WAGON_SUPPLY_LOSS, TRAVEL_DISTANCE_PER_DAY, TRAVEL_SUPPLY_COST_PER_DAY,
};
use crate::state::WorldState;

const DEFAULT_RULES_DATA: &str = include_str!("../assets/rules.json");

/// Errors raised when a rule table violates its invariants.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to parse rules: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
}

/// Amounts applied by each transition rule.
///
/// The default table is the canonical one; every field falls back to it
/// when omitted from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailRules {
    #[serde(default = "TrailRules::default_initial_supplies")]
    pub initial_supplies: i64,
    #[serde(default = "TrailRules::default_gather_supplies")]
    pub gather_supplies: i64,
    #[serde(default = "TrailRules::default_travel_cost_per_day")]
    pub travel_cost_per_day: i64,
    #[serde(default = "TrailRules::default_travel_distance_per_day")]
    pub travel_distance_per_day: u64,
    #[serde(default = "TrailRules::default_tipped_wagon_loss")]
    pub tipped_wagon_loss: i64,
}

impl TrailRules {
    const fn default_initial_supplies() -> i64 {
        INITIAL_SUPPLIES
    }

    const fn default_gather_supplies() -> i64 {
        GATHER_SUPPLY_GAIN
    }

    const fn default_travel_cost_per_day() -> i64 {
        TRAVEL_SUPPLY_COST_PER_DAY
    }

    const fn default_travel_distance_per_day() -> u64 {
        TRAVEL_DISTANCE_PER_DAY
    }

    const fn default_tipped_wagon_loss() -> i64 {
        TIPPED_WAGON_SUPPLY_LOSS
    }

    /// Canonical rule table.
    #[must_use]
    pub const fn canonical() -> Self {
        Self {
            initial_supplies: INITIAL_SUPPLIES,
            gather_supplies: GATHER_SUPPLY_GAIN,
            travel_cost_per_day: TRAVEL_SUPPLY_COST_PER_DAY,
            travel_distance_per_day: TRAVEL_DISTANCE_PER_DAY,
            tipped_wagon_loss: TIPPED_WAGON_SUPPLY_LOSS,
        }
    }

    /// Parse and validate a rule table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any amount is negative.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load the bundled rule table, falling back to the canonical one.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_RULES_DATA).unwrap_or_else(|err| {
            log::warn!("bundled rules rejected, using canonical table: {err}");
            Self::canonical()
        })
    }

    /// Check that no amount is negative.
    ///
    /// # Errors
    ///
    /// Returns the first negative field found.
    pub fn validate(&self) -> Result<(), RulesError> {
        let signed = [
            ("initial_supplies", self.initial_supplies),
            ("gather_supplies", self.gather_supplies),
            ("travel_cost_per_day", self.travel_cost_per_day),
            ("tipped_wagon_loss", self.tipped_wagon_loss),
        ];
        for (field, value) in signed {
            if value < 0 {
                return Err(RulesError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Starting state under this table.
    #[must_use]
    pub const fn initial_state(&self) -> WorldState {
        WorldState::new(self.initial_supplies, INITIAL_DISTANCE, INITIAL_DAYS)
    }
}

impl Default for TrailRules {
    fn default() -> Self {
        Self::canonical()
    }
}
