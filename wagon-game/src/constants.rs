//! Centralized balance constants for the wagon trail rules.
//!
//! These values define the canonical rule table. `TrailRules::default()`
//! mirrors them one to one; alternate tunings go through `TrailRules` so the
//! canonical numbers only change via reviewed code.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_GATHERED: &str = "log.gathered";
pub(crate) const LOG_TRAVELED: &str = "log.traveled";
pub(crate) const LOG_TRAVEL_BLOCKED: &str = "log.travel-blocked";
pub(crate) const LOG_WAGON_TIPPED: &str = "log.wagon-tipped";
pub(crate) const LOG_ACTION_IGNORED: &str = "log.action-ignored";

// Starting stock -----------------------------------------------------------
pub const INITIAL_SUPPLIES: i64 = 100;
pub const INITIAL_DISTANCE: u64 = 0;
pub const INITIAL_DAYS: u64 = 0;

// Transition amounts -------------------------------------------------------
pub const GATHER_SUPPLY_GAIN: i64 = 15;
pub const GATHER_DAYS: u64 = 1;
pub const TRAVEL_SUPPLY_COST_PER_DAY: i64 = 20;
pub const TRAVEL_DISTANCE_PER_DAY: u64 = 10;
pub const TIPPED_WAGON_SUPPLY_LOSS: i64 = 30;
pub const TIPPED_WAGON_DAYS: u64 = 1;
