//! The simulation reducer: `(state, action) -> state`.
//!
//! Every call is pure and total. The caller keeps the current state and
//! threads the returned value into the next call.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

use crate::action::Action;
use crate::constants::{
    GATHER_DAYS, LOG_ACTION_IGNORED, LOG_GATHERED, LOG_TRAVEL_BLOCKED, LOG_TRAVELED,
    LOG_WAGON_TIPPED, TIPPED_WAGON_DAYS,
};
use crate::numbers::{saturating_scale, saturating_scale_u64};
use crate::rules::TrailRules;
use crate::state::WorldState;

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    InsufficientSupplies { needed: i64, available: i64 },
}

/// What happened to an action.
///
/// `Rejected` and `Ignored` both leave the state untouched; only this value
/// tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Rejected(Rejection),
    Ignored,
}

impl Outcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Stable log key describing the outcome of `action`.
    #[must_use]
    pub const fn log_key(&self, action: &Action) -> &'static str {
        match (self, action) {
            (Self::Rejected(_), _) => LOG_TRAVEL_BLOCKED,
            (Self::Ignored, _) | (Self::Applied, Action::Unknown) => LOG_ACTION_IGNORED,
            (Self::Applied, Action::Gather) => LOG_GATHERED,
            (Self::Applied, Action::Travel { .. }) => LOG_TRAVELED,
            (Self::Applied, Action::TippedWagon) => LOG_WAGON_TIPPED,
        }
    }
}

/// Next state plus the outcome that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub state: WorldState,
    pub outcome: Outcome,
}

/// Apply `action` to `state`, substituting the initial state when `state` is absent.
#[must_use]
pub fn reduce(state: Option<&WorldState>, action: &Action) -> WorldState {
    transition(state, action).state
}

/// [`reduce`] under an explicit rule table.
#[must_use]
pub fn reduce_with(rules: &TrailRules, state: Option<&WorldState>, action: &Action) -> WorldState {
    transition_with(rules, state, action).state
}

/// Like [`reduce`], but also reports whether the action was applied,
/// rejected, or ignored.
#[must_use]
pub fn transition(state: Option<&WorldState>, action: &Action) -> Transition {
    transition_with(&TrailRules::canonical(), state, action)
}

/// [`transition`] under an explicit rule table.
#[must_use]
pub fn transition_with(
    rules: &TrailRules,
    state: Option<&WorldState>,
    action: &Action,
) -> Transition {
    let current = state.copied().unwrap_or_else(|| rules.initial_state());
    let transition = match *action {
        Action::Gather => applied(WorldState {
            supplies: current.supplies.saturating_add(rules.gather_supplies),
            days: current.days.saturating_add(GATHER_DAYS),
            ..current
        }),
        Action::Travel { days } => travel(rules, current, days),
        // No supply floor here: an accident can leave the wagon in debt.
        Action::TippedWagon => applied(WorldState {
            supplies: current.supplies.saturating_sub(rules.tipped_wagon_loss),
            days: current.days.saturating_add(TIPPED_WAGON_DAYS),
            ..current
        }),
        Action::Unknown => {
            log::debug!("{LOG_ACTION_IGNORED}: unknown action, state unchanged");
            Transition {
                state: current,
                outcome: Outcome::Ignored,
            }
        }
    };
    log::trace!(
        "{}: {} -> {}",
        transition.outcome.log_key(action),
        action,
        transition.state
    );
    transition
}

fn travel(rules: &TrailRules, current: WorldState, days: u32) -> Transition {
    let cost = saturating_scale(days, rules.travel_cost_per_day);
    if !current.can_afford(cost) {
        log::debug!(
            "{LOG_TRAVEL_BLOCKED}: {days} day(s) needs {cost} supplies, {} on hand",
            current.supplies
        );
        return Transition {
            state: current,
            outcome: Outcome::Rejected(Rejection::InsufficientSupplies {
                needed: cost,
                available: current.supplies,
            }),
        };
    }
    applied(WorldState {
        supplies: current.supplies.saturating_sub(cost),
        distance: current
            .distance
            .saturating_add(saturating_scale_u64(days, rules.travel_distance_per_day)),
        days: current.days.saturating_add(u64::from(days)),
    })
}

const fn applied(state: WorldState) -> Transition {
    Transition {
        state,
        outcome: Outcome::Applied,
    }
}

/// Thread `actions` through the reducer starting from the absent state.
///
/// An empty sequence yields the initial state.
#[must_use]
pub fn fold<I>(actions: I) -> WorldState
where
    I: IntoIterator,
    I::Item: Borrow<Action>,
{
    fold_with(&TrailRules::canonical(), None, actions)
}

/// Thread `actions` through the reducer starting from `start`.
#[must_use]
pub fn fold_from<I>(start: Option<&WorldState>, actions: I) -> WorldState
where
    I: IntoIterator,
    I::Item: Borrow<Action>,
{
    fold_with(&TrailRules::canonical(), start, actions)
}

/// [`fold_from`] under an explicit rule table.
#[must_use]
pub fn fold_with<I>(rules: &TrailRules, start: Option<&WorldState>, actions: I) -> WorldState
where
    I: IntoIterator,
    I::Item: Borrow<Action>,
{
    let initial = start.copied().unwrap_or_else(|| rules.initial_state());
    actions.into_iter().fold(initial, |state, action| {
        reduce_with(rules, Some(&state), action.borrow())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn state(supplies: i64, distance: u64, days: u64) -> WorldState {
        WorldState::new(supplies, distance, days)
    }

    #[test]
    fn unknown_action_on_absent_state_yields_initial() {
        assert_eq!(reduce(None, &Action::Unknown), state(100, 0, 0));
        assert_eq!(transition(None, &Action::Unknown).outcome, Outcome::Ignored);
    }

    #[test]
    fn absent_state_applies_action_to_default() {
        assert_eq!(reduce(None, &Action::Gather), state(115, 0, 1));
        assert_eq!(
            reduce(None, &Action::Travel { days: 1 }),
            reduce(Some(&WorldState::initial()), &Action::Travel { days: 1 })
        );
    }

    #[test]
    fn gather_adds_supplies_and_a_day() {
        let start = state(-40, 70, 9);
        assert_eq!(reduce(Some(&start), &Action::Gather), state(-25, 70, 10));
    }

    #[test]
    fn travel_spends_supplies_and_covers_ground() {
        let start = state(65, 10, 3);
        let next = transition(Some(&start), &Action::Travel { days: 3 });
        assert_eq!(next.state, state(5, 40, 6));
        assert!(next.outcome.is_applied());
    }

    #[test]
    fn travel_to_exactly_zero_is_allowed() {
        let start = state(60, 0, 0);
        assert_eq!(
            reduce(Some(&start), &Action::Travel { days: 3 }),
            state(0, 30, 3)
        );
    }

    #[test]
    fn travel_beyond_supplies_is_rejected_unchanged() {
        let start = state(5, 40, 6);
        let next = transition(Some(&start), &Action::Travel { days: 3 });
        assert_eq!(next.state, start);
        assert_eq!(
            next.outcome,
            Outcome::Rejected(Rejection::InsufficientSupplies {
                needed: 60,
                available: 5
            })
        );
    }

    #[test]
    fn tipped_wagon_can_go_negative() {
        let start = state(10, 25, 4);
        assert_eq!(
            reduce(Some(&start), &Action::TippedWagon),
            state(-20, 25, 5)
        );
    }

    #[test]
    fn unknown_action_is_identity() {
        let start = state(-3, 12, 8);
        let next = transition(Some(&start), &Action::Unknown);
        assert_eq!(next.state, start);
        assert_eq!(next.outcome, Outcome::Ignored);
    }

    #[test]
    fn outcome_log_keys_distinguish_paths() {
        assert_eq!(Outcome::Applied.log_key(&Action::Gather), "log.gathered");
        assert_eq!(
            Outcome::Applied.log_key(&Action::Travel { days: 1 }),
            "log.traveled"
        );
        assert_eq!(
            Outcome::Applied.log_key(&Action::TippedWagon),
            "log.wagon-tipped"
        );
        assert_eq!(
            Outcome::Ignored.log_key(&Action::Unknown),
            "log.action-ignored"
        );
        let rejected = Outcome::Rejected(Rejection::InsufficientSupplies {
            needed: 20,
            available: 0,
        });
        assert_eq!(
            rejected.log_key(&Action::Travel { days: 1 }),
            "log.travel-blocked"
        );
    }

    #[test]
    fn arithmetic_saturates_instead_of_panicking() {
        let rich = state(i64::MAX, u64::MAX, u64::MAX);
        let next = reduce(Some(&rich), &Action::Gather);
        assert_eq!(next, state(i64::MAX, u64::MAX, u64::MAX));
        let broke = state(i64::MIN, 0, 0);
        assert_eq!(reduce(Some(&broke), &Action::TippedWagon).supplies, i64::MIN);
        assert_eq!(
            reduce(Some(&broke), &Action::Travel { days: u32::MAX }),
            broke
        );
    }

    #[test]
    fn custom_rules_drive_every_rule() {
        let rules = TrailRules {
            initial_supplies: 50,
            gather_supplies: 5,
            travel_cost_per_day: 10,
            travel_distance_per_day: 3,
            tipped_wagon_loss: 50,
        };
        assert_eq!(reduce_with(&rules, None, &Action::Unknown), state(50, 0, 0));
        assert_eq!(reduce_with(&rules, None, &Action::Gather), state(55, 0, 1));
        assert_eq!(
            reduce_with(&rules, None, &Action::Travel { days: 5 }),
            state(0, 15, 5)
        );
        assert_eq!(reduce_with(&rules, None, &Action::TippedWagon), state(0, 0, 1));
    }

    #[test]
    fn fold_threads_state_through_actions() {
        let actions = [
            Action::Travel { days: 1 },
            Action::Gather,
            Action::TippedWagon,
            Action::Travel { days: 3 },
            Action::Travel { days: 3 },
        ];
        assert_eq!(fold(&actions), state(5, 40, 6));
        assert_eq!(fold(Vec::<Action>::new()), WorldState::initial());
        assert_eq!(
            fold_from(Some(&state(0, 0, 0)), [Action::Gather, Action::Gather]),
            state(30, 0, 2)
        );
    }
}
