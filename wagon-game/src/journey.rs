use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::reducer::{Outcome, transition_with};
use crate::rules::TrailRules;
use crate::state::WorldState;

/// One resolved step of a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    pub action: Action,
    pub before: WorldState,
    pub after: WorldState,
    pub outcome: Outcome,
}

/// Caller-owned accumulator binding a rule table to the current state.
///
/// The reducer keeps nothing between calls; a `Journey` is simply the fold
/// held as a value, with a log of every step taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    rules: TrailRules,
    state: Option<WorldState>,
    history: Vec<StepRecord>,
}

impl Journey {
    /// Start a journey that has not yet been initialised.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(TrailRules::canonical())
    }

    #[must_use]
    pub const fn with_rules(rules: TrailRules) -> Self {
        Self {
            rules,
            state: None,
            history: Vec::new(),
        }
    }

    /// Resume from an existing state.
    #[must_use]
    pub const fn from_state(state: WorldState, rules: TrailRules) -> Self {
        Self {
            rules,
            state: Some(state),
            history: Vec::new(),
        }
    }

    /// Apply one action, returning its outcome.
    pub fn apply(&mut self, action: Action) -> Outcome {
        let before = self.state();
        let next = transition_with(&self.rules, self.state.as_ref(), &action);
        self.history.push(StepRecord {
            step: self.history.len() + 1,
            action,
            before,
            after: next.state,
            outcome: next.outcome,
        });
        self.state = Some(next.state);
        next.outcome
    }

    /// Apply every action in order.
    pub fn apply_all<I>(&mut self, actions: I) -> Vec<Outcome>
    where
        I: IntoIterator<Item = Action>,
    {
        actions.into_iter().map(|action| self.apply(action)).collect()
    }

    /// Current state, or the rule table's initial state before the first step.
    #[must_use]
    pub fn state(&self) -> WorldState {
        self.state.unwrap_or_else(|| self.rules.initial_state())
    }

    #[must_use]
    pub const fn rules(&self) -> &TrailRules {
        &self.rules
    }

    #[must_use]
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    #[must_use]
    pub fn accepted_count(&self) -> usize {
        self.count_where(Outcome::is_applied)
    }

    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.count_where(Outcome::is_rejected)
    }

    fn count_where(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.history
            .iter()
            .filter(|record| predicate(&record.outcome))
            .count()
    }

    /// Consume the journey, returning the final state.
    #[must_use]
    pub fn into_state(self) -> WorldState {
        self.state()
    }
}

impl Default for Journey {
    fn default() -> Self {
        Self::new()
    }
}
