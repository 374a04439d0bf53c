use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;
use wagon_game::{Action, Journey, StepRecord, TrailRules, WorldState};

/// Longest journey a random plan may request in one travel action.
const RANDOM_TRAVEL_MAX_DAYS: u32 = 5;

pub type Expectation = fn(&SimulationSummary) -> anyhow::Result<()>;

/// Where a plan's actions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSource {
    Script(Vec<Action>),
    /// Actions drawn from a ChaCha stream keyed by the iteration seed.
    Random { steps: usize },
}

/// Declarative description of one simulated journey.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub source: ActionSource,
    pub start: Option<WorldState>,
    pub expectations: Vec<Expectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn scripted(actions: Vec<Action>) -> Self {
        Self {
            source: ActionSource::Script(actions),
            start: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn random(steps: usize) -> Self {
        Self {
            source: ActionSource::Random { steps },
            start: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn starting_at(mut self, state: WorldState) -> Self {
        self.start = Some(state);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Resolve the action list for `seed`.
    #[must_use]
    pub fn actions_for(&self, seed: u64) -> Vec<Action> {
        match &self.source {
            ActionSource::Script(actions) => actions.clone(),
            ActionSource::Random { steps } => random_actions(seed, *steps),
        }
    }
}

/// Everything a scenario expectation may inspect after a run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub rules: TrailRules,
    pub start: Option<WorldState>,
    pub actions: Vec<Action>,
    pub steps: Vec<StepRecord>,
    pub final_state: WorldState,
    pub fingerprint: u64,
}

impl SimulationSummary {
    #[must_use]
    pub fn rejected_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_rejected()).count()
    }
}

pub fn run_plan(plan: &SimulationPlan, seed: u64, rules: &TrailRules) -> SimulationSummary {
    let actions = plan.actions_for(seed);
    let journey = replay(plan.start, *rules, &actions);
    let steps = journey.history().to_vec();
    log::debug!(
        "seed {seed}: {} steps, {} rejected",
        steps.len(),
        steps.iter().filter(|s| s.outcome.is_rejected()).count()
    );
    SimulationSummary {
        seed,
        rules: *rules,
        start: plan.start,
        fingerprint: transcript_fingerprint(&steps),
        final_state: journey.state(),
        actions,
        steps,
    }
}

/// Fold `actions` into a fresh journey.
pub fn replay(start: Option<WorldState>, rules: TrailRules, actions: &[Action]) -> Journey {
    let mut journey = match start {
        Some(state) => Journey::from_state(state, rules),
        None => Journey::with_rules(rules),
    };
    journey.apply_all(actions.iter().copied());
    journey
}

/// Stable hash of a step transcript, used to prove replays are deterministic.
pub fn transcript_fingerprint(steps: &[StepRecord]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    steps.hash(&mut hasher);
    hasher.finish()
}

pub fn random_actions(seed: u64, steps: usize) -> Vec<Action> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..steps)
        .map(|_| match rng.gen_range(0..100) {
            0..35 => Action::Gather,
            35..75 => Action::Travel {
                days: rng.gen_range(1..=RANDOM_TRAVEL_MAX_DAYS),
            },
            75..90 => Action::TippedWagon,
            _ => Action::Unknown,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wagon_game::Outcome;

    #[test]
    fn random_actions_are_seed_stable() {
        assert_eq!(random_actions(42, 64), random_actions(42, 64));
        assert_ne!(random_actions(42, 64), random_actions(43, 64));
        assert!(random_actions(7, 200).iter().all(|action| match action {
            Action::Travel { days } => (1..=RANDOM_TRAVEL_MAX_DAYS).contains(days),
            _ => true,
        }));
    }

    #[test]
    fn scripted_plan_runs_from_absent_state() {
        let plan = SimulationPlan::scripted(vec![Action::Unknown, Action::Travel { days: 1 }]);
        let summary = run_plan(&plan, 1, &TrailRules::canonical());
        assert_eq!(summary.final_state, WorldState::new(80, 10, 1));
        assert_eq!(summary.steps[0].outcome, Outcome::Ignored);
        assert_eq!(summary.rejected_steps(), 0);
    }

    #[test]
    fn start_state_overrides_initial_stock() {
        let plan = SimulationPlan::scripted(vec![Action::Travel { days: 1 }])
            .starting_at(WorldState::new(10, 0, 0));
        let summary = run_plan(&plan, 1, &TrailRules::canonical());
        assert_eq!(summary.final_state, WorldState::new(10, 0, 0));
        assert_eq!(summary.rejected_steps(), 1);
    }

    #[test]
    fn fingerprint_tracks_transcript() {
        let rules = TrailRules::canonical();
        let plan = SimulationPlan::random(50);
        let first = run_plan(&plan, 9, &rules);
        let second = run_plan(&plan, 9, &rules);
        assert_eq!(first.fingerprint, second.fingerprint);
        let other = run_plan(&plan, 10, &rules);
        assert_ne!(first.fingerprint, other.fingerprint);
    }

    #[test]
    fn fingerprint_separates_rejected_from_ignored_steps() {
        let rules = TrailRules::canonical();
        let camp = WorldState::new(10, 0, 0);
        let rejected = run_plan(
            &SimulationPlan::scripted(vec![Action::Travel { days: 1 }]).starting_at(camp),
            1,
            &rules,
        );
        let ignored = run_plan(
            &SimulationPlan::scripted(vec![Action::Unknown]).starting_at(camp),
            1,
            &rules,
        );
        assert_eq!(rejected.final_state, ignored.final_state);
        assert_ne!(rejected.fingerprint, ignored.fingerprint);
        assert_eq!(rejected.fingerprint, transcript_fingerprint(&rejected.steps));
    }
}
