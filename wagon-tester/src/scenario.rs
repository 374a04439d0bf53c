use anyhow::{Result, ensure};
use wagon_game::{Action, Outcome, WorldState};

use crate::simulation::{SimulationPlan, SimulationSummary, replay, transcript_fingerprint};

const RANDOM_SWEEP_STEPS: usize = 200;
const GATHER_ONLY_STEPS: usize = 10;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

fn trail_demo_scenario() -> TestScenario {
    TestScenario::new(
        "Trail Demo",
        SimulationPlan::scripted(vec![
            Action::Unknown,
            Action::Travel { days: 1 },
            Action::Gather,
            Action::TippedWagon,
            Action::Travel { days: 3 },
            Action::Travel { days: 3 },
        ])
        .with_expectation(trail_demo_expectation),
    )
}

fn trail_demo_expectation(summary: &SimulationSummary) -> Result<()> {
    let expected = [
        WorldState::new(100, 0, 0),
        WorldState::new(80, 10, 1),
        WorldState::new(95, 10, 2),
        WorldState::new(65, 10, 3),
        WorldState::new(5, 40, 6),
        WorldState::new(5, 40, 6),
    ];
    ensure!(
        summary.steps.len() == expected.len(),
        "expected {} steps, got {}",
        expected.len(),
        summary.steps.len()
    );
    for (record, want) in summary.steps.iter().zip(expected) {
        ensure!(
            record.after == want,
            "step {} ({}) produced {}, expected {}",
            record.step,
            record.action,
            record.after,
            want
        );
    }
    ensure!(
        summary.steps[5].outcome.is_rejected(),
        "final travel should be rejected for lack of supplies"
    );
    Ok(())
}

fn gather_only_scenario() -> TestScenario {
    TestScenario::new(
        "Gather Only",
        SimulationPlan::scripted(vec![Action::Gather; GATHER_ONLY_STEPS])
            .with_expectation(gather_only_expectation),
    )
}

fn gather_only_expectation(summary: &SimulationSummary) -> Result<()> {
    let rules = &summary.rules;
    let gathers = i64::try_from(summary.steps.len())?;
    let want = WorldState::new(
        rules
            .initial_supplies
            .saturating_add(gathers.saturating_mul(rules.gather_supplies)),
        0,
        u64::try_from(gathers)?,
    );
    ensure!(
        summary.final_state == want,
        "gathering produced {}, expected {}",
        summary.final_state,
        want
    );
    Ok(())
}

fn travel_boundary_scenario() -> TestScenario {
    TestScenario::new(
        "Travel Boundary",
        SimulationPlan::scripted(vec![Action::Travel { days: 3 }, Action::Travel { days: 1 }])
            .starting_at(WorldState::new(60, 0, 0))
            .with_expectation(travel_boundary_expectation),
    )
}

fn travel_boundary_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.steps[0].outcome == Outcome::Applied,
        "spending supplies down to exactly zero should be allowed"
    );
    ensure!(
        summary.steps[0].after == WorldState::new(0, 30, 3),
        "boundary travel produced {}",
        summary.steps[0].after
    );
    ensure!(
        summary.steps[1].outcome.is_rejected(),
        "travel with empty supplies should be rejected"
    );
    ensure!(
        summary.final_state.supplies >= 0,
        "Supplies should be >= 0 after travel, got {}",
        summary.final_state.supplies
    );
    Ok(())
}

fn wagon_accident_scenario() -> TestScenario {
    TestScenario::new(
        "Wagon Accident",
        SimulationPlan::scripted(vec![Action::TippedWagon])
            .starting_at(WorldState::new(10, 0, 0))
            .with_expectation(wagon_accident_expectation),
    )
}

fn wagon_accident_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_state == WorldState::new(-20, 0, 1),
        "accident should leave supplies unguarded, got {}",
        summary.final_state
    );
    Ok(())
}

fn unknown_actions_scenario() -> TestScenario {
    TestScenario::new(
        "Unknown Actions",
        SimulationPlan::scripted(vec![Action::Unknown; 3])
            .with_expectation(unknown_actions_expectation),
    )
}

fn unknown_actions_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_state == summary.rules.initial_state(),
        "unknown actions should only initialise the state, got {}",
        summary.final_state
    );
    ensure!(
        summary.steps.iter().all(|s| s.outcome == Outcome::Ignored),
        "every unknown action should be ignored"
    );
    Ok(())
}

fn random_sweep_scenario() -> TestScenario {
    TestScenario::new(
        "Random Sweep",
        SimulationPlan::random(RANDOM_SWEEP_STEPS)
            .with_expectation(monotonic_expectation)
            .with_expectation(travel_guard_expectation)
            .with_expectation(deterministic_replay_expectation),
    )
}

fn monotonic_expectation(summary: &SimulationSummary) -> Result<()> {
    for record in &summary.steps {
        ensure!(
            record.after.distance >= record.before.distance
                && record.after.days >= record.before.days,
            "step {} ({}) moved backwards: {} -> {}",
            record.step,
            record.action,
            record.before,
            record.after
        );
    }
    Ok(())
}

fn travel_guard_expectation(summary: &SimulationSummary) -> Result<()> {
    for record in &summary.steps {
        match (record.action, record.outcome) {
            (Action::Travel { .. }, Outcome::Applied) => ensure!(
                record.after.supplies >= 0,
                "step {} travelled into debt: {}",
                record.step,
                record.after
            ),
            (_, Outcome::Rejected(_) | Outcome::Ignored) => ensure!(
                record.after == record.before,
                "step {} ({}) changed state without being applied",
                record.step,
                record.action
            ),
            _ => {}
        }
    }
    Ok(())
}

fn deterministic_replay_expectation(summary: &SimulationSummary) -> Result<()> {
    let journey = replay(summary.start, summary.rules, &summary.actions);
    let fingerprint = transcript_fingerprint(journey.history());
    ensure!(
        fingerprint == summary.fingerprint,
        "replay of seed {} diverged ({fingerprint:#x} != {:#x})",
        summary.seed,
        summary.fingerprint
    );
    Ok(())
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "trail-demo" | "demo" => Some(trail_demo_scenario()),
        "gather-only" | "gather" => Some(gather_only_scenario()),
        "travel-boundary" | "boundary" => Some(travel_boundary_scenario()),
        "wagon-accident" | "accident" => Some(wagon_accident_scenario()),
        "unknown-actions" | "unknown" => Some(unknown_actions_scenario()),
        "random-sweep" | "sweep" => Some(random_sweep_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("trail-demo", "Trail Demo"),
        ("gather-only", "Gather Only"),
        ("travel-boundary", "Travel Boundary"),
        ("wagon-accident", "Wagon Accident"),
        ("unknown-actions", "Unknown Actions"),
        ("random-sweep", "Random Sweep"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::run_plan;
    use wagon_game::TrailRules;

    fn run(scenario: &TestScenario, seed: u64) -> SimulationSummary {
        run_plan(&scenario.plan, seed, &TrailRules::canonical())
    }

    fn check(scenario: &TestScenario, summary: &SimulationSummary) -> Result<()> {
        scenario
            .plan
            .expectations
            .iter()
            .try_for_each(|expectation| expectation(summary))
    }

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, name) in list_scenarios() {
            let scenario = get_scenario(key).expect("listed scenario exists");
            assert_eq!(scenario.name, name);
            assert!(!scenario.plan.expectations.is_empty());
        }
        assert!(get_scenario("stampede").is_none());
        assert_eq!(get_scenario("DEMO").unwrap().name, "Trail Demo");
    }

    #[test]
    fn every_scenario_passes_under_canonical_rules() {
        for (key, _) in list_scenarios() {
            let scenario = get_scenario(key).unwrap();
            for seed in [1, 1337, 0xC0FFEE] {
                let summary = run(&scenario, seed);
                check(&scenario, &summary)
                    .unwrap_or_else(|err| panic!("{key} seed {seed}: {err:#}"));
            }
        }
    }

    #[test]
    fn gather_only_expectation_saturates_with_the_reducer() {
        let rules = TrailRules {
            gather_supplies: i64::MAX / 4,
            ..TrailRules::canonical()
        };
        let scenario = gather_only_scenario();
        let summary = run_plan(&scenario.plan, 1, &rules);
        assert_eq!(summary.final_state.supplies, i64::MAX);
        gather_only_expectation(&summary).unwrap();
    }

    #[test]
    fn trail_demo_expectation_catches_wrong_state() {
        let scenario = trail_demo_scenario();
        let mut summary = run(&scenario, 1);
        summary.steps[2].after = WorldState::new(90, 10, 2);
        let err = check(&scenario, &summary).unwrap_err();
        assert!(err.to_string().contains("step 3"));
    }

    #[test]
    fn travel_guard_flags_state_change_on_rejection() {
        let scenario = random_sweep_scenario();
        let mut summary = run(&scenario, 5);
        let idx = summary
            .steps
            .iter()
            .position(|s| s.outcome == Outcome::Ignored || s.outcome.is_rejected())
            .expect("sweep contains a no-op step");
        summary.steps[idx].after.supplies += 1;
        assert!(travel_guard_expectation(&summary).is_err());
    }

    #[test]
    fn deterministic_replay_detects_tampered_fingerprint() {
        let scenario = random_sweep_scenario();
        let mut summary = run(&scenario, 11);
        deterministic_replay_expectation(&summary).unwrap();
        summary.fingerprint ^= 1;
        assert!(deterministic_replay_expectation(&summary).is_err());
    }
}
