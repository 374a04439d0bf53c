use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use wagon_game::TrailRules;

use crate::scenario::TestScenario;
use crate::simulation::{SimulationPlan, SimulationSummary, run_plan};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub average_duration: Elapsed,
    /// One entry per passing iteration.
    pub iteration_times: Vec<Elapsed>,
}

/// Wall-clock time of a run, written to reports as whole microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct Elapsed(Duration);

impl Elapsed {
    fn mean(samples: &[Self]) -> Self {
        let total: Duration = samples.iter().map(|sample| sample.0).sum();
        match u32::try_from(samples.len()) {
            Ok(0) | Err(_) => Self::default(),
            Ok(count) => Self(total / count),
        }
    }
}

impl From<Duration> for Elapsed {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl From<u64> for Elapsed {
    fn from(micros: u64) -> Self {
        Self(Duration::from_micros(micros))
    }
}

impl From<Elapsed> for u64 {
    fn from(elapsed: Elapsed) -> Self {
        Self::try_from(elapsed.0.as_micros()).unwrap_or(Self::MAX)
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

pub struct LogicTester {
    rules: TrailRules,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(rules: TrailRules, verbose: bool) -> Self {
        Self { rules, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {})",
                        scenario.name.bright_white(),
                        seed
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let (successes, failures, iteration_times) =
            self.run_simulation_iterations(&scenario.plan, seed, iterations);

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration: Elapsed::mean(&iteration_times),
            iteration_times,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> (usize, Vec<String>, Vec<Elapsed>) {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut iteration_times = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = run_plan(plan, iteration_seed, &self.rules);

            if let Some(err) = evaluate_expectations(plan, &summary) {
                log::warn!("iteration {} seed {} failed: {err}", i + 1, summary.seed);
                failures.push(format!(
                    "Iteration {} (seed {}, steps {}, rejected {}): {} | {} | final {}",
                    i + 1,
                    summary.seed,
                    summary.steps.len(),
                    summary.rejected_steps(),
                    err,
                    summarize_recent_steps(&summary),
                    summary.final_state
                ));

                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.red()
                    );
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                iteration_times.push(Elapsed::from(duration));

                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) final:{} fingerprint:{:#018x}",
                        i + 1,
                        iterations,
                        summary.final_state,
                        summary.fingerprint
                    );
                }
            }
        }

        (successes, failures, iteration_times)
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation(summary).err())
        .map(|err| format!("{err:#}"))
}

fn summarize_recent_steps(summary: &SimulationSummary) -> String {
    if summary.steps.is_empty() {
        return "no steps recorded".to_string();
    }

    summary
        .steps
        .iter()
        .rev()
        .take(3)
        .map(|record| {
            format!(
                "step {} {} -> {} [{}]",
                record.step,
                record.action,
                record.after,
                record.outcome.log_key(&record.action)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
