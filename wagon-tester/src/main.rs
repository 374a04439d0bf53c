mod reports;
mod scenario;
mod script;
mod simulation;
mod tester;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;
use wagon_game::TrailRules;

use scenario::{get_scenario, list_scenarios};
use tester::{LogicTester, ScenarioResult};
use util::{parse_seeds, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "wagon-tester", version)]
#[command(about = "Scenario runner and script replayer for the wagon trail reducer")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "trail-demo")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Replay a comma-separated action script (e.g. `travel:1,gather,tippedWagon`) and exit
    #[arg(long)]
    actions: Option<String>,

    /// Reject unrecognised tokens in `--actions` instead of treating them as unknown actions
    #[arg(long)]
    strict: bool,

    /// Seeds to run (comma-separated, decimal or 0x-hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Optional JSON rule table overriding the canonical amounts
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let rules = load_rules(args.rules.as_deref())?;

    if maybe_replay_script(&args, rules)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&split_csv(&args.seeds))?;

    let all_results = run_logic_scenarios(&args, &scenarios, &seeds, rules);

    write_reports(&args, &all_results, start_time)?;

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut out = open_output(args.output.as_deref())?;
    writeln!(out, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(out, "  {key:25} - {description}")?;
    }
    out.flush()?;
    Ok(true)
}

fn maybe_replay_script(args: &Args, rules: TrailRules) -> Result<bool> {
    let Some(script) = args.actions.as_deref() else {
        return Ok(false);
    };
    let actions = script::parse_script(script, args.strict)?;
    let mut out = open_output(args.output.as_deref())?;
    script::replay_script(&mut out, &actions, rules)?;
    out.flush()?;
    Ok(true)
}

fn load_rules(path: Option<&Path>) -> Result<TrailRules> {
    let Some(path) = path else {
        return Ok(TrailRules::load_from_static());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rules from {}", path.display()))?;
    let rules = TrailRules::from_json(&raw)
        .with_context(|| format!("invalid rules in {}", path.display()))?;
    log::info!("loaded rules from {}: {rules:?}", path.display());
    Ok(rules)
}

fn announce_banner() {
    println!("{}", "🐂 Wagon Trail Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    rules: TrailRules,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(rules, args.verbose);
    let mut results = Vec::new();

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut out = open_output(args.output.as_deref())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut out, results)?,
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    out,
                    "# Wagon Trail Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                reports::generate_markdown_report(&mut out, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(out, "No logic scenarios executed.")?;
            } else {
                reports::generate_console_report(&mut out, results, start_time.elapsed())?;
            }
            writeln!(out)?;
            writeln!(out, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Report sink: the `--output` file when one is given, stdout otherwise.
fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(stdout()),
    };
    Ok(BufWriter::new(sink))
}
