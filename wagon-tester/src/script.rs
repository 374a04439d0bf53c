use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use wagon_game::{Action, Journey, Outcome, Rejection, TrailRules};

use crate::util::split_csv;

/// Parse a comma separated action script such as `travel:1,gather,tippedWagon`.
///
/// In strict mode every token must name a known action with a valid payload;
/// otherwise unrecognised tokens are kept as [`Action::Unknown`].
pub fn parse_script(script: &str, strict: bool) -> Result<Vec<Action>> {
    split_csv(script)
        .into_iter()
        .enumerate()
        .map(|(idx, token)| {
            if strict {
                token
                    .parse::<Action>()
                    .with_context(|| format!("action #{} '{token}' is invalid", idx + 1))
            } else {
                Ok(token.parse::<Action>().unwrap_or_else(|err| {
                    log::warn!("action #{} '{token}' treated as unknown: {err}", idx + 1);
                    Action::Unknown
                }))
            }
        })
        .collect()
}

/// Replay `actions` the way a driver would: probe the absent state with an
/// unknown action, then thread each action through the reducer, printing the
/// state after every call.
pub fn replay_script<W: Write>(
    out: &mut W,
    actions: &[Action],
    rules: TrailRules,
) -> Result<Journey> {
    let mut journey = Journey::with_rules(rules);
    journey.apply(Action::Unknown);
    writeln!(out, "{:>3}  {:<14} {}", 0, "start", journey.state())?;

    for (idx, action) in actions.iter().enumerate() {
        let outcome = journey.apply(*action);
        writeln!(
            out,
            "{:>3}  {:<14} {}{}",
            idx + 1,
            action.to_string(),
            journey.state(),
            describe(outcome)
        )?;
    }

    writeln!(
        out,
        "🏁 {} accepted, {} rejected, final {}",
        journey.accepted_count(),
        journey.rejected_count(),
        journey.state()
    )?;
    Ok(journey)
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Applied => String::new(),
        Outcome::Rejected(Rejection::InsufficientSupplies { needed, available }) => format!(
            "  {}",
            format!("⛔ rejected: needs {needed} supplies, has {available}").red()
        ),
        Outcome::Ignored => format!("  {}", "➖ ignored".yellow()),
    }
}
