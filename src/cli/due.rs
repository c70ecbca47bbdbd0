use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};
use clap::Args;
use serde::Deserialize;

use crate::domain::{Rule, Schedule, ScheduleKind};

#[derive(Args, Debug)]
pub struct DueArgs {
    /// JSON file with one schedule or a list of schedules
    #[arg(long)]
    pub schedules: PathBuf,

    /// JSON file with the account's posting rule
    #[arg(long)]
    pub rule: Option<PathBuf>,

    /// Instant to evaluate at (RFC 3339), defaults to now in local time
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScheduleFile {
    Many(Vec<Schedule>),
    One(Schedule),
}

pub fn run(args: DueArgs) -> anyhow::Result<()> {
    let now: DateTime<FixedOffset> = match &args.at {
        Some(at) => DateTime::parse_from_rfc3339(at)
            .with_context(|| format!("Invalid --at instant: {}", at))?,
        None => Local::now().fixed_offset(),
    };

    let content = fs::read_to_string(&args.schedules)
        .with_context(|| format!("Failed to read {}", args.schedules.display()))?;
    let schedules = match serde_json::from_str(&content)? {
        ScheduleFile::Many(list) => list,
        ScheduleFile::One(schedule) => vec![schedule],
    };

    let rule: Option<Rule> = match &args.rule {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(serde_json::from_str(&content)?)
        }
        None => None,
    };

    if rule.as_ref().is_some_and(|r| !r.is_active()) {
        tracing::warn!("Posting is disabled by the account rule");
    }

    for schedule in &schedules {
        let due = evaluate(schedule, rule.as_ref(), &now);
        println!(
            "{}\t{}\t{}",
            schedule.post_id,
            schedule.type_schedule,
            if due { "due" } else { "-" }
        );
    }

    Ok(())
}

/// A disabled rule blocks everything; rule times replace the times of
/// daily schedules.
fn evaluate<T: Datelike + Timelike>(schedule: &Schedule, rule: Option<&Rule>, now: &T) -> bool {
    match rule {
        Some(rule) if !rule.is_active() => false,
        Some(rule) if schedule.type_schedule == ScheduleKind::Daily && !rule.times.is_empty() => {
            rule.is_posting_time(now)
        }
        _ => schedule.is_due(now),
    }
}
