//! rota CLI - JSON のチームファイルに対してスケジューラを動かす
//!
//! チームファイルは `TeamSnapshot` の JSON です。`generate` は計画した
//! 割り当てをファイルに書き戻します（`--dry-run` なら表示のみ）。

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use rota_core::app::{DailyAssignmentSet, ScheduleRow, ScheduleService, parse_date};
use rota_core::domain::{TeamId, TeamSnapshot};
use rota_core::impls::InMemoryAssignmentStore;
use rota_core::ports::{AssignmentStore, Clock, SystemClock, UlidGenerator};
use rota_core::rotation::RotationPolicy;

type Service = ScheduleService<InMemoryAssignmentStore, SystemClock, UlidGenerator<SystemClock>>;

#[derive(Parser, Debug)]
#[command(name = "rota", version, about = "Fair-rotation chore scheduler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan one date and store it in the team file
    Generate {
        #[arg(long)]
        team_file: PathBuf,
        /// YYYY-MM-DD, today when omitted
        #[arg(long)]
        date: Option<String>,
        /// JSON file with a `policy` section
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the plan without writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print stored assignments (one date, or all of them)
    Show {
        #[arg(long)]
        team_file: PathBuf,
        #[arg(long)]
        date: Option<String>,
    },
    /// Print lifetime task counts per member
    Workload {
        #[arg(long)]
        team_file: PathBuf,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RotaConfig {
    #[serde(default)]
    policy: RotationPolicy,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("ROTA_LOG").unwrap_or_else(|_| EnvFilter::new("rota=info,warn"));
    let format = env::var("ROTA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);
    match format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }
}

fn load_config(path: Option<&Path>) -> Result<RotaConfig> {
    let Some(path) = path else {
        return Ok(RotaConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn load_team(path: &Path) -> Result<TeamSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read team file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid team file {}", path.display()))
}

fn service(snapshot: TeamSnapshot, policy: RotationPolicy) -> (TeamId, Service) {
    let team = snapshot.team.id;
    let store = InMemoryAssignmentStore::from_snapshots([snapshot]);
    let service = ScheduleService::new(store, SystemClock, UlidGenerator::new(SystemClock), policy);
    (team, service)
}

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(raw) => Ok(parse_date(raw)?),
        None => Ok(SystemClock.today()),
    }
}

fn print_rows(rows: &[ScheduleRow]) {
    if rows.is_empty() {
        println!("(no assignments)");
        return;
    }
    for row in rows {
        print!("{}  slot {}  {:<20} {}", row.date, row.time_slot, row.task, row.members.join(", "));
        if !row.description.is_empty() {
            print!("  ({})", row.description);
        }
        println!();
    }
}

fn print_plan(set: &DailyAssignmentSet) {
    let rows: Vec<ScheduleRow> = set
        .scheduled
        .iter()
        .map(|s| ScheduleRow::from_scheduled(set.date, s))
        .collect();
    print_rows(&rows);
    for skipped in &set.skipped {
        println!(
            "{}  slot {}  {:<20} SKIPPED: {:?}",
            set.date,
            skipped.time_slot,
            skipped.task_name,
            skipped.reason
        );
    }
    if set.cycle.exhausted {
        println!("(rotation restarted: every combination has occurred)");
    }
}

async fn generate(
    team_file: &Path,
    date: Option<&str>,
    config: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let config = load_config(config)?;
    debug!(policy = ?config.policy, "loaded rotation policy");
    let date = resolve_date(date)?;
    let (team, service) = service(load_team(team_file)?, config.policy);

    let set = if dry_run {
        service.preview(team, date).await?
    } else {
        service.generate(team, date).await?
    };
    print_plan(&set);

    if !dry_run {
        let snapshot = service.store().load_team(team).await?;
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(team_file, json)
            .with_context(|| format!("failed to write team file {}", team_file.display()))?;
        info!(file = %team_file.display(), "team file updated");
    }
    Ok(())
}

async fn show(team_file: &Path, date: Option<&str>) -> Result<()> {
    let (team, service) = service(load_team(team_file)?, RotationPolicy::default());
    let rows = match date {
        Some(raw) => service.schedule_for_date(team, parse_date(raw)?).await?,
        None => service.team_schedule(team).await?,
    };
    print_rows(&rows);
    Ok(())
}

async fn workload(team_file: &Path) -> Result<()> {
    let (team, service) = service(load_team(team_file)?, RotationPolicy::default());
    let report = service.workload(team).await?;
    for entry in &report.entries {
        println!("{:<20} {}", entry.name, entry.tasks);
    }
    println!("spread: {}", report.spread);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            team_file,
            date,
            config,
            dry_run,
        } => generate(&team_file, date.as_deref(), config.as_deref(), dry_run).await,
        Command::Show { team_file, date } => show(&team_file, date.as_deref()).await,
        Command::Workload { team_file } => workload(&team_file).await,
    }
}
