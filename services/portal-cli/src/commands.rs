use crate::infra::{load_service, parse_gate, parse_instant};
use chrono::{DateTime, Utc};
use clap::Args;
use rcos_portal::config::AppConfig;
use rcos_portal::eligibility::{
    roster, write_roster_csv, CheckCatalog, EligibilityRequest, Gate, ProjectId, SemesterId,
    UserId,
};
use rcos_portal::error::AppError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Portal snapshot (JSON). Defaults to APP_SNAPSHOT.
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Gate to evaluate, e.g. enroll or apply-as-mentor
    #[arg(long, value_parser = parse_gate)]
    pub(crate) gate: Gate,
    /// User id to evaluate
    #[arg(long)]
    pub(crate) user: String,
    /// Semester id (YYYYMM). Defaults to the semester active at the evaluation instant.
    #[arg(long)]
    pub(crate) semester: Option<String>,
    /// Project id, required by the pitch and proposal gates
    #[arg(long)]
    pub(crate) project: Option<String>,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub(crate) at: Option<DateTime<Utc>>,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// Portal snapshot (JSON). Defaults to APP_SNAPSHOT.
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Gate to evaluate for every user
    #[arg(long, value_parser = parse_gate)]
    pub(crate) gate: Gate,
    /// Semester id (YYYYMM). Defaults to the semester active at the evaluation instant.
    #[arg(long)]
    pub(crate) semester: Option<String>,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub(crate) at: Option<DateTime<Utc>>,
    /// Write the CSV here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_check(args: CheckArgs, config: &AppConfig) -> Result<(), AppError> {
    let CheckArgs {
        snapshot,
        gate,
        user,
        semester,
        project,
        at,
        json,
    } = args;

    if gate.requires_project() && project.is_none() {
        warn!(%gate, "gate checks project leadership but no --project was given");
    }

    let service = load_service(snapshot, config)?;
    let request = EligibilityRequest {
        gate,
        user: UserId(user),
        semester: semester.map(SemesterId),
        project: project.map(ProjectId),
        at,
    };
    let report = service.evaluate(&request)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", report.message())?;
    }
    Ok(())
}

pub(crate) fn run_roster(args: RosterArgs, config: &AppConfig) -> Result<(), AppError> {
    let RosterArgs {
        snapshot,
        gate,
        semester,
        at,
        output,
    } = args;

    if gate.requires_project() {
        warn!(%gate, "roster runs without a project; lead and owner checks will fail");
    }

    let service = load_service(snapshot, config)?;
    let rows = roster(&service, gate, semester.map(SemesterId), at)?;
    let eligible = rows.iter().filter(|row| row.passed).count();

    match output {
        Some(path) => {
            let file = BufWriter::new(File::create(&path)?);
            write_roster_csv(&rows, file)?;
            info!(%gate, path = %path.display(), eligible, total = rows.len(), "roster written");
        }
        None => {
            write_roster_csv(&rows, io::stdout().lock())?;
            info!(%gate, eligible, total = rows.len(), "roster written");
        }
    }
    Ok(())
}

pub(crate) fn run_gates(config: &AppConfig) -> Result<(), AppError> {
    let catalog = CheckCatalog::new(config.eligibility);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for gate in Gate::ALL {
        writeln!(out, "{gate}")?;
        for (depth, name) in catalog.gate(gate).outline().into_iter().skip(1) {
            writeln!(out, "{}- {name}", "  ".repeat(depth))?;
        }
    }
    Ok(())
}
