use crate::commands::{run_check, run_gates, run_roster, CheckArgs, RosterArgs};
use clap::{Parser, Subcommand};
use rcos_portal::config::AppConfig;
use rcos_portal::error::AppError;
use rcos_portal::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "rcos-portal",
    about = "Evaluate RCOS portal eligibility rules against a portal snapshot",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one gate for one user
    Check(CheckArgs),
    /// Evaluate a gate for every user and export the results as CSV
    Roster(RosterArgs),
    /// List the available gates and the checks each one runs
    Gates,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    debug!(?config.environment, policy = ?config.eligibility, "configuration loaded");

    match cli.command {
        Command::Check(args) => run_check(args, &config),
        Command::Roster(args) => run_roster(args, &config),
        Command::Gates => run_gates(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcos_portal::eligibility::Gate;

    #[test]
    fn parses_check_command() {
        let cli = Cli::try_parse_from([
            "rcos-portal",
            "check",
            "--snapshot",
            "portal.json",
            "--gate",
            "pitch-project",
            "--user",
            "alice",
            "--project",
            "portal",
            "--at",
            "2024-09-15T12:00:00Z",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.gate, Gate::PitchProject);
                assert_eq!(args.user, "alice");
                assert_eq!(args.project.as_deref(), Some("portal"));
                assert!(args.at.is_some());
                assert!(args.json);
            }
            other => panic!("expected check command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_gate() {
        let result = Cli::try_parse_from([
            "rcos-portal",
            "roster",
            "--gate",
            "teleport",
        ]);
        assert!(result.is_err());
    }
}
