use crate::report::{
    run_account_intake, run_pendency_report, run_session_init, AccountIntakeArgs,
    PendencyReportArgs, SessionInitArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use radar_cs::config::AppConfig;
use radar_cs::error::AppError;
use radar_cs::telemetry::{self, LogSink};

#[derive(Parser, Debug)]
#[command(
    name = "radar-cs-api",
    about = "Score Customer Success portfolios for pending follow-ups and serve the radar API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a portfolio export and print the pendency radar
    Pendencies {
        #[command(subcommand)]
        command: PendenciesCommand,
    },
    /// Convert CRM exports into portfolio JSON
    Intake {
        #[command(subcommand)]
        command: IntakeCommand,
    },
    /// Manage the local session file used by CLI reports
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PendenciesCommand {
    /// Rank accounts by urgency and print the summary
    Report(PendencyReportArgs),
}

#[derive(Subcommand, Debug)]
enum IntakeCommand {
    /// Convert an accounts CSV export into a portfolio snapshot
    Accounts(AccountIntakeArgs),
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Write a session file for the signed-in user
    Init(SessionInitArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Pendencies {
            command: PendenciesCommand::Report(args),
        } => {
            init_cli_logging()?;
            run_pendency_report(args)
        }
        Command::Intake {
            command: IntakeCommand::Accounts(args),
        } => {
            init_cli_logging()?;
            run_account_intake(args)
        }
        Command::Session {
            command: SessionCommand::Init(args),
        } => run_session_init(args),
    }
}

/// Reports own stdout; logs go to stderr.
fn init_cli_logging() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["radar-cs-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn report_arguments_are_parsed() {
        let cli = Cli::try_parse_from([
            "radar-cs-api",
            "pendencies",
            "report",
            "--snapshot",
            "portfolio.json",
            "--csm",
            "Ana",
            "--kind",
            "renewal",
            "--now",
            "2025-10-01",
            "--details",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Pendencies {
                command: PendenciesCommand::Report(args),
            }) => {
                assert_eq!(args.csm.as_deref(), Some("Ana"));
                assert!(args.details);
                assert!(args.now.is_some());
                assert_eq!(
                    args.kind,
                    Some(radar_cs::workflows::pendencies::PendingKind::Renewal)
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = Cli::try_parse_from([
            "radar-cs-api",
            "pendencies",
            "report",
            "--snapshot",
            "portfolio.json",
            "--kind",
            "vibes",
        ]);
        assert!(result.is_err());
    }
}
