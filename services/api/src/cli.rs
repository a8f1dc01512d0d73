use crate::explore::{run_explore, ExploreArgs};
use crate::leads::{run_statuses, run_triage, TriageArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use showroom::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Showroom",
    about = "Browse inventory with the swipe deck and manage financing application statuses",
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
    /// Replay a scripted swipe session over an inventory export
    Explore(ExploreArgs),
    /// CRM lead tooling
    Leads {
        #[command(subcommand)]
        command: LeadsCommand,
    },
    /// Print the application status table, legacy aliases included
    Statuses,
}

#[derive(Subcommand, Debug)]
enum LeadsCommand {
    /// Annotate and sort a JSON lead export for follow-up
    Triage(TriageArgs),
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
        Command::Explore(args) => run_explore(args),
        Command::Leads {
            command: LeadsCommand::Triage(args),
        } => run_triage(args),
        Command::Statuses => {
            run_statuses();
            Ok(())
        }
    }
}
