use crate::demo::{run_demo, run_profiles, run_score, ProfilesArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use estimate_readiness::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Estimate Readiness",
    about = "Score property records for HVAC, Plumbing and Electrical estimate readiness",
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
    /// Score property records or inspect the active trade profiles
    Readiness {
        #[command(subcommand)]
        command: ReadinessCommand,
    },
    /// Score the built-in sample properties and show report caching
    Demo,
}

#[derive(Subcommand, Debug)]
enum ReadinessCommand {
    /// Score a property record stored as JSON
    Score(ScoreArgs),
    /// Print the active trade profiles
    Profiles(ProfilesArgs),
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
        Command::Readiness {
            command: ReadinessCommand::Score(args),
        } => run_score(args).await,
        Command::Readiness {
            command: ReadinessCommand::Profiles(args),
        } => run_profiles(args),
        Command::Demo => run_demo().await,
    }
}
