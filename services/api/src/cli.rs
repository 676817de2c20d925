use crate::demo::{run_demo, run_listings, run_readiness, DemoArgs, ListingsArgs, ReadinessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use smartintern::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SmartIntern",
    about = "Run and demonstrate the SmartIntern onboarding flow from the command line",
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
    /// Walk the whole onboarding flow with scripted answers
    Demo(DemoArgs),
    /// Print the readiness score breakdown
    Readiness(ReadinessArgs),
    /// List internship recommendations for a work-type facet
    Listings(ListingsArgs),
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
        Command::Demo(args) => run_demo(args).await,
        Command::Readiness(args) => run_readiness(args),
        Command::Listings(args) => run_listings(args),
    }
}
