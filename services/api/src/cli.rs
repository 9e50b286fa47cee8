use crate::server;
use clap::{Args, Parser, Subcommand};
use touchpoint::error::AppError;
use touchpoint::routing::classify;

#[derive(Parser, Debug)]
#[command(
    name = "Touchpoint Routing",
    about = "Serve touchpoint routing lookups or inspect how a location is classified",
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
    /// Print the category a location expression falls into
    Classify {
        /// Town name, outward code, or full postcode
        location: String,
    },
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
        Command::Classify { location } => {
            println!("{}", classify(&location).label());
            Ok(())
        }
    }
}
