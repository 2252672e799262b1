use crate::demo::{run_catalog_listing, run_demo, CatalogArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ams_pipeline::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "AMS Pipeline Service",
    about = "Serve and demonstrate the AMS hiring pipeline stage model",
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
    /// Inspect the stage catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Build a sample pipeline end to end and print its flow and report
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// List stage templates grouped by category
    List(CatalogArgs),
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
        Command::Catalog {
            command: CatalogCommand::List(args),
        } => run_catalog_listing(args),
        Command::Demo(args) => run_demo(args),
    }
}
