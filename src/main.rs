use clap::Parser;
use pmp_experiment_service::api::ApiSurface;
use pmp_experiment_service::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run(ApiSurface::All).await,
        Command::Assignments => cli::serve::run(ApiSurface::Assignments).await,
        Command::Events => cli::serve::run(ApiSurface::Events).await,
        Command::Bucket(args) => cli::bucket::run(args).await,
    }
}
