use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pick_a_date::{
    cli::{Cli, Command, SeedArguments},
    start_server,
    storage::FileStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => start_server(args).await,
        Command::Seed(args) => run_seed(args),
    }
}

fn run_seed(args: SeedArguments) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::new(args.resolved_data_file(), args.template_file.clone());
    if store.seed_from_template(args.force)? {
        tracing::info!("Seeded {}", store.data_path().display());
    } else {
        tracing::warn!(
            "{} already exists, use --force to overwrite",
            store.data_path().display()
        );
    }
    Ok(())
}
