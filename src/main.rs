//! HerCycle doctor verification service - Application entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hercycle::{
    cli::{Cli, Commands},
    commands,
    config::Config,
};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "hercycle=info,tower_http=info,sea_orm=warn";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::Admin(args) => commands::admin::execute(args, config).await,
    };

    if let Err(e) = result {
        tracing::error!(code = e.code(), "Command failed: {}", e);
        std::process::exit(1);
    }
}

/// `--verbose` overrides `RUST_LOG` with debug output for this crate.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hercycle=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}
