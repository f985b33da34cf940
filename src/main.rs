use anyhow::Result;
use retirement_countdown::cli::{self, App, Command};
use retirement_countdown::config::Config;
use structopt::StructOpt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "retirement_countdown=info,sqlx=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = Command::from_args();

    // Load configuration
    let config = Config::from_env()?;

    let app = App::new(config).await?;

    if let Err(why) = cli::run(&app, command).await {
        tracing::error!("Command failed: {:?}", why);
        std::process::exit(1);
    }

    Ok(())
}
