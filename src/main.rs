use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linksheet::app::{App, Outcome};
use linksheet::config::KeyResolver;
use linksheet::{cli, config, theme};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting linksheet");

    let args = cli::Args::parse();

    let config = config::load(args.config.as_deref())?;
    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(args.theme.as_deref().unwrap_or(&config.theme.name));

    let mut app = App::new(&config, &args, resolver, theme)?;
    let outcome = app.run().await?;

    Ok(match outcome {
        Some(Outcome::Changed(url)) => {
            println!("{url}");
            ExitCode::SUCCESS
        }
        Some(Outcome::Removed) => {
            println!();
            ExitCode::SUCCESS
        }
        Some(Outcome::Cancelled) | None => ExitCode::FAILURE,
    })
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("linksheet").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "linksheet.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
