mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tw_checker_core::{read_usernames, CheckerError, Config, StatusChecker};

/// Check whether accounts are active, suspended or protected.
#[derive(Parser, Debug)]
#[command(name = "tw-checker", version, about, long_about = None)]
struct Args {
    /// JSON config file; TW_CHECKER_* environment variables take precedence.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check usernames given on the command line
    User {
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// Check a file with one username per line
    File { path: PathBuf },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

async fn run(args: Args) -> Result<(), CheckerError> {
    let config = match args.config {
        Some(path) => Config::try_from(path)?,
        None => Config::from_env()?,
    };
    let checker = StatusChecker::from(config);

    let usernames = match args.command {
        Command::User { usernames } => usernames,
        Command::File { path } => read_usernames(&path).await?,
    };

    let colored = output::color_enabled();
    checker
        .check_all(&usernames, |result| {
            Ok(output::print_result(result, colored)?)
        })
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "run aborted");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
