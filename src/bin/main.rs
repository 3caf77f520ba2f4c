use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "moviedeck-server")]
#[command(about = "Movie data proxy for the TMDB API", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "moviedeck.yaml")]
    config: String,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Log as JSON lines instead of plain text.
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(args: &Args) {
    let default_filter = if args.debug {
        "moviedeck=debug,tower_http=debug"
    } else {
        "moviedeck=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match moviedeck::run(&args.config, args.debug).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server stopped");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
