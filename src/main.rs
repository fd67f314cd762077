mod cli;
mod command;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Copy {
            value,
            file,
            format,
            no_fallback,
            mime_type,
            force_legacy,
        } => {
            let request = command::CopyRequest {
                value,
                file,
                format,
                fallback: !no_fallback,
                mime_type,
                force_legacy,
            };
            if let Err(e) = command::run_copy(request).await {
                tracing::error!(error = %e, "copy failed");
                eprintln!("copyx copy: {e}");
                std::process::exit(1);
            }
        }
        Command::Demo {
            reset_delay_ms,
            keep_history,
            image,
        } => {
            let config = command::DemoConfig {
                reset_delay: std::time::Duration::from_millis(reset_delay_ms),
                keep_history,
                image,
            };
            if let Err(e) = command::run_demo(config).await {
                tracing::error!(error = %e, "demo failed");
                eprintln!("copyx demo: {e}");
                std::process::exit(1);
            }
        }
    }
}
