// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Bucket, GlobalAlias, Grant, Key, LocalAlias, Version};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

command_enum! {
    (Bucket, Bucket),
    (Key, Key),
    (Grant, Grant),
    (GlobalAlias, GlobalAlias),
    (LocalAlias, LocalAlias),
    (Version, Version),
}

/// Logs go to stderr so stdout only ever carries state JSON.
fn init_logging(level: tracing::Level) -> tracing_appender::non_blocking::WorkerGuard {
    let (stderr_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stderr_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();
    guard
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let guard = init_logging(args.log_level);

    let code = match args.resolve_config() {
        Ok(config) => {
            let ctx = cli::op::OpContext::new(config);
            match args.command.execute(&ctx).await {
                Ok(output) => {
                    println!("{}", output);
                    0
                }
                Err(e) => {
                    tracing::debug!(error = ?e, "command failed");
                    eprintln!("Error: {}", e);
                    1
                }
            }
        }
        Err(e) => {
            eprintln!("Error: Failed to resolve configuration: {}", e);
            1
        }
    };

    // flush buffered log lines before exiting
    drop(guard);
    std::process::exit(code);
}
