use std::process::ExitCode;

use jiff::Zoned;
use privat_rates::{UsageError, parse_args, render, retrieve_rates};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(UsageError::Clap(e)) => e.exit(),
        Err(e) => {
            println!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let today = Zoned::now().date();
    match retrieve_rates(&args, today).await {
        Ok(entries) => match render(&entries, args.pretty) {
            Ok(output) => println!("{output}"),
            Err(e) => println!("Error: {e}"),
        },
        Err(e) => {
            debug!(error = ?e, "failed to retrieve exchange rates");
            println!("Error: {e}");
        }
    }

    ExitCode::SUCCESS
}
