use buildlog_archiver::store::PreflightError;
use buildlog_archiver::{run, Cli};
use clap::Parser;

/// Exit status when the pre-flight bucket check fails before any work.
const EXIT_PRECONDITION: i32 = 2;

#[tokio::main]
async fn main() {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing for the CLI.
    tracing_subscriber::fmt::init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => tracing::info!("CLI completed successfully"),
        Err(e) => {
            tracing::error!(error = %e, "CLI exited with error");
            eprintln!("[ERROR] {e:#}");
            let code = if e.downcast_ref::<PreflightError>().is_some() {
                EXIT_PRECONDITION
            } else {
                1
            };
            std::process::exit(code);
        }
    }
}
