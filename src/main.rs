//! TimeClock main entrypoint.

use timeclock::errors::AppError;
use timeclock::run;
use timeclock::ui::messages;
use tracing_subscriber::EnvFilter;

/// Exit codes: 0 normal, 1 fatal storage/runtime failure, 2 configuration
/// error.
fn exit_code(e: &AppError) -> i32 {
    match e {
        AppError::Config(_) => 2,
        _ => 1,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        messages::error(format!("{}", e));
        std::process::exit(exit_code(&e));
    }
}
