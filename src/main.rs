//! course-portal binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use course_portal::cli::{self, Command};
use course_portal::config::Config;
use course_portal::{logging, ApiClient, App, Route, SessionManager};
use tracing::{debug, error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_with_filter(config.log_filter()).ok();
    debug!("course-portal v{}", env!("CARGO_PKG_VERSION"));

    let api = match config.to_client_config().map(ApiClient::new) {
        Ok(Ok(api)) => api,
        Ok(Err(e)) => {
            error!(error = %e, "failed to build HTTP client");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let session = Arc::new(SessionManager::hydrate(config.session_store()));
    let mut app = App::new(session, api);

    let command = args
        .command
        .unwrap_or_else(|| Command::Open(Route::home().to_string()));

    match command.execute(&mut app).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
