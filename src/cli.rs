//! Command-line interface for course-portal.
//!
//! Uses lexopt for minimal binary size overhead (~34KB).

use std::ffi::OsString;
use std::path::PathBuf;

use crate::app::App;
use crate::routing::Route;
use crate::session::Session;

/// What to do once the app is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Navigate to a path and show the resulting screen.
    Open(String),
    /// Sign in through the login form.
    Login { username: String, password: String },
    /// Sign out.
    Logout,
    /// Print the stored session.
    Whoami,
    /// Search courses; no term lists everything.
    Search(Option<String>),
}

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Backend base URL (overrides config file).
    pub api_url: Option<String>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Path to the session file (overrides config file).
    pub store: Option<PathBuf>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
    /// Command to run; `None` opens the landing page.
    pub command: Option<Command>,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut positional: Vec<String> = Vec::new();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('u') | Long("api-url") => {
                result.api_url = Some(parser.value()?.parse()?);
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("store") => {
                result.store = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                positional.push(val.string()?);
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    result.command = parse_command(positional)?;
    Ok(result)
}

fn parse_command(positional: Vec<String>) -> Result<Option<Command>, ArgsError> {
    let mut words = positional.into_iter();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<String> = words.collect();

    let command = match (name.as_str(), rest.as_slice()) {
        ("open", [path]) => Command::Open(path.clone()),
        ("login", [username, password]) => Command::Login {
            username: username.clone(),
            password: password.clone(),
        },
        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::Whoami,
        ("search", []) => Command::Search(None),
        ("search", [term]) => Command::Search(Some(term.clone())),
        ("open" | "login" | "logout" | "whoami" | "search", _) => {
            return Err(ArgsError::WrongArity(name));
        }
        _ => return Err(ArgsError::UnexpectedArgument(name)),
    };
    Ok(Some(command))
}

impl Command {
    /// Run the command against an app and produce the text to print.
    ///
    /// The printed screen is taken through [`App::sync`], so it reflects the
    /// session as it stands when the command finishes.
    pub async fn execute(&self, app: &mut App) -> Result<String, crate::PortalError> {
        match self {
            Command::Open(path) => {
                app.open_path(path).await?;
            }
            Command::Login { username, password } => {
                app.submit_login(username, password).await;
            }
            Command::Logout => {
                app.logout().await;
            }
            Command::Whoami => return Ok(describe(&app.session().current_session())),
            Command::Search(term) => {
                app.open(Route::search(term.clone().unwrap_or_default()))
                    .await;
            }
        }
        Ok(app.sync().await.to_string())
    }
}

fn describe(session: &Session) -> String {
    match (session.username(), session.role()) {
        (Some(username), Some(role)) => format!("{} ({})", username, role),
        _ => "not signed in".to_string(),
    }
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"course-portal {version}
Session-aware course portal client

USAGE:
    course-portal [OPTIONS] [COMMAND]

COMMANDS:
    open <PATH>                 Navigate to a path (/, /login, /students, /teachers)
    login <USERNAME> <PASSWORD> Sign in and go to your area
    logout                      Sign out
    whoami                      Show the current session
    search [TERM]               Search public courses

OPTIONS:
    -u, --api-url <URL>     Backend base URL [default: http://localhost:8000]
    -c, --config <FILE>     Path to configuration file (JSON)
    -s, --store <FILE>      Session file; without one the session is not kept
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    COURSE_PORTAL_API_URL    Backend base URL (overrides config)
    COURSE_PORTAL_STORE      Session file (overrides config)
    COURSE_PORTAL_LOG_LEVEL  Log level (overrides config)
    RUST_LOG                 Alternative log level setting

EXAMPLES:
    # Sign in and keep the session between runs
    course-portal -s ~/.course-portal.json login student1 pass123

    # Open the student area with the stored session
    course-portal -s ~/.course-portal.json open /students

    # Public search against another backend
    course-portal -u http://10.0.0.5:8000 search redes
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("course-portal {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Known command with the wrong number of arguments.
    WrongArity(String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::WrongArity(command) => {
                write!(f, "wrong number of arguments for '{}'", command)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
