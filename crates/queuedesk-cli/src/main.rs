//! queuedesk - command-line admin console for the hospital queue backend.
//!
//! Signs an administrator in, then lets them inspect and drive department
//! queues, appointments and departments. All state lives in the backend;
//! this binary only issues calls and prints what comes back.

mod app;
mod render;

use std::io;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use queuedesk_core::config::Config;
use queuedesk_core::models::{AppointmentScope, Direction};

#[derive(Parser, Debug)]
#[command(name = "queuedesk", version, about = "Hospital queue admin console")]
struct Cli {
    /// Backend base URL (overrides config and QUEUEDESK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Hospital the departments belong to (overrides config and QUEUEDESK_HOSPITAL_ID)
    #[arg(long, global = true)]
    hospital_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in as an administrator
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "QUEUEDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Keep the password in the OS keychain for next time
        #[arg(long)]
        remember: bool,
    },
    /// Discard the local session
    Logout {
        /// Also remove a remembered password
        #[arg(long)]
        forget: bool,
    },
    /// Show the signed-in account
    Whoami,
    /// Department count and a queue snapshot
    Overview {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    Departments(DepartmentsCommand),
    Queue(QueueCommand),
    Appointments(AppointmentsCommand),
}

#[derive(Args, Debug)]
struct DepartmentsCommand {
    #[command(subcommand)]
    command: DepartmentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DepartmentsSubcommand {
    List,
    Create { name: String },
}

#[derive(Args, Debug)]
struct QueueCommand {
    #[command(subcommand)]
    command: QueueSubcommand,
}

#[derive(Subcommand, Debug)]
enum QueueSubcommand {
    /// Show a department's queue (defaults to the first department, today)
    List {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        date: Option<String>,
        /// Keep refreshing until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Call the next waiting patient
    Next {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Move a queue item one place
    Move {
        id: String,
        #[arg(value_enum)]
        direction: MoveDirection,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(value: MoveDirection) -> Self {
        match value {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

#[derive(Args, Debug)]
struct AppointmentsCommand {
    #[command(subcommand)]
    command: AppointmentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AppointmentsSubcommand {
    Complete { id: String },
    Cancel { id: String },
    /// List the signed-in account's own appointments
    Mine {
        #[arg(long, value_enum)]
        scope: Option<Scope>,
    },
    /// Book an appointment
    Create {
        #[arg(long)]
        department: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Scope {
    Past,
    Upcoming,
}

impl From<Scope> for AppointmentScope {
    fn from(value: Scope) -> Self {
        match value {
            Scope::Past => AppointmentScope::Past,
            Scope::Upcoming => AppointmentScope::Upcoming,
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_target(false))
        .with(filter)
        .init();
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    let _guard = init_tracing();

    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });
    if cli.api_url.is_some() {
        config.api_url = cli.api_url;
    }
    if cli.hospital_id.is_some() {
        config.hospital_id = cli.hospital_id;
    }
    config.warn_missing();
    info!(api_url = %config.base_url(), "queuedesk starting");

    let mut app = App::new(config)?;
    match cli.command {
        Command::Login { email, password, remember } => app.login(email, password, remember).await,
        Command::Logout { forget } => app.logout(forget),
        Command::Whoami => app.whoami().await,
        Command::Overview { department, date } => app.overview(department, date).await,
        Command::Departments(cmd) => match cmd.command {
            DepartmentsSubcommand::List => app.list_departments().await,
            DepartmentsSubcommand::Create { name } => app.create_department(&name).await,
        },
        Command::Queue(cmd) => match cmd.command {
            QueueSubcommand::List { department, date, watch } => {
                app.list_queue(department, date, watch).await
            }
            QueueSubcommand::Next { department, date } => app.next_in_queue(department, date).await,
            QueueSubcommand::Move { id, direction } => app.move_in_queue(&id, direction.into()).await,
        },
        Command::Appointments(cmd) => match cmd.command {
            AppointmentsSubcommand::Complete { id } => app.complete_appointment(&id).await,
            AppointmentsSubcommand::Cancel { id } => app.cancel_appointment(&id).await,
            AppointmentsSubcommand::Mine { scope } => app.my_appointments(scope.map(Into::into)).await,
            AppointmentsSubcommand::Create { department, date, time } => {
                app.create_appointment(department, date, time).await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_queue_move() {
        let cli = Cli::parse_from(["queuedesk", "queue", "move", "q-42", "down"]);
        match cli.command {
            Command::Queue(QueueCommand {
                command: QueueSubcommand::Move { id, direction },
            }) => {
                assert_eq!(id, "q-42");
                assert_eq!(Direction::from(direction), Direction::Down);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_api_url_after_subcommand() {
        let cli = Cli::parse_from(["queuedesk", "whoami", "--api-url", "http://localhost:4000"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:4000"));
    }
}
