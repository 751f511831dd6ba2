//! bookline command-line entry point.

use bookline::model::{RecurrencePattern, ResourceKind};
use bookline::session::Role;
use bookline::Config;
use clap::{Parser, Subcommand};

mod cli;

/// bookline: recurring-schedule and conflict-detection engine
#[derive(Parser, Debug)]
#[command(name = "bookline")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Run against the REST backend instead of the offline snapshot,
    /// optionally overriding the configured URL
    #[arg(
        short,
        long,
        global = true,
        num_args = 0..=1,
        default_missing_value = "",
        value_name = "URL"
    )]
    remote: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Preview the occurrences of a recurrence pattern
    Expand {
        /// Pattern: daily, weekly, or monthly
        pattern: RecurrencePattern,
        /// First occurrence instant (ISO-8601)
        start: String,
        /// Inclusive range end (ISO-8601)
        end: String,
        /// Occurrence duration in minutes
        #[arg(short, long, default_value = "60")]
        duration: i64,
        /// Emit every occurrence instead of the 5-entry preview
        #[arg(long)]
        all: bool,
    },
    /// Check a candidate slot for conflicts
    Check {
        /// Candidate start (ISO-8601)
        start: String,
        /// Candidate end (ISO-8601)
        end: String,
        /// Staff scope (absent applies to all staff)
        #[arg(short, long)]
        staff: Option<String>,
        /// Resource scope
        #[arg(long)]
        resource: Option<String>,
        /// Item id to exclude (when re-checking a move)
        #[arg(short, long)]
        exclude: Option<String>,
    },
    /// List scheduled items
    List,
    /// Book an appointment
    Book {
        /// Client name
        client: String,
        /// Start instant (ISO-8601)
        start: String,
        /// Service name (repeatable)
        #[arg(short = 'S', long = "service")]
        services: Vec<String>,
        /// Total duration in minutes (overrides service defaults)
        #[arg(short, long)]
        duration: Option<i64>,
        /// Assigned staff member
        #[arg(short, long)]
        staff: Option<String>,
        /// Required resource
        #[arg(long)]
        resource: Option<String>,
        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Display color (named or hex)
        #[arg(long)]
        color: Option<String>,
    },
    /// Block a time slot
    Block {
        /// Start instant (ISO-8601)
        start: String,
        /// End instant (ISO-8601)
        end: String,
        /// Staff member (absent blocks everyone)
        #[arg(short, long)]
        staff: Option<String>,
        /// Reason shown on the calendar
        #[arg(long)]
        reason: Option<String>,
    },
    /// Move an item to a new slot
    Move {
        /// Item id
        id: String,
        /// New start instant (ISO-8601)
        start: String,
        /// New end instant (ISO-8601)
        end: String,
        /// Commit even when conflicts are reported
        #[arg(short, long)]
        force: bool,
    },
    /// Change an item's end instant
    Resize {
        /// Item id
        id: String,
        /// New end instant (ISO-8601)
        end: String,
        /// Commit even when conflicts are reported
        #[arg(short, long)]
        force: bool,
    },
    /// Edit fields of an item
    Update {
        /// Item id
        id: String,
        /// New start instant (ISO-8601)
        #[arg(long)]
        start: Option<String>,
        /// New end instant (ISO-8601)
        #[arg(long)]
        end: Option<String>,
        /// Reassign to a staff member
        #[arg(short, long)]
        staff: Option<String>,
        /// Replace notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete an item
    Delete {
        /// Item id
        id: String,
    },
    /// Mark an appointment completed
    Complete {
        /// Appointment id
        id: String,
        /// Sale reference to link
        #[arg(short, long)]
        sale: Option<String>,
    },
    /// Claim an unassigned appointment
    Accept {
        /// Appointment id
        id: String,
        /// Staff member claiming the appointment
        staff: String,
    },
    /// Cancel an appointment
    Cancel {
        /// Appointment id
        id: String,
    },
    /// Recurring series management
    Series {
        #[command(subcommand)]
        action: SeriesCommand,
    },
    /// Resource management
    Resources {
        #[command(subcommand)]
        action: ResourceCommand,
    },
    /// Dump the calendar widget feed
    Feed,
    /// Session management
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SeriesCommand {
    /// Create a recurring series of appointments
    Create {
        /// Client name
        client: String,
        /// Pattern: daily, weekly, or monthly
        pattern: RecurrencePattern,
        /// First occurrence instant (ISO-8601)
        start: String,
        /// Inclusive range end (ISO-8601)
        end: String,
        /// Service name (repeatable)
        #[arg(short = 'S', long = "service")]
        services: Vec<String>,
        /// Occurrence duration in minutes
        #[arg(short, long)]
        duration: Option<i64>,
        /// Assigned staff member
        #[arg(short, long)]
        staff: Option<String>,
        /// Required resource
        #[arg(long)]
        resource: Option<String>,
    },
    /// Delete a series, detaching its generated appointments
    Delete {
        /// Series id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ResourceCommand {
    /// List resources
    List,
    /// Create a resource
    Create {
        /// Resource name
        name: String,
        /// Kind: room, equipment, or other
        #[arg(short, long, default_value = "other")]
        kind: ResourceKind,
    },
    /// Deactivate a resource
    Deactivate {
        /// Resource id
        id: String,
    },
    /// Delete an unreferenced resource
    Delete {
        /// Resource id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Sign in and persist the session
    Login {
        /// User id (sent as X-User-Id)
        id: String,
        /// Display name
        name: String,
        /// Role: admin, manager, or staff
        #[arg(short, long, default_value = "staff")]
        role: Role,
    },
    /// Sign out
    Logout,
    /// Show the current session
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    let mode = match &args.remote {
        Some(url) => cli::ExecutionMode::Remote {
            config: Box::new(config.clone()),
            url: if url.is_empty() {
                None
            } else {
                Some(url.clone())
            },
        },
        None => cli::ExecutionMode::Local(Box::new(config.clone())),
    };

    match args.command {
        Command::Expand {
            pattern,
            start,
            end,
            duration,
            all,
        } => cli::run_expand(pattern, &start, &end, duration, all, args.json),
        Command::Check {
            start,
            end,
            staff,
            resource,
            exclude,
        } => cli::run_check(mode, &start, &end, staff, resource, exclude, args.json).await,
        Command::List => cli::run_list(mode, args.json).await,
        Command::Book {
            client,
            start,
            services,
            duration,
            staff,
            resource,
            notes,
            color,
        } => {
            let booking = cli::BookingArgs {
                client,
                services,
                duration,
                owner: staff,
                resource,
                notes,
                color,
            };
            cli::run_book(mode, &start, booking, args.json).await
        }
        Command::Block {
            start,
            end,
            staff,
            reason,
        } => cli::run_block(mode, &start, &end, staff, reason, args.json).await,
        Command::Move {
            id,
            start,
            end,
            force,
        } => cli::run_move(mode, &id, &start, &end, force, args.json).await,
        Command::Resize { id, end, force } => {
            cli::run_resize(mode, &id, &end, force, args.json).await
        }
        Command::Update {
            id,
            start,
            end,
            staff,
            notes,
        } => {
            let update = cli::build_update(start.as_deref(), end.as_deref(), staff, notes)?;
            cli::run_update(mode, &id, update, args.json).await
        }
        Command::Delete { id } => cli::run_delete(mode, &id, args.json).await,
        Command::Complete { id, sale } => cli::run_complete(mode, &id, sale, args.json).await,
        Command::Accept { id, staff } => cli::run_accept(mode, &id, &staff, args.json).await,
        Command::Cancel { id } => cli::run_cancel(mode, &id, args.json).await,
        Command::Series { action } => match action {
            SeriesCommand::Create {
                client,
                pattern,
                start,
                end,
                services,
                duration,
                staff,
                resource,
            } => {
                let booking = cli::BookingArgs {
                    client,
                    services,
                    duration,
                    owner: staff,
                    resource,
                    notes: None,
                    color: None,
                };
                cli::run_series_create(mode, pattern, &start, &end, booking, args.json).await
            }
            SeriesCommand::Delete { id } => cli::run_series_delete(mode, &id, args.json).await,
        },
        Command::Resources { action } => match action {
            ResourceCommand::List => cli::run_resources_list(mode, args.json).await,
            ResourceCommand::Create { name, kind } => {
                cli::run_resources_create(mode, &name, kind, args.json).await
            }
            ResourceCommand::Deactivate { id } => {
                cli::run_resources_deactivate(mode, &id, args.json).await
            }
            ResourceCommand::Delete { id } => {
                cli::run_resources_delete(mode, &id, args.json).await
            }
        },
        Command::Feed => cli::run_feed(mode, args.json).await,
        Command::Session { action } => match action {
            SessionCommand::Login { id, name, role } => {
                cli::run_session_login(&config, &id, &name, role, args.json)
            }
            SessionCommand::Logout => cli::run_session_logout(&config, args.json),
            SessionCommand::Show => cli::run_session_show(&config, args.json),
        },
    }
}
