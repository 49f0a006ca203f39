use clap::{Parser, Subcommand};

/// Command-line interface definition for TimeClock:
/// the kiosk engine plus its maintenance tools, backed by SQLite.
#[derive(Parser)]
#[command(
    name = "timeclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "RFID badge time clock: kiosk engine, working-time reports and maintenance tools",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Start the kiosk engine (RFID reader + event loop)
    Run {
        #[arg(
            long = "mock",
            help = "Use the mock reader and feed tag ids from stdin"
        )]
        mock: bool,
    },

    /// Register a new employee
    AddEmployee {
        #[arg(long)]
        name: String,

        #[arg(long, help = "RFID tag id (hex, normalised to uppercase)")]
        tag: String,

        #[arg(long, help = "Grant administrator rights")]
        admin: bool,
    },

    /// Insert a clock entry; the in/out action is determined automatically
    InsertEntry {
        #[arg(long, help = "Employee name (partial match supported)")]
        name: Option<String>,

        #[arg(long, help = "Employee RFID tag")]
        tag: Option<String>,

        #[arg(
            long,
            help = "Timestamp for the entry (default: now). Formats: 'YYYY-MM-DD HH:MM[:SS]', 'HH:MM[:SS]', ..."
        )]
        time: Option<String>,
    },

    /// List clock entries for an employee
    ListEntries {
        #[arg(long, help = "Employee name (partial match supported)")]
        name: Option<String>,

        #[arg(long, help = "Employee RFID tag")]
        tag: Option<String>,

        #[arg(long, help = "List all employees instead")]
        all: bool,
    },

    /// Soft-delete a clock entry and repair the in/out sequence
    DeleteEntry {
        #[arg(long)]
        id: i64,

        #[arg(long, help = "Employee name, for verification")]
        name: Option<String>,

        #[arg(long, help = "Employee RFID tag, for verification")]
        tag: Option<String>,

        #[arg(long, short = 'f', help = "Skip verification and confirmation")]
        force: bool,
    },

    /// Change an employee's name
    ChangeEmployeeName {
        #[arg(long, help = "Current employee name (partial match supported)")]
        name: Option<String>,

        #[arg(long, help = "Employee RFID tag")]
        tag: Option<String>,

        #[arg(long = "new-name")]
        new_name: String,
    },

    /// Print a working-time report
    Report {
        #[arg(long, help = "Employee name (partial match supported)")]
        name: Option<String>,

        #[arg(long, help = "Employee RFID tag")]
        tag: Option<String>,

        #[arg(long, help = "Start date (default: first entry)")]
        from: Option<String>,

        #[arg(long, help = "End date (default: today)")]
        to: Option<String>,
    },

    /// Export all active entries as CSV
    Export {
        #[arg(
            long,
            value_name = "DIR",
            help = "Destination directory (default: $TIME_CLOCK_EXPORT_PATH, then ./exports)"
        )]
        out: Option<String>,
    },
}
