// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 出力フォーマット
#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

/// Sediment - Transactional Migration Runner
///
/// Tracks which migrations have been applied to a database and
/// reconciles that ledger against a directory of migrations.
#[derive(Parser, Debug)]
#[command(name = "sediment")]
#[command(author = "Sediment Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Transactional schema-migration runner")]
#[command(long_about = "Sediment - Transactional Migration Runner

Each migration is a directory containing up.sql and down.sql.
Migrations are applied in lexicographic order of their names,
one transaction per migration, and recorded in a ledger table.

Supported databases: PostgreSQL, MySQL, SQLite")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Initialize a new project:     sediment init --dialect postgresql
  2. Create a migration:            sediment new create users table
  3. Apply all pending migrations:  sediment sync
  4. Check migration status:        sediment st

For detailed help on each command, use: sediment <command> --help")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Target environment
    #[arg(short, long, global = true, value_name = "ENV", default_value = "development")]
    pub env: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new migration project
    ///
    /// Writes a default configuration file and creates the
    /// migrations directory.
    ///
    /// EXAMPLES:
    ///   sediment init --dialect postgresql
    ///   sediment init --dialect sqlite --force
    Init {
        /// Database dialect (postgresql, mysql, sqlite)
        #[arg(short, long, value_name = "DIALECT", default_value = "postgresql")]
        dialect: String,

        /// Force initialization even if config exists
        #[arg(short, long)]
        force: bool,
    },

    /// Migrate up until up-to-date
    Sync,

    /// Migrate 1 up
    Up,

    /// Migrate 1 down
    ///
    /// Asks for confirmation before undoing the most recently
    /// applied migration, since it may delete data.
    Down {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show migration status
    #[command(alias = "st")]
    Status {
        /// Output format (text or json)
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Make a new migration
    ///
    /// EXAMPLES:
    ///   sediment new create users table
    New {
        /// Words describing the migration
        #[arg(required = true, value_name = "WORDS")]
        words: Vec<String>,
    },
}
