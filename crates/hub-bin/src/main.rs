//! Crawlerhub CLI - command-line client for the crawler management backend.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use crawler_api::{ExportKind, TaskStatus};
use std::path::PathBuf;

/// Crawlerhub CLI - manage your account and crawler tasks.
#[derive(Parser)]
#[command(name = "crawlerhub")]
#[command(about = "Crawlerhub CLI for account and crawler task management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with username and password
    Login {
        /// Username; prompted for when omitted
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Logout and clear the stored session
    Logout,

    /// Register a new account
    Register,

    /// Check authentication status
    Status,

    /// Show the signed-in user's profile
    Profile,

    /// Send a verification code to an email address
    SendCode {
        email: String,
    },

    /// Upload a new avatar image
    Avatar {
        /// Path to the image file
        file: PathBuf,
    },

    /// Bind a security email to the account
    BindEmail {
        email: String,
    },

    /// Change the account password
    Passwd,

    /// Manage crawler tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks
    List {
        #[arg(short, long, default_value = "1")]
        page: u32,
        #[arg(short, long, default_value = "10")]
        size: u32,
        /// Filter by status
        #[arg(long)]
        status: Option<StatusArg>,
        /// Filter by platform
        #[arg(long)]
        platform: Option<String>,
        /// Search in task names
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Show one task
    Show {
        id: i64,
    },
    /// Create a task (or save it as a draft)
    Create {
        /// Task name
        #[arg(long)]
        name: String,
        /// Comma-separated ASIN list
        #[arg(long)]
        asins: String,
        /// Data points to collect (repeatable)
        #[arg(long = "info", required = true)]
        required_info: Vec<String>,
        #[arg(long)]
        platform: String,
        #[arg(long)]
        time_cycle: String,
        /// Save as a draft instead of scheduling
        #[arg(long)]
        draft: bool,
    },
    /// Delete a task
    Delete {
        id: i64,
    },
    /// Start (or resume) a task
    Run {
        id: i64,
    },
    /// Pause a running task
    Pause {
        id: i64,
    },
    /// Show crawled price and rank rows for a task
    PriceRanks {
        id: i64,
    },
    /// Show crawled reviews for a task
    Reviews {
        id: i64,
    },
    /// Export task data as a spreadsheet
    Export {
        id: i64,
        #[arg(long, default_value = "price-rank")]
        kind: ExportArg,
        /// Destination file; defaults to task-<id>-<kind>.xlsx
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Trigger the analysis pipeline
    Analyze {
        id: i64,
    },
    /// Poll the analysis pipeline state
    AnalyzeStatus {
        id: i64,
    },
    /// Download the analysis result deck
    Ppt {
        id: i64,
        /// Destination file; defaults to task-<id>-analysis.pptx
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Active,
    Draft,
    Paused,
    Completed,
}

impl From<StatusArg> for TaskStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Active => TaskStatus::Active,
            StatusArg::Draft => TaskStatus::Draft,
            StatusArg::Paused => TaskStatus::Paused,
            StatusArg::Completed => TaskStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportArg {
    PriceRank,
    Review,
}

impl From<ExportArg> for ExportKind {
    fn from(value: ExportArg) -> Self {
        match value {
            ExportArg::PriceRank => ExportKind::PriceRank,
            ExportArg::Review => ExportKind::Review,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    hub_config_and_utils::init_logging(&cli.log_level);

    let ctx = commands::AppContext::bootstrap()?;
    let format = cli.format;

    match cli.command {
        Commands::Login { username } => commands::login(&ctx, username, &format).await,
        Commands::Logout => commands::logout(&ctx, &format),
        Commands::Register => commands::register(&ctx, &format).await,
        Commands::Status => commands::status(&ctx, &format).await,
        Commands::Profile => commands::profile(&ctx, &format).await,
        Commands::SendCode { email } => commands::send_code(&ctx, &email, &format).await,
        Commands::Avatar { file } => commands::avatar(&ctx, &file, &format).await,
        Commands::BindEmail { email } => commands::bind_email(&ctx, &email, &format).await,
        Commands::Passwd => commands::passwd(&ctx, &format).await,
        Commands::Tasks { command } => match command {
            TaskCommands::List {
                page,
                size,
                status,
                platform,
                keyword,
            } => {
                commands::tasks_list(
                    &ctx,
                    page,
                    size,
                    status.map(Into::into),
                    platform,
                    keyword,
                    &format,
                )
                .await
            }
            TaskCommands::Show { id } => commands::tasks_show(&ctx, id, &format).await,
            TaskCommands::Create {
                name,
                asins,
                required_info,
                platform,
                time_cycle,
                draft,
            } => {
                commands::tasks_create(
                    &ctx,
                    name,
                    asins,
                    required_info,
                    platform,
                    time_cycle,
                    draft,
                    &format,
                )
                .await
            }
            TaskCommands::Delete { id } => commands::tasks_delete(&ctx, id, &format).await,
            TaskCommands::Run { id } => commands::tasks_run(&ctx, id, &format).await,
            TaskCommands::Pause { id } => commands::tasks_pause(&ctx, id, &format).await,
            TaskCommands::PriceRanks { id } => commands::tasks_price_ranks(&ctx, id, &format).await,
            TaskCommands::Reviews { id } => commands::tasks_reviews(&ctx, id, &format).await,
            TaskCommands::Export { id, kind, output } => {
                commands::tasks_export(&ctx, id, kind.into(), output, &format).await
            }
            TaskCommands::Analyze { id } => commands::tasks_analyze(&ctx, id, &format).await,
            TaskCommands::AnalyzeStatus { id } => {
                commands::tasks_analyze_status(&ctx, id, &format).await
            }
            TaskCommands::Ppt { id, output } => {
                commands::tasks_ppt(&ctx, id, output, &format).await
            }
        },
    }
}
