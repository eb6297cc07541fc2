//! `mailsift` - search a mailbox by composable, scored criteria.
//!
//! # Usage
//!
//! ```bash
//! # Load a fixture into a database file
//! mailsift import mailbox.json --database mail.db
//!
//! # Unread priority-3 mail for user 1, everything required
//! mailsift search --user 1 --database mail.db --query '{"priority": 3, "isRead": false}'
//!
//! # Attach extracted text to attachment 7
//! mailsift index 7 --text-file invoice.txt --database mail.db
//!
//! # Search a fixture directly, any criterion sufficient
//! mailsift search --user 1 --mailbox mailbox.json --mode or --query-file query.json
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod mailbox;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use mailsift_core::{AttachmentId, EngineConfig, MailRepository, UserId};
use mailsift_filter::{CombineMode, QuerySpec, SearchService};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailbox::Mailbox;

#[derive(Parser)]
#[command(name = "mailsift")]
#[command(about = "Filter and rank mail by sender, subject, dates and attachments")]
#[command(long_about = None)]
struct Cli {
    /// Engine config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a mailbox fixture into a database file
    Import {
        /// Mailbox fixture (JSON with `users` and `mails`)
        mailbox: PathBuf,
        /// Database file to create or extend
        #[arg(short, long)]
        database: PathBuf,
    },
    /// Record text extracted from an attachment so content searches see it
    Index {
        /// Attachment id
        attachment: i64,
        /// File holding the extracted plain text; omit to clear it
        #[arg(long)]
        text_file: Option<PathBuf>,
        /// Database file holding the attachment
        #[arg(short, long)]
        database: PathBuf,
    },
    /// Search one user's mail and print ranked results as JSON
    Search(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Id of the user whose mail is searched
    #[arg(short, long)]
    user: i64,

    /// Query as inline JSON, e.g. '{"sender": ["alice"], "isRead": false}'
    #[arg(short, long, conflicts_with = "query_file")]
    query: Option<String>,

    /// File holding the query JSON
    #[arg(long)]
    query_file: Option<PathBuf>,

    /// How criteria combine: "and" or "or"
    #[arg(short, long, default_value_t = CombineMode::And)]
    mode: CombineMode,

    /// Mailbox fixture to search (loaded into a temporary database)
    #[arg(long, required_unless_present = "database")]
    mailbox: Option<PathBuf>,

    /// Database file to search
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsift=info,mailsift_filter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(EngineConfig::default_path);
    let config = EngineConfig::load(&config_path)
        .await
        .with_context(|| format!("Failed to load engine config {}", config_path.display()))?;

    match cli.command {
        Commands::Import { mailbox, database } => {
            let repo = open_database(&database).await?;
            Mailbox::load(&mailbox).await?.import(&repo).await?;
            info!("Mailbox {} loaded into {}", mailbox.display(), database.display());
        }
        Commands::Index {
            attachment,
            text_file,
            database,
        } => {
            let repo = open_database(&database).await?;
            let text = match &text_file {
                Some(path) => Some(
                    tokio::fs::read_to_string(path)
                        .await
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                ),
                None => None,
            };
            repo.set_indexed_content(AttachmentId(attachment), text.as_deref())
                .await?;
            info!("Indexed content updated for attachment {attachment}");
        }
        Commands::Search(args) => search(args, config).await?,
    }

    Ok(())
}

async fn open_database(path: &std::path::Path) -> Result<MailRepository> {
    let path_str = path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", path.display()))?;
    MailRepository::new(path_str)
        .await
        .with_context(|| format!("Failed to open database {}", path.display()))
}

async fn read_query(args: &SearchArgs) -> Result<QuerySpec> {
    let json = match (&args.query, &args.query_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read query {}", path.display()))?,
        (None, None) => bail!("Provide a query with --query or --query-file"),
    };
    serde_json::from_str(&json).context("Invalid query JSON")
}

async fn search(args: SearchArgs, config: EngineConfig) -> Result<()> {
    let spec = read_query(&args).await?;

    let repo = match &args.database {
        Some(path) => open_database(path).await?,
        None => MailRepository::in_memory().await?,
    };
    if let Some(path) = &args.mailbox {
        Mailbox::load(path).await?.import(&repo).await?;
    }

    let service = SearchService::new(repo, config);
    let views = service
        .search(UserId::new(args.user), &spec, args.mode)
        .await
        .context("Search failed")?;

    info!("{} results for user {} ({})", views.len(), args.user, args.mode);
    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}
