//! Command-line front end for the club board.
//!
//! Browses, filters and submits postings against the configured backend.
//! Results go to stdout; logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use club_board::common::PostingId;
use club_board::domains::clubs::{ClubCategory, ClubRegistrar};
use club_board::domains::postings::{FilterState, PostingFeed, PostingWithClub, RoleCategory, Selection};
use club_board::domains::submissions::{PostingDraft, SubmissionCoordinator, SubmitOutcome};
use club_board::kernel::{BaseBoardStore, PostgresStore, RestStore};
use club_board::{Backend, BoardError, Config};

#[derive(Parser)]
#[command(name = "board")]
#[command(about = "Browse and post student club roles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List postings, newest first
    List {
        /// Case-insensitive text matched against title, description and club name
        #[arg(long, default_value = "")]
        query: String,

        /// Role category, or "All"
        #[arg(long, default_value = "All")]
        role: Selection<RoleCategory>,

        /// Club category, or "All"
        #[arg(long, default_value = "All")]
        club: Selection<ClubCategory>,

        /// Print JSON instead of one line per posting
        #[arg(long)]
        json: bool,
    },

    /// Show one posting in full
    Show { id: PostingId },

    /// Submit a new posting
    Submit {
        #[arg(long)]
        club_name: String,
        #[arg(long)]
        club_category: ClubCategory,
        #[arg(long)]
        club_ig_handle: Option<String>,
        #[arg(long)]
        club_logo_url: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        role: RoleCategory,
        #[arg(long)]
        description: String,
        /// YYYY-MM-DD
        #[arg(long)]
        deadline: String,
        #[arg(long)]
        apply_url: String,
        #[arg(long)]
        ig_post_url: String,
    },

    /// Apply database migrations (postgres backend only)
    Migrate,

    /// Print the role and club categories in display order
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,club_board=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        match e.downcast_ref::<BoardError>() {
            Some(board) => {
                eprintln!("{}", board.user_message());
                if board.is_retryable() {
                    eprintln!("Run the same command again to retry.");
                }
            }
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands) -> Result<()> {
    if let Commands::Categories = command {
        print_categories();
        return Ok(());
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(?config.club_registration, timeout = ?config.remote_timeout, "configuration loaded");

    if let Commands::Migrate = command {
        let Backend::Postgres { database_url } = &config.backend else {
            bail!("migrate is only available for the postgres backend");
        };
        let store = PostgresStore::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        store.migrate().await?;
        println!("Migrations complete");
        return Ok(());
    }

    let store = open_store(&config).await?;

    match command {
        Commands::List {
            query,
            role,
            club,
            json,
        } => {
            let mut feed = PostingFeed::new(store, config.remote_timeout);
            feed.refresh().await?;
            let state = FilterState::new()
                .with_query(query)
                .with_role(role)
                .with_club(club);
            let visible = feed.visible(&state);
            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else if visible.is_empty() {
                println!("No postings match.");
            } else {
                for posting in &visible {
                    println!("{}  {}", posting.id, posting.headline());
                }
            }
        }

        Commands::Show { id } => {
            let feed = PostingFeed::new(store, config.remote_timeout);
            let posting = feed.load_posting(id).await?;
            print_detail(&posting);
        }

        Commands::Submit {
            club_name,
            club_category,
            club_ig_handle,
            club_logo_url,
            title,
            role,
            description,
            deadline,
            apply_url,
            ig_post_url,
        } => {
            let draft = PostingDraft {
                club_name,
                club_category,
                club_ig_handle,
                club_logo_url,
                title,
                role_category: role,
                description,
                deadline,
                apply_url,
                ig_post_url,
            };
            let registrar = ClubRegistrar::new(store.clone(), config.club_registration);
            let coordinator = SubmissionCoordinator::new(store, registrar, config.remote_timeout);
            match coordinator.submit(&draft).await? {
                SubmitOutcome::Created(posting) => {
                    println!("Posted! Your role has been published.");
                    println!("{}", posting.id);
                }
                SubmitOutcome::AlreadySubmitting => println!("A submission is already in progress."),
            }
        }

        Commands::Migrate | Commands::Categories => {}
    }

    Ok(())
}

async fn open_store(config: &Config) -> Result<Arc<dyn BaseBoardStore>> {
    let store: Arc<dyn BaseBoardStore> = match &config.backend {
        Backend::Postgres { database_url } => Arc::new(
            PostgresStore::connect(database_url)
                .await
                .context("Failed to connect to database")?,
        ),
        Backend::Rest { api_url, api_key } => Arc::new(
            RestStore::new(api_url, api_key.clone(), config.remote_timeout)
                .context("Failed to set up the backend client")?,
        ),
    };
    Ok(store)
}

fn print_categories() {
    let roles: Vec<&str> = RoleCategory::ALL.iter().map(|c| c.as_str()).collect();
    let clubs: Vec<&str> = ClubCategory::ALL.iter().map(|c| c.as_str()).collect();
    println!("Role: {}", roles.join(", "));
    println!("Club: {}", clubs.join(", "));
}

fn print_detail(posting: &PostingWithClub) {
    println!("{}", posting.headline());
    println!();
    if let Some(club) = &posting.club {
        let verified = if club.verified { " (verified)" } else { "" };
        println!("Club:      {}{}", club.name, verified);
        if let Some(handle) = &club.ig_handle {
            println!("Instagram: @{}", handle.trim_start_matches('@'));
        }
    }
    if !posting.description.is_empty() {
        println!("{}", posting.description);
        println!();
    }
    println!("Apply:     {}", posting.apply_url);
    println!("Post:      {}", posting.ig_post_url);
}
