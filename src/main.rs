use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use configuration::{LogFormat, Settings, init_tracing, load_config};
use feeds::{
    ExtractionCategory, MoonCategory, SortDirection, extraction_rows, moon_rows,
    owned_value_report, sort_rows, user_mining_report,
};
use ingest::parse_survey;
use std::path::PathBuf;
use store::{FeedSource, SnapshotStore};

mod render;

/// The entry point of the moon mining dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Settings may be overridden from a .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    // Keeps the file writer flushing until the process exits.
    let _log_guard = init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve => web_server::run_server(settings).await,
        Commands::Report(args) => handle_report(args, &settings).await,
        Commands::ParseSurvey(args) => handle_parse_survey(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Feeds and reports for tracking moon mining.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path of the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides the configured log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the feeds over HTTP.
    Serve,
    /// Render a feed as a terminal table.
    Report(ReportArgs),
    /// Parse a moon survey file and show what it contains.
    ParseSurvey(ParseSurveyArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFeed {
    Moons,
    OwnedValue,
    UserMining,
    Extractions,
}

#[derive(Parser)]
struct ReportArgs {
    /// The feed to render.
    #[arg(value_enum)]
    feed: ReportFeed,

    /// Snapshot file to read instead of the configured one.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Moons: only moons with a refinery.
    #[arg(long)]
    ours: bool,

    /// Extractions: list past extractions instead of upcoming ones.
    #[arg(long)]
    past: bool,

    /// Moons: only moons last surveyed by this uploader.
    #[arg(long)]
    uploader: Option<String>,

    /// Column to sort the moon or extraction listing by.
    #[arg(long)]
    sort: Option<String>,

    /// Sort in descending order.
    #[arg(long)]
    desc: bool,
}

#[derive(Parser)]
struct ParseSurveyArgs {
    /// File holding the survey text copied from the game client.
    file: PathBuf,

    /// Print the parsed moons as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_report(args: ReportArgs, settings: &Settings) -> anyhow::Result<()> {
    let path = args.snapshot.unwrap_or_else(|| settings.snapshot.path.clone());
    let store = SnapshotStore::from_file(&path).await?;
    let snapshot = store.snapshot().await?;
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };

    let table = match args.feed {
        ReportFeed::Moons => {
            let category = match (&args.uploader, args.ours) {
                (Some(_), _) => MoonCategory::Uploads,
                (None, true) => MoonCategory::Ours,
                (None, false) => MoonCategory::All,
            };
            let mut rows = moon_rows(&snapshot, category, args.uploader.as_deref());
            if let Some(column) = &args.sort {
                sort_rows(&mut rows, column, direction)?;
            }
            render::moons_table(&rows)
        }
        ReportFeed::OwnedValue => render::owned_value_table(&owned_value_report(&snapshot)),
        ReportFeed::UserMining => {
            let today = Utc::now().date_naive();
            let months = settings.mining.user_mining_months;
            render::user_mining_table(&user_mining_report(&snapshot, today, months), today, months)
        }
        ReportFeed::Extractions => {
            let category = if args.past {
                ExtractionCategory::Past
            } else {
                ExtractionCategory::Upcoming
            };
            let mut rows = extraction_rows(&snapshot, category, Utc::now());
            if let Some(column) = &args.sort {
                sort_rows(&mut rows, column, direction)?;
            }
            render::extractions_table(&rows)
        }
    };

    println!("{table}");
    Ok(())
}

async fn handle_parse_survey(args: ParseSurveyArgs) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let moons = parse_survey(&text)?;
    tracing::info!(moons = moons.len(), file = %args.file.display(), "Parsed survey.");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&moons)?);
    } else {
        println!("{}", render::survey_table(&moons));
    }
    Ok(())
}
