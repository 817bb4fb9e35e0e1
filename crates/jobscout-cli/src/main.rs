use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use jobscout_api::{Job, JobFilters, JobType};
use jobscout_core::{Config, FavoritesStore, JobCatalog};
use jobscout_storage::KvStore;
use jobscout_tui::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(version, about = "Browse remote jobs from Remotive in your terminal", long_about = None)]
struct Cli {
    /// Remotive API base URL
    #[arg(long, env = "JOBSCOUT_API_URL", global = true)]
    api_url: Option<String>,

    /// SQLite file holding favorites
    #[arg(long, env = "JOBSCOUT_STORAGE", global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    Tui,
    /// List jobs, optionally filtered
    Jobs {
        /// Search by title or company
        #[arg(short, long)]
        search: Option<String>,
        /// Category name, e.g. "Software Development"
        #[arg(short, long)]
        category: Option<String>,
        /// full_time, contract, part_time, freelance or internship
        #[arg(short = 't', long, value_parser = parse_filter_type)]
        job_type: Option<JobType>,
    },
    /// List job categories
    Categories,
    /// Show one job
    Show {
        /// Job id
        id: u64,
    },
    /// Toggle a job as favorite
    Fav {
        /// Job id
        id: u64,
    },
    /// List favorite jobs
    Favs,
}

/// Only the types the listing endpoint filters on; `other` is not one of them
fn parse_filter_type(value: &str) -> Result<JobType, String> {
    let job_type: JobType = value.parse()?;
    if JobType::FILTERABLE.contains(&job_type) {
        Ok(job_type)
    } else {
        Err(format!(
            "'{}' is not a filterable job type (expected one of: {})",
            value,
            JobType::FILTERABLE
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

// The TUI blocks one worker polling for keys; fetches need the others
#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    let log_notice = init_logging(interactive);

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(path) = cli.storage {
        config.storage.path = Some(path);
    }

    let client = config.build_client().context("Failed to build HTTP client")?;
    let catalog = JobCatalog::new(Arc::new(client), config.api.detail_lookup);

    match cli.command {
        None | Some(Commands::Tui) => {
            let favorites = open_favorites(&config)?;
            let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);
            let result =
                jobscout_tui::run_tui(App::new(favorites), Arc::new(catalog), tick_rate).await;
            if let Some(notice) = log_notice {
                eprintln!("{}", notice);
            }
            result?;
        }
        Some(Commands::Jobs {
            search,
            category,
            job_type,
        }) => {
            let favorites = open_favorites(&config)?;
            let filters = JobFilters {
                search,
                category,
                job_type,
            };
            tracing::info!("Listing jobs with {:?}", filters);

            let jobs = catalog.jobs(&filters).await.context("Failed to load jobs")?;
            if jobs.is_empty() {
                println!("No results");
            }
            for job in &jobs {
                print_row(job, favorites.is_favorite(job.id));
            }
        }
        Some(Commands::Categories) => {
            let categories = catalog
                .categories()
                .await
                .context("Failed to load categories")?;
            for category in categories {
                println!("{:>4}  {}", category.id, category.name);
            }
        }
        Some(Commands::Show { id }) => {
            let favorites = open_favorites(&config)?;
            let job = catalog
                .job(id)
                .await
                .with_context(|| format!("Failed to load job {}", id))?;
            print_detail(&job, favorites.is_favorite(id));
        }
        Some(Commands::Fav { id }) => {
            let mut favorites = open_favorites(&config)?;
            if favorites.toggle(id) {
                println!("★ Saved job #{}", id);
            } else {
                println!("☆ Removed job #{} from favorites", id);
            }
        }
        Some(Commands::Favs) => {
            let favorites = open_favorites(&config)?;
            if favorites.is_empty() {
                println!("You have no saved jobs");
                return Ok(());
            }

            let jobs = catalog
                .favorite_jobs(favorites.ids())
                .await
                .context("Failed to load favorites")?;
            for job in &jobs {
                print_row(job, true);
            }
            let missing = favorites.len().saturating_sub(jobs.len());
            if missing > 0 {
                println!("({} saved jobs are no longer listed)", missing);
            }
        }
    }

    Ok(())
}

/// Logs go to stderr for plain commands and to a file under the TUI, so they
/// never end up drawn over the interface.
///
/// Returns a notice when the TUI log file could not be opened; it can only be
/// shown once the terminal is restored.
fn init_logging(interactive: bool) -> Option<String> {
    let default_filter = if interactive { "jobscout=warn" } else { "jobscout=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if !interactive {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        return None;
    }

    let path = dirs::data_dir().map(|dir| dir.join("jobscout").join("jobscout.log"));
    let opened = match &path {
        Some(path) => open_log_file(path).map_err(|e| {
            format!("Logging disabled: could not open {}: {}", path.display(), e)
        }),
        None => Err("Logging disabled: could not find data directory".to_string()),
    };

    match opened {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .init();
            None
        }
        Err(notice) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
                .init();
            Some(notice)
        }
    }
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}

fn open_favorites(config: &Config) -> anyhow::Result<FavoritesStore> {
    let path = config.storage.resolved_path()?;
    let store = KvStore::open(&path)
        .with_context(|| format!("Failed to open storage at {}", path.display()))?;
    Ok(FavoritesStore::load(store))
}

fn print_row(job: &Job, favorite: bool) {
    let star = if favorite { "★" } else { " " };
    println!(
        "{} {:>8}  {} · {} · {} · {}",
        star,
        job.id,
        job.title,
        job.company_name,
        job.candidate_required_location,
        job.display_date()
    );
}

fn print_detail(job: &Job, favorite: bool) {
    println!("{}{}", job.title, if favorite { "  ★" } else { "" });
    println!("{}", job.company_name);
    println!();
    println!("Location   {}", job.candidate_required_location);
    println!("Type       {}", job.job_type.label());
    println!("Published  {}", job.display_date());
    if let Some(category) = &job.category {
        println!("Category   {}", category);
    }
    if let Some(salary) = job.salary_text() {
        println!("Salary     {}", salary);
    }
    if !job.tags.is_empty() {
        println!("Tags       {}", job.tags.join(", "));
    }
    println!("URL        {}", job.url);
    println!();
    println!("{}", html2md::parse_html(&job.description));
}
