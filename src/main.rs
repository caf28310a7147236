mod collector;
mod fetcher;
mod index;
mod models;
mod parser;
mod report;
mod settings;
mod table;
mod transform;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use fetcher::HttpFetcher;
use report::{Loaded, WeightClass};
use settings::Settings;

#[derive(Parser)]
#[command(name = "ufc_stats", about = "UFC fighter stats scraper and cleaner (ufcstats.com)")]
struct Cli {
    /// Raw table path (overrides UFC_RAW_PATH)
    #[arg(long, global = true)]
    raw: Option<PathBuf>,
    /// Normalized table path (overrides UFC_CLEAN_PATH)
    #[arg(long, global = true)]
    clean: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the A-Z index and list unique fighter URLs
    Links,
    /// Crawl the index and every fighter page, write the raw table
    Collect {
        /// Max fighter pages to fetch (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Normalize the raw table into the clean table
    Transform,
    /// Collect + transform in one pipeline
    Run {
        /// Max fighter pages to fetch (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Compare two fighters side by side
    Compare {
        /// First fighter (exact name)
        a: String,
        /// Second fighter (exact name)
        b: String,
    },
    /// List fighters of one weight class, ranked by wins
    Division {
        #[arg(value_enum, default_value = "all")]
        class: WeightClass,
    },
    /// Show row count and missing values of the clean table
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(raw) = cli.raw {
        settings.raw_path = raw;
    }
    if let Some(clean) = cli.clean {
        settings.clean_path = clean;
    }

    let result = match cli.command {
        Commands::Links => {
            let fetcher = HttpFetcher::new(&settings)?;
            let links = collector::crawl_index(&fetcher, &settings).await;
            for link in links.iter() {
                println!("{}", link);
            }
            println!("\nTotal unique fighters: {}", links.len());
            Ok(())
        }
        Commands::Collect { limit } => run_collect(&settings, limit).await.map(|_| ()),
        Commands::Transform => run_transform(&settings),
        Commands::Run { limit } => {
            if run_collect(&settings, limit).await? {
                run_transform(&settings)
            } else {
                Ok(())
            }
        }
        Commands::Compare { a, b } => match report::load_clean(&settings.clean_path)? {
            Loaded::Missing(path) => {
                println!("{}", report::missing_file_message(&path));
                Ok(())
            }
            Loaded::Table(table) => {
                match report::render_comparison(&table, &a, &b) {
                    Ok(view) => print!("{}", view),
                    Err(msg) => println!("{}", msg),
                }
                Ok(())
            }
        },
        Commands::Division { class } => match report::load_clean(&settings.clean_path)? {
            Loaded::Missing(path) => {
                println!("{}", report::missing_file_message(&path));
                Ok(())
            }
            Loaded::Table(table) => {
                let fighters = report::filter_division(&table, class);
                print!("{}", report::render_division(class, &fighters));
                Ok(())
            }
        },
        Commands::Stats => match report::load_clean(&settings.clean_path)? {
            Loaded::Missing(path) => {
                println!("{}", report::missing_file_message(&path));
                Ok(())
            }
            Loaded::Table(table) if table.is_empty() => {
                println!("Clean table has no fighters.");
                Ok(())
            }
            Loaded::Table(table) => {
                print!("{}", report::render_coverage(&table));
                Ok(())
            }
        },
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Both crawl phases; returns whether a raw table was written.
async fn run_collect(settings: &Settings, limit: Option<usize>) -> anyhow::Result<bool> {
    let fetcher = HttpFetcher::new(settings)?;

    let t_links = Instant::now();
    let links = collector::crawl_index(&fetcher, settings).await;
    println!(
        "Found {} unique fighters in {:.1}s",
        links.len(),
        t_links.elapsed().as_secs_f64()
    );
    if links.is_empty() {
        println!("No fighter links found; nothing to collect.");
        return Ok(false);
    }

    println!("Collecting fighter details...");
    let collected = collector::collect_details(&fetcher, &links, settings, limit).await;
    let stats = collected.stats;
    println!(
        "Done: {} fetched ({} ok, {} errors).",
        stats.total, stats.ok, stats.errors
    );

    if collected.table.is_empty() {
        println!("No fighter data collected; raw table not written.");
        return Ok(false);
    }

    table::write_raw(&settings.raw_path, &collected.table)?;
    println!(
        "Saved {} fighters to {}",
        collected.table.len(),
        settings.raw_path.display()
    );
    Ok(true)
}

fn run_transform(settings: &Settings) -> anyhow::Result<()> {
    let raw = table::read_raw(&settings.raw_path)?;
    let clean = transform::transform(&raw);
    table::write_normalized(&settings.clean_path, &clean)?;
    println!(
        "Saved {} normalized fighters to {}",
        clean.len(),
        settings.clean_path.display()
    );
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
