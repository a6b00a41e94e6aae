use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Datelike, Utc};
use catalog::{CatalogIndex, CatalogItem, HistoryAccessor, ItemId, MediaType, genre_label};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{AttributeKey, EngineConfig, PredictionResult, PreferencePredictor};
use service::PredictionService;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Affinity - personalized rating predictions
#[derive(Parser)]
#[command(name = "affinity")]
#[command(about = "Predict how much a user will enjoy catalog items", long_about = None)]
struct Cli {
    /// Path to a JSON catalog snapshot ({ items, ratings, signals })
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Optional JSON engine config (weights, cache size, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Year used for age buckets; defaults to the config file's, then the current year
    #[arg(long)]
    reference_year: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict one item for one user
    Predict {
        #[arg(long)]
        user: String,

        #[arg(long)]
        item: ItemId,

        /// Print the per-signal breakdown
        #[arg(long)]
        explain: bool,
    },

    /// Rank catalog items for a user
    Batch {
        #[arg(long)]
        user: String,

        /// Only items of this media type (movie, show, book, podcast)
        #[arg(long)]
        media: Option<MediaType>,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Compare a prediction for two users
    Compare {
        #[arg(long)]
        user: String,

        #[arg(long)]
        friend: String,

        #[arg(long)]
        item: ItemId,
    },

    /// Show what the engine knows about a user's taste
    Profile {
        #[arg(long)]
        user: String,
    },

    /// Time single-item predictions against one batch call
    Benchmark {
        #[arg(long)]
        user: String,

        /// Number of timed rounds
        #[arg(long, default_value = "5")]
        repeat: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref(), cli.reference_year)?;
    info!("Reference year {}", config.reference_year);

    println!("Loading catalog snapshot from {}...", cli.snapshot.display());
    let start = Instant::now();
    let index = Arc::new(
        CatalogIndex::load_from_file(&cli.snapshot).context("Failed to load catalog snapshot")?,
    );
    let (items, ratings, signals) = index.counts();
    println!(
        "{} Loaded {} items, {} ratings, {} watch signals in {:?}",
        "✓".green(),
        items,
        ratings,
        signals,
        start.elapsed()
    );

    match cli.command {
        Commands::Predict {
            user,
            item,
            explain,
        } => {
            config.trace |= explain;
            handle_predict(index, config, &user, item, explain).await?
        }
        Commands::Batch { user, media, limit } => {
            handle_batch(index, config, &user, media, limit).await?
        }
        Commands::Compare { user, friend, item } => {
            handle_compare(index, config, &user, &friend, item).await?
        }
        Commands::Profile { user } => handle_profile(index, config, &user)?,
        Commands::Benchmark { user, repeat } => handle_benchmark(index, config, &user, repeat)?,
    }

    Ok(())
}

/// Engine config from an optional JSON file, with the reference year resolved
fn load_config(path: Option<&Path>, reference_year: Option<u16>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid engine config {}", path.display()))?
        }
        None => EngineConfig::new(current_year()?),
    };
    Ok(match reference_year {
        Some(year) => config.with_reference_year(year),
        None => config,
    })
}

fn current_year() -> Result<u16> {
    calendar_year(Utc::now())
}

/// UTC calendar year of `now`
fn calendar_year(now: DateTime<Utc>) -> Result<u16> {
    u16::try_from(now.year()).with_context(|| format!("Year {} is out of range", now.year()))
}

fn build_service(index: Arc<CatalogIndex>, config: EngineConfig) -> PredictionService {
    let predictor = PreferencePredictor::new(index.clone(), index, config);
    PredictionService::new(Arc::new(predictor))
}

fn find_item(index: &CatalogIndex, item_id: ItemId) -> Result<CatalogItem> {
    index
        .get_item(item_id)
        .cloned()
        .ok_or_else(|| anyhow!("Item {} not found", item_id))
}

/// Handle the 'predict' command
async fn handle_predict(
    index: Arc<CatalogIndex>,
    config: EngineConfig,
    user: &str,
    item_id: ItemId,
    explain: bool,
) -> Result<()> {
    let item = find_item(&index, item_id)?;
    let service = build_service(index, config);

    let result = service.predict(item.clone(), user).await?;
    print_prediction(&item, &result);

    if explain {
        if let Some(trace) = &result.trace {
            println!("{}", "Signal breakdown:".bold());
            for line in trace.lines() {
                println!("   {}", line);
            }
        }
    }
    Ok(())
}

/// Handle the 'batch' command
async fn handle_batch(
    index: Arc<CatalogIndex>,
    config: EngineConfig,
    user: &str,
    media: Option<MediaType>,
    limit: usize,
) -> Result<()> {
    let candidates: Vec<CatalogItem> = index
        .items()
        .into_iter()
        .filter(|item| media.is_none_or(|m| item.media_type == m))
        .cloned()
        .collect();
    if candidates.is_empty() {
        return Err(anyhow!("No items to rank"));
    }

    let service = build_service(index.clone(), config);
    let start = Instant::now();
    let ranked = service.rank(candidates, user, limit).await?;

    println!(
        "{}",
        format!("Top {} predictions for {}:", ranked.len(), user).bold().blue()
    );
    for (rank, entry) in ranked.iter().enumerate() {
        let Some(item) = index.get_item(entry.item_id) else {
            continue;
        };
        println!(
            "{}. {} ({}) - {:.1} [confidence {:.2}]",
            (rank + 1).to_string().green(),
            item.title,
            item.media_type,
            entry.result.score,
            entry.result.confidence
        );
        if let Some(reason) = entry.result.reasons.first() {
            println!("   {}", reason.dimmed());
        }
    }
    println!("Ranked in {:.2?}", start.elapsed());
    Ok(())
}

/// Handle the 'compare' command
async fn handle_compare(
    index: Arc<CatalogIndex>,
    config: EngineConfig,
    user: &str,
    friend: &str,
    item_id: ItemId,
) -> Result<()> {
    let item = find_item(&index, item_id)?;
    let service = build_service(index, config);

    let comparison = service.compare(item.clone(), user, friend).await?;

    println!("{}", format!("{} ({})", item.title, item.media_type).bold().blue());
    println!(
        "{}{}: {:.1} [confidence {:.2}]",
        "• ".green(),
        user,
        comparison.user.score,
        comparison.user.confidence
    );
    println!(
        "{}{}: {:.1} [confidence {:.2}]",
        "• ".green(),
        friend,
        comparison.friend.score,
        comparison.friend.confidence
    );
    let verdict = if comparison.agrees {
        "You two would likely agree".green()
    } else {
        "You two would likely disagree".yellow()
    };
    println!("{} (difference {:+.1})", verdict, comparison.difference);
    Ok(())
}

/// Handle the 'profile' command
fn handle_profile(index: Arc<CatalogIndex>, config: EngineConfig, user: &str) -> Result<()> {
    let history = index.history(user);
    let predictor = PreferencePredictor::new(index.clone(), index.clone(), config);
    let profile = predictor.profile(user);

    println!("{}", format!("Taste profile for {}", user).bold().blue());
    println!("{}Ratings in history: {}", "• ".cyan(), history.ratings.len());
    println!("{}Watch signals in history: {}", "• ".cyan(), history.signals.len());
    for media in MediaType::ALL {
        let count = profile.explicit_count_for(media);
        if count > 0 {
            let ratings = profile.ratings_for(media);
            let mean = ratings.iter().sum::<f32>() / count as f32;
            println!(
                "{}Rated {}: {} (average {:.1})",
                "• ".cyan(),
                media.plural(),
                count,
                mean
            );
        }
    }
    println!("{}Unrated watches used: {}", "• ".cyan(), profile.implicit_count);
    if profile.skipped_records > 0 {
        println!(
            "{}Records for unknown items: {}",
            "• ".yellow(),
            profile.skipped_records
        );
    }

    if !profile.has_history() {
        println!("No history yet: predictions fall back to critic consensus");
        return Ok(());
    }

    println!("Strongest attributes:");
    for (key, count, mean) in profile.strongest_attributes(10) {
        println!("  - {:<32} {:>3} samples, average {:.1}", describe(key), count, mean);
    }
    Ok(())
}

/// Handle the 'benchmark' command
fn handle_benchmark(
    index: Arc<CatalogIndex>,
    config: EngineConfig,
    user: &str,
    repeat: usize,
) -> Result<()> {
    if repeat == 0 {
        return Err(anyhow!("--repeat must be at least 1"));
    }
    // Cold profiles on every call, so the single-item loop pays full price
    let predictor = PreferencePredictor::new(
        index.clone(),
        index.clone(),
        config.with_cache_capacity(0).with_trace(false),
    );
    let items = index.items();

    let mut single = Vec::with_capacity(repeat);
    let mut batch = Vec::with_capacity(repeat);
    for _ in 0..repeat {
        let start = Instant::now();
        for item in &items {
            predictor.predict(item, user);
        }
        single.push(start.elapsed());

        let start = Instant::now();
        predictor.predict_batch(&items, user);
        batch.push(start.elapsed());
    }

    single.sort();
    batch.sort();
    let single_median = single[single.len() / 2];
    let batch_median = batch[batch.len() / 2];

    println!("Benchmark results ({} items, {} rounds):", items.len(), repeat);
    println!("Single-item loop median: {:?}", single_median);
    println!("Batch call median: {:?}", batch_median);
    if !batch_median.is_zero() {
        println!(
            "Speedup: {:.1}x",
            single_median.as_secs_f64() / batch_median.as_secs_f64()
        );
    }
    Ok(())
}

/// Readable form of an attribute key
fn describe(key: &AttributeKey) -> String {
    match key {
        AttributeKey::Genre(id) => format!("{} ({})", key, genre_label(*id)),
        AttributeKey::GenreCombo(a, b) => {
            format!("{} ({} + {})", key, genre_label(*a), genre_label(*b))
        }
        other => other.to_string(),
    }
}

fn print_prediction(item: &CatalogItem, result: &PredictionResult) {
    println!("{}", format!("{} ({})", item.title, item.media_type).bold().blue());
    let score = format!("{:.1}", result.score);
    let score = if result.score >= 7.0 {
        score.green()
    } else if result.score >= 5.0 {
        score.yellow()
    } else {
        score.red()
    };
    println!("Predicted rating: {} / 10 [confidence {:.2}]", score, result.confidence);
    if result.is_low_confidence() {
        println!("{}", "Not enough data yet for a personal prediction".yellow());
    }
    for reason in &result.reasons {
        println!("{}{}", "• ".green(), reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_year_at_year_boundaries() {
        // 2024-01-01 00:00 UTC
        let new_year = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        assert_eq!(calendar_year(new_year).unwrap(), 2024);

        // 2024-12-31 23:00 UTC
        let new_years_eve = DateTime::from_timestamp(1_735_686_000, 0).unwrap();
        assert_eq!(calendar_year(new_years_eve).unwrap(), 2024);
    }

    #[test]
    fn test_reference_year_override() {
        let config = load_config(None, Some(1999)).unwrap();
        assert_eq!(config.reference_year, 1999);

        let config = load_config(None, None).unwrap();
        assert!(config.reference_year >= 2024);
    }
}
