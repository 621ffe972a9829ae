use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use letterboxd_fetch::config::{DEFAULT_SITE, DEFAULT_USER_AGENT};
use letterboxd_fetch::{Config, Film, HttpTransport, Letterboxd};

const PREVIEW: usize = 10;

#[derive(Parser)]
#[command(name = "letterboxd_fetch", about = "Fetch a Letterboxd profile's films")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print JSON instead of a list
    #[arg(long, global = true)]
    json: bool,

    /// Site host
    #[arg(long, global = true, env = "LETTERBOXD_SITE", default_value = DEFAULT_SITE)]
    site: String,

    /// User agent sent with listing page requests
    #[arg(long, global = true, env = "LETTERBOXD_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "LETTERBOXD_TIMEOUT_SECS", default_value = "30")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Recent activity from the RSS feed (ratings, watch dates, rewatches)
    Recent(ListArgs),
    /// All watched films
    Films(ListArgs),
    /// Watchlist
    Watchlist(ListArgs),
    /// Recent activity, watched films and watchlist together
    Summary {
        username: String,
    },
}

#[derive(Args)]
struct ListArgs {
    username: String,
    /// Max films to print (default: all)
    #[arg(short = 'n', long)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct Summary<'a> {
    username: &'a str,
    recent: &'a [Film],
    films: &'a [Film],
    watchlist: &'a [Film],
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let config = Config {
        user_agent: cli.user_agent.clone(),
        timeout: Duration::from_secs(cli.timeout),
        ..Config::default()
    }
    .with_site(&cli.site);
    let client = Letterboxd::from_config(config)
        .context("Failed to create HTTP client")?
        .on_skipped_item(|idx| debug!("Skipped feed item {} without a title", idx));

    match &cli.command {
        Commands::Recent(args) => {
            let films = with_spinner(
                "Fetching RSS feed",
                client.fetch_recent_activity(&args.username),
            )
            .await?
            .with_context(|| format!("Failed to fetch RSS feed for {}", args.username))?;
            output(&films, args.limit, cli.json)?;
        }
        Commands::Films(args) => {
            let films = with_spinner(
                "Fetching watched films",
                client.fetch_watched_films(&args.username),
            )
            .await?;
            output(&films, args.limit, cli.json)?;
        }
        Commands::Watchlist(args) => {
            let films =
                with_spinner("Fetching watchlist", client.fetch_watchlist(&args.username)).await?;
            output(&films, args.limit, cli.json)?;
        }
        Commands::Summary { username } => {
            summary(&client, username, cli.json).await?;
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 && !cli.json {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

async fn summary(
    client: &Letterboxd<HttpTransport>,
    username: &str,
    json: bool,
) -> anyhow::Result<()> {
    let recent = with_spinner("Fetching RSS feed", client.fetch_recent_activity(username))
        .await?
        .with_context(|| format!("Failed to fetch RSS feed for {}", username))?;
    let films =
        with_spinner("Fetching watched films", client.fetch_watched_films(username)).await?;
    let watchlist = with_spinner("Fetching watchlist", client.fetch_watchlist(username)).await?;

    if json {
        let summary = Summary {
            username,
            recent: &recent,
            films: &films,
            watchlist: &watchlist,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Letterboxd data for: {}", username);
    println!("{}", "=".repeat(50));

    println!("\n--- Recent Activity (RSS) ---");
    print_films(&recent, Some(PREVIEW));

    println!("\n--- Watched Films ---");
    println!("  Total: {} films", films.len());
    print_films(&films, Some(PREVIEW));

    println!("\n--- Watchlist ---");
    println!("  Total: {} films", watchlist.len());
    print_films(&watchlist, Some(PREVIEW));

    let rated: Vec<f32> = recent.iter().filter_map(Film::rating_value).collect();
    if !rated.is_empty() {
        let mean = rated.iter().sum::<f32>() / rated.len() as f32;
        println!("\nAverage recent rating: {:.2} over {} films", mean, rated.len());
    }
    Ok(())
}

async fn with_spinner<F: Future>(message: &'static str, fut: F) -> anyhow::Result<F::Output> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    pb.finish_and_clear();
    Ok(out)
}

fn output(films: &[Film], limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    if json {
        let shown = &films[..limit.unwrap_or(films.len()).min(films.len())];
        println!("{}", serde_json::to_string_pretty(shown)?);
    } else if films.is_empty() {
        println!("No films found.");
    } else {
        print_films(films, limit);
    }
    Ok(())
}

fn print_films(films: &[Film], limit: Option<usize>) {
    let shown = limit.unwrap_or(films.len());
    for film in films.iter().take(shown) {
        println!("  • {}", format_film(film));
    }
    if films.len() > shown {
        println!("  ... and {} more", films.len() - shown);
    }
}

fn format_film(film: &Film) -> String {
    let mut line = film.display_title();
    if let Some(rating) = &film.rating {
        line.push(' ');
        line.push_str(rating);
    }
    if film.rewatch {
        line.push_str(" (rewatch)");
    }
    line
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
