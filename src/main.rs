//! `tweet-sentiment` — classify short posts as positive or negative with a pre-fitted
//! bag-of-words linear model.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Load config ([`load_config`]).
//! 3. Load the stopword list, vocabulary and model once ([`ArtifactStore::preload`]).
//! 4. Collect posts from text arguments, stdin, a file, or Nitter ([`source`]).
//! 5. Classify them in input order ([`SentimentPipeline`]).
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0`, or `1` when `--fail-on-negative` is set and any post is negative.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use tweet_sentiment::artifacts::ArtifactStore;
use tweet_sentiment::config::{load_config, SourceConfig};
use tweet_sentiment::models::{Post, SentimentLabel};
use tweet_sentiment::pipeline::SentimentPipeline;
use tweet_sentiment::{report, source};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if let Some(dir) = &cli.artifacts {
        config.artifacts.dir = dir.clone();
    }
    if let Some(number) = cli.number {
        config.source.number = number;
    }

    // Artifacts are loaded eagerly so a missing or corrupt model fails before any work
    let store = ArtifactStore::new(config.artifacts.paths());
    store.preload().with_context(|| {
        format!(
            "loading model artifacts from {}",
            config.artifacts.dir.display()
        )
    })?;
    let pipeline = SentimentPipeline::new(Arc::new(store));

    // Collect posts in argument order: text, file, then users
    let mut posts = Vec::new();
    for text in &cli.text {
        if text == "-" {
            posts.extend(source::file::read_lines(std::io::stdin().lock())?);
        } else {
            posts.push(Post::from_text(text.as_str()));
        }
    }
    if let Some(path) = &cli.file {
        posts.extend(source::file::read_posts(path)?);
    }
    if !cli.user.is_empty() {
        posts.extend(fetch_users(&cli.user, &config.source, cli.quiet).await?);
    }

    let results = pipeline.classify_posts(posts)?;

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&results, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    let has_negative = results
        .iter()
        .any(|r| r.sentiment == SentimentLabel::Negative);

    if cli.fail_on_negative && has_negative {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tweet_sentiment=info"
    } else {
        "tweet_sentiment=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Fetch the latest posts of every user concurrently, keeping the users' order.
///
/// A user whose fetch fails or who has no posts is reported and skipped.
async fn fetch_users(users: &[String], settings: &SourceConfig, quiet: bool) -> Result<Vec<Post>> {
    use futures::future::join_all;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;

    let spinner = if !quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message(format!("Fetching posts for {} user(s)...", users.len()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let futures: Vec<_> = users
        .iter()
        .map(|user| {
            source::nitter::fetch_user(&client, &settings.instances, user, settings.number)
        })
        .collect();
    let results = join_all(futures).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let mut posts = Vec::new();
    for (user, result) in users.iter().zip(results) {
        let user = user.trim_start_matches('@');
        match result {
            Ok(fetched) if fetched.is_empty() => {
                eprintln!("  {} No posts found for @{}", "⚠".yellow(), user);
            }
            Ok(fetched) => {
                if !quiet {
                    eprintln!("  {} @{} {} posts", "→".cyan(), user, fetched.len());
                }
                posts.extend(fetched);
            }
            Err(e) => {
                eprintln!("  {} @{}: {:#}", "✗".red(), user, e);
            }
        }
    }

    Ok(posts)
}
