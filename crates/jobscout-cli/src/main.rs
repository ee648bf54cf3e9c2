//! `jobscout` command-line entry point.

mod cli;
mod output;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, DescribeArgs, SearchArgs};
use jobscout_core::AppConfig;
use jobscout_scanner::{
    DetailError, DetailFetcher, PageFetcher, PageSource, PhraseClassifier, PostingClassifier,
    ScanOrchestrator, StopReason,
};
use output::Listing;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Initialize tracing; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jobscout=debug"));

    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => {
            let mut config = AppConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            config.apply_env_overrides();
            config.validate()?;
            config
        }
        None => AppConfig::load_with_env().context("failed to load config")?,
    };
    Ok(config)
}

async fn run_search(
    args: &SearchArgs,
    config: &AppConfig,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let filters = args.to_filters()?;

    let source: Arc<dyn PageSource> = Arc::new(PageFetcher::new(&config.source)?);
    let orchestrator = ScanOrchestrator::new(Arc::clone(&source), config)?;

    info!(location = %filters.location, keyword = %filters.keyword, "searching listings");
    let outcome = orchestrator.search_with_cancel(&filters, cancel).await;

    match outcome.stop_reason {
        StopReason::BudgetExhausted => warn!(
            error = ?outcome.last_error,
            failures = outcome.consecutive_failures,
            "source kept failing, results are partial"
        ),
        StopReason::Cancelled => warn!("search cancelled, results are partial"),
        StopReason::Exhausted | StopReason::LimitReached => {}
    }

    if outcome.records.is_empty() {
        if outcome.is_blocked() {
            println!("No jobs retrieved: the listing source refused every request.");
        } else {
            println!("No jobs found for the given criteria.");
        }
        return Ok(());
    }

    let listings = if args.need_sponsorship {
        let details = DetailFetcher::new(source, config)?;
        let classifier = PhraseClassifier::new();
        sponsored_only(outcome.into_records(), &details, &classifier, cancel).await
    } else {
        outcome.into_records().into_iter().map(Listing::plain).collect()
    };

    if listings.is_empty() {
        println!("No jobs found that offer visa sponsorship based on your criteria.");
        return Ok(());
    }

    if args.json {
        println!("{}", output::render_json(&listings)?);
    } else {
        print!("{}", output::render_text(&listings));
    }
    Ok(())
}

/// Classify every record and keep those that offer sponsorship.
async fn sponsored_only(
    records: Vec<jobscout_core::ListingRecord>,
    details: &DetailFetcher,
    classifier: &dyn PostingClassifier,
    cancel: &CancellationToken,
) -> Vec<Listing> {
    let total = records.len();
    let mut kept = Vec::new();

    for (i, record) in records.into_iter().enumerate() {
        if cancel.is_cancelled() {
            warn!("classification cancelled");
            break;
        }
        info!(listing = %record, "analyzing job {} of {}", i + 1, total);

        let description = match details
            .fetch_description_with_cancel(&record.job_url, cancel)
            .await
        {
            Ok(description) => description,
            Err(DetailError::Cancelled) => {
                warn!("classification cancelled");
                break;
            }
            Err(e) => {
                warn!(listing = %record, error = %e, "could not fetch description");
                None
            }
        };

        let classification = classifier.classify(&record, description.as_deref()).await;
        if classification.sponsorship == jobscout_scanner::Sponsorship::Yes {
            kept.push(Listing::classified(record, classification));
        }
    }
    kept
}

async fn run_describe(args: &DescribeArgs, config: &AppConfig) -> anyhow::Result<()> {
    let details = DetailFetcher::from_config(config)?;
    match details.fetch_description(&args.url).await? {
        Some(description) => println!("{description}"),
        None => println!("No description found for {}", args.url),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Ctrl+C received - stopping search...");
                cancel.cancel();
            }
        }
    });

    let result = match load_config(&cli) {
        Ok(config) => match &cli.command {
            Commands::Search(args) => run_search(args, &config, &cancel).await,
            Commands::Describe(args) => run_describe(args, &config).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscout_core::ListingRecord;

    #[tokio::test]
    async fn test_sponsored_only_stops_when_cancelled() {
        let config = AppConfig::default();
        let details = DetailFetcher::from_config(&config).expect("detail fetcher");
        let records = vec![ListingRecord {
            position: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            job_url: "https://www.linkedin.com/jobs/view/backend-engineer-42".to_string(),
            ..ListingRecord::default()
        }];

        let cancel = CancellationToken::new();
        cancel.cancel();
        let kept = sponsored_only(records, &details, &PhraseClassifier::new(), &cancel).await;

        assert!(kept.is_empty());
    }
}
