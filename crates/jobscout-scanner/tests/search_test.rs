use async_trait::async_trait;
use jobscout_core::{AppConfig, DatePosted, SearchFilters};
use jobscout_scanner::{
    CancellationToken, FetchError, PageSource, ScanOrchestrator, StopReason, BATCH_SIZE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

type Reply = Result<String, FetchError>;

/// Page source that plays back a fixed script of replies.
///
/// Once the script runs out it answers with an empty listing page.
struct ScriptedSource {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedSource {
    fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<Url> {
        self.requests.lock().expect("requests lock").clone()
    }

    fn offsets(&self) -> Vec<usize> {
        self.requests()
            .iter()
            .map(|url| {
                url.query_pairs()
                    .find(|(k, _)| k == "start")
                    .and_then(|(_, v)| v.parse().ok())
                    .expect("every request carries a start offset")
            })
            .collect()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(url.clone());
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Ok("<ul></ul>".to_string()))
    }
}

/// Source that fails every attempt.
struct AlwaysRateLimited;

#[async_trait]
impl PageSource for AlwaysRateLimited {
    async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
        Err(FetchError::RateLimited)
    }
}

fn batch(first: usize, count: usize) -> Reply {
    let cards: String = (first..first + count)
        .map(|n| {
            format!(
                r#"<li>
                  <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/role-{n}"></a>
                  <h3 class="base-search-card__title">Engineer {n}</h3>
                  <h4 class="base-search-card__subtitle">Company {n}</h4>
                  <span class="job-search-card__location">Remote</span>
                  <time class="job-search-card__listdate" datetime="2024-03-01">1 week ago</time>
                </li>"#
            )
        })
        .collect();
    Ok(format!("<ul>{cards}</ul>"))
}

fn orchestrator(source: Arc<dyn PageSource>) -> ScanOrchestrator {
    ScanOrchestrator::new(source, &AppConfig::default())
        .expect("default config is valid")
        .with_rng(StdRng::seed_from_u64(7))
}

fn filters() -> SearchFilters {
    SearchFilters::new("Remote")
        .expect("valid filters")
        .with_keyword("engineer")
}

#[tokio::test(start_paused = true)]
async fn test_limit_truncates_first_batch() {
    let source = ScriptedSource::new([batch(0, BATCH_SIZE), batch(25, BATCH_SIZE)]);
    let outcome = orchestrator(source.clone())
        .search(&filters().with_limit(10))
        .await;

    assert_eq!(outcome.records.len(), 10);
    assert_eq!(outcome.stop_reason, StopReason::LimitReached);
    assert_eq!(outcome.records[0].position, "Engineer 0");
    assert_eq!(outcome.records[9].position, "Engineer 9");
    assert!(source.offsets().iter().all(|&offset| offset <= 25));
    assert_eq!(source.offsets(), vec![0]);
}

#[tokio::test(start_paused = true)]
async fn test_request_shape() {
    let source = ScriptedSource::new([batch(0, 1)]);
    orchestrator(source.clone())
        .search(&filters().with_date_posted(DatePosted::Past24Hours))
        .await;

    let first = &source.requests()[0];
    assert_eq!(
        first.as_str(),
        "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search\
         ?keywords=engineer&location=Remote&f_TPR=r86400&start=0"
    );
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_three_times_returns_empty() {
    let source = ScriptedSource::new([
        Err(FetchError::RateLimited),
        Err(FetchError::RateLimited),
        Err(FetchError::RateLimited),
        batch(0, BATCH_SIZE),
    ]);

    let start = Instant::now();
    let outcome = orchestrator(source.clone()).search(&filters()).await;
    let elapsed = start.elapsed();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.stop_reason, StopReason::BudgetExhausted);
    assert!(outcome.is_blocked());
    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.consecutive_failures, 3);
    assert_eq!(outcome.last_error, Some(FetchError::RateLimited));
    assert_eq!(outcome.final_offset, 0);
    assert_eq!(source.offsets(), vec![0, 0, 0]);

    // Backoff of 2s then 4s; the third failure stops without waiting
    assert!(elapsed >= Duration::from_secs(6));
    assert!(elapsed < Duration::from_millis(6100));
}

#[tokio::test(start_paused = true)]
async fn test_empty_batch_stops() {
    let source = ScriptedSource::new([batch(0, BATCH_SIZE), Ok("<ul></ul>".to_string())]);

    let start = Instant::now();
    let outcome = orchestrator(source.clone()).search(&filters()).await;
    let elapsed = start.elapsed();

    assert_eq!(outcome.records.len(), BATCH_SIZE);
    assert_eq!(outcome.stop_reason, StopReason::Exhausted);
    assert_eq!(outcome.batches_fetched, 2);
    assert_eq!(source.offsets(), vec![0, 25]);

    // One politeness pause between the two successful batches
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed <= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_failure_then_success_keeps_offset() {
    let source = ScriptedSource::new([
        Err(FetchError::Http { status: 503 }),
        Err(FetchError::EmptyBody),
        batch(0, 3),
    ]);

    let outcome = orchestrator(source.clone()).search(&filters()).await;

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.stop_reason, StopReason::Exhausted);
    assert_eq!(outcome.consecutive_failures, 0);
    assert_eq!(outcome.attempts, 4);
    assert_eq!(source.offsets(), vec![0, 0, 0, 25]);
}

#[tokio::test(start_paused = true)]
async fn test_failure_budget_resets_after_success() {
    let source = ScriptedSource::new([
        Err(FetchError::RateLimited),
        Err(FetchError::RateLimited),
        batch(0, BATCH_SIZE),
        Err(FetchError::RateLimited),
        Err(FetchError::RateLimited),
        batch(25, 2),
    ]);

    let outcome = orchestrator(source.clone()).search(&filters()).await;

    assert_eq!(outcome.records.len(), 27);
    assert_eq!(outcome.stop_reason, StopReason::Exhausted);
    assert_eq!(source.offsets(), vec![0, 0, 0, 25, 25, 25, 50]);
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_limit_collects_everything() {
    let source = ScriptedSource::new([
        batch(0, BATCH_SIZE),
        batch(25, BATCH_SIZE),
        batch(50, 4),
    ]);

    let outcome = orchestrator(source.clone())
        .search(&filters().with_limit(0))
        .await;

    assert_eq!(outcome.records.len(), 54);
    assert_eq!(outcome.stop_reason, StopReason::Exhausted);
    assert_eq!(outcome.records[53].position, "Engineer 53");
    assert_eq!(source.offsets(), vec![0, 25, 50, 75]);
}

#[tokio::test(start_paused = true)]
async fn test_limit_reached_on_later_batch() {
    let source = ScriptedSource::new([batch(0, BATCH_SIZE), batch(25, BATCH_SIZE)]);

    let outcome = orchestrator(source.clone())
        .search(&filters().with_limit(30))
        .await;

    assert_eq!(outcome.records.len(), 30);
    assert_eq!(outcome.stop_reason, StopReason::LimitReached);
    assert_eq!(outcome.records[29].position, "Engineer 29");
    assert_eq!(source.offsets(), vec![0, 25]);
}

#[tokio::test(start_paused = true)]
async fn test_starting_page_sets_offset() {
    let source = ScriptedSource::new([batch(50, 2)]);

    let outcome = orchestrator(source.clone())
        .search(&filters().with_page(2))
        .await;

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(source.offsets(), vec![50, 75]);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_fragment_does_not_fail_batch() {
    let html = r#"<ul>
        <li>
          <h3 class="base-search-card__title">Broken</h3>
          <h4 class="base-search-card__subtitle">Nowhere Inc</h4>
          <a class="base-card__full-link">no href</a>
        </li>
        <li>
          <h3 class="base-search-card__title">No company</h3>
        </li>
        <li>
          <h3 class="base-search-card__title">Fine</h3>
          <h4 class="base-search-card__subtitle">Good Co</h4>
        </li>
    </ul>"#;
    let source = ScriptedSource::new([Ok(html.to_string())]);

    let outcome = orchestrator(source).search(&filters()).await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].position, "Fine");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_start() {
    let source = ScriptedSource::new([batch(0, BATCH_SIZE)]);
    let token = CancellationToken::new();
    token.cancel();

    let outcome = orchestrator(source.clone())
        .search_with_cancel(&filters(), &token)
        .await;

    assert_eq!(outcome.stop_reason, StopReason::Cancelled);
    assert_eq!(outcome.attempts, 0);
    assert!(source.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_interrupts_backoff() {
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let outcome = orchestrator(Arc::new(AlwaysRateLimited))
        .search_with_cancel(&filters(), &token)
        .await;

    assert_eq!(outcome.stop_reason, StopReason::Cancelled);
    assert_eq!(outcome.attempts, 1);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_keeps_accumulated_records() {
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        // Lands inside the first politeness pause
        tokio::time::sleep(Duration::from_millis(500)).await;
        canceller.cancel();
    });

    let source = ScriptedSource::new([batch(0, BATCH_SIZE), batch(25, BATCH_SIZE)]);
    let outcome = orchestrator(source.clone())
        .search_with_cancel(&filters(), &token)
        .await;

    assert_eq!(outcome.stop_reason, StopReason::Cancelled);
    assert_eq!(outcome.records.len(), BATCH_SIZE);
    assert_eq!(source.offsets(), vec![0]);
}

#[tokio::test]
#[ignore = "Requires network access to the live listing source"]
async fn test_live_search() {
    let config = AppConfig::default();
    let orchestrator = ScanOrchestrator::from_config(&config).expect("build orchestrator");

    let outcome = orchestrator
        .search(&filters().with_limit(5))
        .await;

    println!(
        "live search: {} records, stopped because {}",
        outcome.records.len(),
        outcome.stop_reason
    );
    assert!(outcome.records.len() <= 5);
}
