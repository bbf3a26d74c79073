use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sx_http::HttpClientConfig;
use sx_http::SearchParams;
use sx_http::StackExchangeClient;
use sx_ratelimit::CancellationToken;
use sx_ratelimit::TokenBucket;
use sx_search::Orchestrator;
use sx_search::TopQuestions;
use tracing::info;

use crate::config_loader::AppConfig;

/// Build the rate limiter, client and orchestrator from config and run one search
pub async fn top_questions(config: &AppConfig, cancel: &CancellationToken) -> anyhow::Result<TopQuestions> {
    let limiter = TokenBucket::builder()
        .capacity(config.rate_limit.capacity)
        .rate_per_second(config.rate_limit.refill_per_second)
        .build()
        .context("Invalid rate limit configuration")?;

    let http_config = HttpClientConfig::with_timeouts(
        Duration::from_secs(config.http.connect_timeout_secs),
        Duration::from_secs(config.http.request_timeout_secs),
    );
    let client = StackExchangeClient::builder()
        .base_url(config.api.base_url.as_str())
        .site(config.api.site.as_str())
        .http_config(http_config)
        .build()
        .context("Failed to build Stack Exchange client")?;

    let params = SearchParams::trailing_year(config.search.intitle.as_str(), config.search.tagged.clone());
    info!(
        intitle = params.intitle(),
        tagged = params.tagged().unwrap_or("-"),
        site = client.site(),
        fromdate = params.from_date(),
        todate = params.to_date(),
        "Starting search"
    );

    let orchestrator = Orchestrator::new(Arc::new(limiter), client);
    let top = orchestrator.run(&params, cancel).await?;

    Ok(top)
}

/// Render the ranking as the JSON array printed on stdout
pub fn render_json(top: &TopQuestions) -> serde_json::Result<String> {
    serde_json::to_string(top)
}
