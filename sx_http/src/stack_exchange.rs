use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use sx_types::Page;
use tracing::debug;

use crate::client::HttpClient;
use crate::client::HttpClientConfig;
use crate::errors::HttpError;
use crate::errors::Result;
use crate::fetcher::PageFetcher;
use crate::params::SearchParams;

const STACK_EXCHANGE_BASE_URL: &str = "https://api.stackexchange.com";
const SEARCH_PATH: &str = "/2.3/search";
const DEFAULT_SITE: &str = "stackoverflow";

/// Stack Exchange search API client
///
/// Every request is ordered by activity, newest first, against a single site.
pub struct StackExchangeClient {
    client: HttpClient,
    search_url: String,
    site: String,
}

impl StackExchangeClient {
    /// Create a new client builder
    pub fn builder() -> StackExchangeClientBuilder {
        StackExchangeClientBuilder::default()
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    /// Fetch one page of search results
    pub async fn search(&self, params: &SearchParams, page: u32) -> Result<Page> {
        let mut query: Vec<(&str, String)> = vec![("order", "desc".to_string()), ("sort", "activity".to_string()), ("site", self.site.clone())];
        query.extend(params.query(page));

        let response = self.client.get(&self.search_url).query(&query).send().await?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        // reqwest decompresses while streaming the body, so codec failures show up here
        let bytes = response.bytes().await.map_err(|err| if err.is_decode() { HttpError::Decompress(err) } else { HttpError::BodyRead(err) })?;
        let page_data: Page = serde_json::from_slice(&bytes)?;

        debug!(page, items = page_data.items.len(), has_more = page_data.has_more, "Fetched search page");
        Ok(page_data)
    }

    /// Turn a non-success response into an error, keeping the API's error envelope when present
    async fn handle_error_response(response: reqwest::Response) -> HttpError {
        let status = response.status().as_u16();

        match response.json::<ApiErrorBody>().await {
            Ok(error) => HttpError::ApiError { status, id: error.error_id, name: error.error_name, message: error.error_message },
            Err(_) => HttpError::UnexpectedStatus(status),
        }
    }
}

impl PageFetcher for StackExchangeClient {
    fn fetch<'a>(&'a self, params: &'a SearchParams, page: u32) -> Pin<Box<dyn Future<Output = Result<Page>> + Send + 'a>> {
        Box::pin(self.search(params, page))
    }
}

/// Builder for configuring the Stack Exchange client
pub struct StackExchangeClientBuilder {
    http_config: HttpClientConfig,
    base_url: String,
    site: String,
}

impl Default for StackExchangeClientBuilder {
    fn default() -> Self {
        Self { http_config: HttpClientConfig::default(), base_url: STACK_EXCHANGE_BASE_URL.to_string(), site: DEFAULT_SITE.to_string() }
    }
}

impl StackExchangeClientBuilder {
    /// Set custom base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Search a different Stack Exchange site
    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }

    /// Configure HTTP client settings
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Build the Stack Exchange client
    pub fn build(self) -> Result<StackExchangeClient> {
        let base = self.base_url.trim_end_matches('/');
        let search_url = format!("{base}{SEARCH_PATH}");
        reqwest::Url::parse(&search_url).map_err(|err| HttpError::InvalidUrl(format!("{}: {err}", self.base_url)))?;

        let client = HttpClient::with_config(self.http_config)?;

        Ok(StackExchangeClient { client, search_url, site: self.site })
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_id: i64,
    error_name: String,
    error_message: String,
}
