pub mod client;
pub mod errors;
pub mod fetcher;
pub mod params;
pub mod stack_exchange;

pub use client::HttpClient;
pub use client::HttpClientConfig;
pub use errors::HttpError;
pub use errors::Result;
pub use fetcher::PageFetcher;
pub use params::SearchParams;
pub use stack_exchange::StackExchangeClient;
