use std::future::Future;
use std::pin::Pin;

use sx_types::Page;

use crate::errors::Result;
use crate::params::SearchParams;

/// One network round-trip per call: fetch and decode a single result page
pub trait PageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, params: &'a SearchParams, page: u32) -> Pin<Box<dyn Future<Output = Result<Page>> + Send + 'a>>;
}
