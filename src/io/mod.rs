mod http;
mod local;

pub use http::HttpRangeFetcher;
pub use local::LocalRangeFetcher;

use anyhow::Result;
use async_trait::async_trait;

/// One answered range request.
#[derive(Debug)]
pub struct FetchedRange {
    /// The response body.
    pub body: Vec<u8>,
    /// Whether the server confirmed it returned exactly the requested range
    /// (partial content with a matching `Content-Range`). Callers must not
    /// interpret an unconfirmed body as the requested slice.
    pub confirmed: bool,
}

/// Trait for fetching byte ranges from an archive source
#[async_trait]
pub trait RangeFetch: Send + Sync {
    /// Fetch the inclusive byte range `[start, end]`.
    ///
    /// One best-effort request per call; transport failures are returned
    /// as-is, never retried.
    async fn fetch_range(&self, start: u64, end: u64) -> Result<FetchedRange>;

    /// Total size of the archive, determined when the fetcher was built
    fn size(&self) -> u64;
}
