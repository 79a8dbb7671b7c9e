use std::{num::NonZeroU32, sync::Arc, time::Duration};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use tracing::{debug, warn};

/// OMDb's marker for a field it has no value for.
const NOT_AVAILABLE: &str = "N/A";

/// Maps missing, blank and `"N/A"` service fields to `None`.
pub fn available(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

/// Fields as the service reported them. Read them through the accessors,
/// which strip the "not available" sentinel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupRecord {
    pub title: Option<String>,
    pub director: Option<String>,
    pub year: Option<String>,
    pub poster: Option<String>,
}

impl LookupRecord {
    pub fn title(&self) -> Option<&str> {
        available(self.title.as_deref())
    }

    pub fn director(&self) -> Option<&str> {
        available(self.director.as_deref())
    }

    pub fn year(&self) -> Option<&str> {
        available(self.year.as_deref())
    }

    pub fn poster(&self) -> Option<&str> {
        available(self.poster.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(LookupRecord),
    NotFound,
    /// Network failure, timeout or a body that could not be understood.
    Unavailable,
}

#[async_trait::async_trait]
pub trait MovieLookup: Send + Sync {
    async fn lookup(&self, title: &str) -> LookupOutcome;
}

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl OmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        timeout: Duration,
        rps: u32,
    ) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN));
        let limiter = Arc::new(RateLimiter::direct(quota));
        Self { client, api_key, base_url, timeout, limiter }
    }

    async fn fetch(&self, title: &str) -> reqwest::Result<OmdbResponse> {
        // The body carries the verdict even on error statuses, so the status is not checked.
        self.client
            .get(&self.base_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?
            .json()
            .await
    }
}

#[async_trait::async_trait]
impl MovieLookup for OmdbClient {
    async fn lookup(&self, title: &str) -> LookupOutcome {
        // Waiting for a rate-limit slot counts against the same budget as the request.
        let attempt = async {
            self.limiter.until_ready().await;
            self.fetch(title).await
        };

        let resp = match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(err)) => {
                warn!(title = %title, error = %err, "OMDb lookup failed");
                return LookupOutcome::Unavailable;
            },
            Err(_) => {
                warn!(title = %title, timeout = ?self.timeout, "OMDb lookup timed out");
                return LookupOutcome::Unavailable;
            },
        };

        if resp.response.eq_ignore_ascii_case("false") {
            debug!(title = %title, error = ?resp.error, "OMDb has no match");
            return LookupOutcome::NotFound;
        }

        debug!(title = %title, canonical = ?resp.title, "OMDb match");
        LookupOutcome::Found(LookupRecord {
            title: resp.title,
            director: resp.director,
            year: resp.year,
            poster: resp.poster,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    response: String,
    title: Option<String>,
    director: Option<String>,
    year: Option<String>,
    poster: Option<String>,
    error: Option<String>,
}
