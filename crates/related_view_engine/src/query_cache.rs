use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use related_view_core::{ParentKey, QueryResult, RawRecord};
use view_logging::view_debug;

use crate::{FetchError, RelatedFetcher};

type SharedFetch = Shared<BoxFuture<'static, Result<Vec<RawRecord>, FetchError>>>;

/// Result of one `fetch`/`refresh` call.
///
/// Callers that joined the same in-flight request receive the same `request`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub parent_key: ParentKey,
    pub request: u64,
    pub result: Result<Vec<RawRecord>, FetchError>,
}

impl Settlement {
    pub fn query_result(&self) -> QueryResult {
        match &self.result {
            Ok(records) => QueryResult::Success(records.clone()),
            Err(err) => QueryResult::Failure(err.detail()),
        }
    }
}

/// A request registered with the cache but not yet awaited.
///
/// Created synchronously by [`QueryCache::begin`], so the order in which
/// callers begin requests is the order the cache sees parent keys in.
#[must_use = "a pending fetch does nothing until completed"]
pub struct PendingFetch {
    parent_key: ParentKey,
    request: u64,
    future: SharedFetch,
}

impl PendingFetch {
    pub fn request(&self) -> u64 {
        self.request
    }

    pub fn parent_key(&self) -> &ParentKey {
        &self.parent_key
    }
}

struct InFlight {
    request: u64,
    future: SharedFetch,
}

struct CacheInner {
    parent_key: Option<ParentKey>,
    result: QueryResult,
    in_flight: Option<InFlight>,
    next_request: u64,
}

/// Holds the latest related-records result for the current parent key.
///
/// At most one backend call is outstanding per key; `refresh` while a call is
/// pending awaits that call instead of issuing another.
pub struct QueryCache {
    fetcher: Arc<dyn RelatedFetcher>,
    inner: Mutex<CacheInner>,
}

impl QueryCache {
    pub fn new(fetcher: Arc<dyn RelatedFetcher>) -> Self {
        Self {
            fetcher,
            inner: Mutex::new(CacheInner {
                parent_key: None,
                result: QueryResult::Loading,
                in_flight: None,
                next_request: 0,
            }),
        }
    }

    pub async fn fetch(&self, parent_key: ParentKey) -> Settlement {
        let pending = self.begin(parent_key);
        self.complete(pending).await
    }

    /// Re-issues the fetch for the current parent key; `None` before the first fetch.
    pub async fn refresh(&self) -> Option<Settlement> {
        let parent_key = self.lock().parent_key.clone()?;
        Some(self.fetch(parent_key).await)
    }

    pub fn current(&self) -> QueryResult {
        self.lock().result.clone()
    }

    pub fn parent_key(&self) -> Option<ParentKey> {
        self.lock().parent_key.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    /// Registers a request for `parent_key`, joining the in-flight one if it is
    /// for the same key. Switching keys supersedes whatever is in flight.
    pub fn begin(&self, parent_key: ParentKey) -> PendingFetch {
        let mut inner = self.lock();
        if inner.parent_key.as_ref() == Some(&parent_key) {
            if let Some(in_flight) = &inner.in_flight {
                view_debug!(
                    "Joining in-flight request {} for parent={}",
                    in_flight.request,
                    parent_key
                );
                return PendingFetch {
                    request: in_flight.request,
                    future: in_flight.future.clone(),
                    parent_key,
                };
            }
        } else {
            // A result for the previous parent is dropped when it lands.
            inner.parent_key = Some(parent_key.clone());
        }

        inner.next_request += 1;
        let request = inner.next_request;
        let fetcher = Arc::clone(&self.fetcher);
        let key = parent_key.clone();
        let future = async move { fetcher.fetch_related(&key).await }
            .boxed()
            .shared();
        inner.in_flight = Some(InFlight {
            request,
            future: future.clone(),
        });
        inner.result = QueryResult::Loading;
        view_debug!("Issued request {} for parent={}", request, parent_key);
        PendingFetch {
            parent_key,
            request,
            future,
        }
    }

    /// Awaits a request from [`begin`](Self::begin) and records its outcome
    /// unless a later request has superseded it.
    pub async fn complete(&self, pending: PendingFetch) -> Settlement {
        let PendingFetch {
            parent_key,
            request,
            future,
        } = pending;
        let result = future.await;
        self.finish(request, &result);
        Settlement {
            parent_key,
            request,
            result,
        }
    }

    fn finish(&self, request: u64, result: &Result<Vec<RawRecord>, FetchError>) {
        let mut inner = self.lock();
        let is_current = inner
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.request == request);
        if !is_current {
            return;
        }
        inner.in_flight = None;
        inner.result = match result {
            Ok(records) => QueryResult::Success(records.clone()),
            Err(err) => QueryResult::Failure(err.detail()),
        };
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
