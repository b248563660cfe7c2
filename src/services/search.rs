// src/services/search.rs
use log::debug;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::models::FundIdentity;
use crate::services::client::{search_or_empty, AnalysisApi, SearchFilter};
use crate::services::coalescer::{Debouncer, RequestSequence};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub filter: Option<SearchFilter>,
    pub results: Vec<FundIdentity>,
    pub loading: bool,
}

#[derive(Default)]
struct SearchState {
    snapshot: SearchSnapshot,
    sequence: RequestSequence,
}

struct Inner {
    api: Arc<dyn AnalysisApi>,
    debouncer: Debouncer,
    state: Mutex<SearchState>,
}

/// Type-ahead fund lookup. Only the most recent query may publish results.
#[derive(Clone)]
pub struct FundSearch {
    inner: Arc<Inner>,
}

impl FundSearch {
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        Self::with_debounce(api, DEFAULT_SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(api: Arc<dyn AnalysisApi>, debounce: Duration) -> Self {
        FundSearch {
            inner: Arc::new(Inner {
                api,
                debouncer: Debouncer::new(debounce),
                state: Mutex::new(SearchState::default()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SearchState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state().snapshot.clone()
    }

    /// Records the query; short queries clear results at once, longer ones
    /// are looked up after the debounce window.
    pub fn set_query(&self, query: &str, filter: Option<SearchFilter>) {
        let query = query.trim().to_string();
        let too_short = query.chars().count() < MIN_QUERY_CHARS;
        {
            let mut state = self.state();
            // Whatever is still in flight answers an older query.
            state.sequence.invalidate();
            state.snapshot.query = query.clone();
            state.snapshot.filter = filter;
            if too_short {
                state.snapshot.results.clear();
                state.snapshot.loading = false;
            }
        }

        if too_short {
            self.inner.debouncer.cancel();
            return;
        }

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                FundSearch { inner }.issue(query, filter);
            }
        });
    }

    /// Clears the query, e.g. after the user picked a result.
    pub fn clear(&self) {
        self.set_query("", None);
    }

    fn issue(&self, query: String, filter: Option<SearchFilter>) {
        let ticket = {
            let mut state = self.state();
            state.snapshot.loading = true;
            state.sequence.next()
        };

        let api = self.inner.api.clone();
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let results = search_or_empty(api.as_ref(), &query, filter).await;
            if let Some(inner) = weak.upgrade() {
                let search = FundSearch { inner };
                let mut state = search.state();
                if !state.sequence.is_current(ticket) {
                    debug!("Discarding stale search results for {:?}", query);
                    return;
                }
                debug!("Search {:?} matched {} fund(s)", query, results.len());
                state.snapshot.results = results;
                state.snapshot.loading = false;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComparisonResult;
    use crate::services::client::FetchError;
    use crate::services::parameters::ComparisonRequest;
    use async_trait::async_trait;
    use tokio::time::sleep;

    /// Echoes the query back as a single fund after a latency that shrinks
    /// with query length, so longer queries resolve first.
    #[derive(Default)]
    struct EchoApi {
        queries: Mutex<Vec<(String, Option<SearchFilter>)>>,
    }

    #[async_trait]
    impl AnalysisApi for EchoApi {
        async fn search_funds(
            &self,
            query: &str,
            filter: Option<SearchFilter>,
        ) -> Result<Vec<FundIdentity>, FetchError> {
            self.queries.lock().unwrap().push((query.to_string(), filter));
            let latency = 1000u64.saturating_sub(query.len() as u64 * 100);
            sleep(Duration::from_millis(latency)).await;
            if query == "fail" {
                return Err(FetchError::Status(500));
            }
            Ok(vec![FundIdentity::new(query.len().to_string(), query)])
        }

        async fn compare_funds(
            &self,
            _request: &ComparisonRequest,
        ) -> Result<ComparisonResult, FetchError> {
            Err(FetchError::Status(404))
        }
    }

    fn search(api: &Arc<EchoApi>) -> FundSearch {
        FundSearch::with_debounce(api.clone(), Duration::from_millis(300))
    }

    #[tokio::test(start_paused = true)]
    async fn short_queries_never_hit_the_backend() {
        let api = Arc::new(EchoApi::default());
        let search = search(&api);

        search.set_query("qu", Some(SearchFilter::DirectGrowth));
        sleep(Duration::from_secs(2)).await;
        assert!(api.queries.lock().unwrap().is_empty());
        assert!(search.snapshot().results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_is_debounced() {
        let api = Arc::new(EchoApi::default());
        let search = search(&api);

        for q in ["qua", "quan", "quant"] {
            search.set_query(q, Some(SearchFilter::DirectGrowth));
            sleep(Duration::from_millis(100)).await;
        }
        sleep(Duration::from_secs(2)).await;

        let queries = api.queries.lock().unwrap().clone();
        assert_eq!(queries, vec![("quant".to_string(), Some(SearchFilter::DirectGrowth))]);
        let snapshot = search.snapshot();
        assert_eq!(snapshot.results[0].name, "quant");
        assert!(!snapshot.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn slower_older_query_does_not_overwrite_newer() {
        let api = Arc::new(EchoApi::default());
        let search = search(&api);

        search.set_query("abc", None);
        sleep(Duration::from_millis(350)).await;
        search.set_query("abcdefg", None);
        sleep(Duration::from_secs(2)).await;

        assert_eq!(api.queries.lock().unwrap().len(), 2);
        assert_eq!(search.snapshot().results[0].name, "abcdefg");
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_results_are_dropped_once_query_changes() {
        let api = Arc::new(EchoApi::default());
        let search = search(&api);

        // Issued at 300ms, answers at 500ms.
        search.set_query("abcdefgh", None);
        sleep(Duration::from_millis(400)).await;
        search.set_query("abcdefghi", None);

        sleep(Duration::from_millis(200)).await;
        assert!(search.snapshot().results.is_empty());

        sleep(Duration::from_secs(1)).await;
        let snapshot = search.snapshot();
        assert_eq!(snapshot.results[0].name, "abcdefghi");
        assert!(!snapshot.loading);
        assert_eq!(api.queries.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shortening_query_clears_pending_results() {
        let api = Arc::new(EchoApi::default());
        let search = search(&api);

        search.set_query("abc", None);
        sleep(Duration::from_millis(350)).await;
        search.clear();
        sleep(Duration::from_secs(2)).await;

        let snapshot = search.snapshot();
        assert!(snapshot.results.is_empty());
        assert!(snapshot.query.is_empty());
        assert!(!snapshot.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_search_yields_no_results() {
        let api = Arc::new(EchoApi::default());
        let search = search(&api);

        search.set_query("fail", None);
        sleep(Duration::from_secs(2)).await;
        assert!(search.snapshot().results.is_empty());
    }
}
