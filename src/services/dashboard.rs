// src/services/dashboard.rs
//! The selection and comparison state engine.
//!
//! User events mutate the selection or the parameters; every effective change
//! restarts a debounce window, and when the window closes the current request
//! is sent to the analysis service. Each issued request takes a ticket from a
//! [`RequestSequence`]; only the holder of the latest ticket may publish its
//! result, so a slow response can never overwrite a newer one.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::models::{ComparisonResult, FundIdentity};
use crate::services::client::{fetch_comparison, AnalysisApi};
use crate::services::coalescer::{Debouncer, RequestSequence};
use crate::services::parameters::{ComparisonParameters, ComparisonRequest};
use crate::services::presentation::{build_view, DashboardView};
use crate::services::selection::SelectionSet;

pub const DEFAULT_COMPARE_DEBOUNCE: Duration = Duration::from_millis(400);

#[derive(Debug, Default)]
struct DashboardState {
    selection: SelectionSet,
    parameters: ComparisonParameters,
    sequence: RequestSequence,
    /// Last request whose outcome is in flight or on display.
    last_issued: Option<ComparisonRequest>,
    result: Option<ComparisonResult>,
    updated_at: Option<DateTime<Utc>>,
    loading: bool,
}

impl DashboardState {
    fn current_request(&self) -> ComparisonRequest {
        ComparisonRequest::new(self.selection.codes(), self.parameters)
    }
}

struct Inner {
    api: Arc<dyn AnalysisApi>,
    debouncer: Debouncer,
    state: Mutex<DashboardState>,
}

/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<Inner>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        Self::with_debounce(api, DEFAULT_COMPARE_DEBOUNCE)
    }

    pub fn with_debounce(api: Arc<dyn AnalysisApi>, debounce: Duration) -> Self {
        Dashboard {
            inner: Arc::new(Inner {
                api,
                debouncer: Debouncer::new(debounce),
                state: Mutex::new(DashboardState::default()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns false when a fund with the same code is already selected.
    pub fn add_fund(&self, fund: FundIdentity) -> bool {
        let code = fund.code.clone();
        let changed = self.state().selection.add(fund);
        if changed {
            info!("Added fund {} to selection", code);
            self.schedule();
        }
        changed
    }

    pub fn remove_fund(&self, code: &str) -> bool {
        let changed = self.state().selection.remove(code);
        if changed {
            info!("Removed fund {} from selection", code);
            self.schedule();
        }
        changed
    }

    pub fn set_years(&self, years: f64) -> bool {
        let changed = self.state().parameters.set_years(years);
        if changed {
            debug!("Comparison horizon set to {} years", years);
            self.schedule();
        }
        changed
    }

    pub fn set_benchmark_rate(&self, rate: f64) -> bool {
        let changed = self.state().parameters.set_benchmark_rate(rate);
        if changed {
            debug!("Benchmark rate set to {}", rate);
            self.schedule();
        }
        changed
    }

    /// Skips the debounce window and issues a request for the current state.
    pub fn run_now(&self) {
        self.inner.debouncer.cancel();
        self.issue(true);
    }

    pub fn selection(&self) -> SelectionSet {
        self.state().selection.clone()
    }

    pub fn parameters(&self) -> ComparisonParameters {
        self.state().parameters
    }

    pub fn result(&self) -> Option<ComparisonResult> {
        self.state().result.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Snapshot for renderers. The chart table is rebuilt from the stored
    /// result against the current benchmark rate on every call.
    pub fn view(&self) -> DashboardView {
        let state = self.state();
        build_view(
            state.selection.iter().cloned().collect(),
            state.parameters,
            state.loading,
            state.updated_at,
            state.result.as_ref(),
        )
    }

    fn schedule(&self) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                Dashboard { inner }.issue(false);
            }
        });
    }

    fn issue(&self, force: bool) {
        let (ticket, request) = {
            let mut state = self.state();

            if state.selection.is_empty() {
                state.sequence.invalidate();
                state.last_issued = None;
                state.result = None;
                state.updated_at = None;
                state.loading = false;
                info!("Selection is empty, clearing comparison");
                return;
            }

            let request = state.current_request();
            if !force
                && state
                    .last_issued
                    .as_ref()
                    .is_some_and(|last| last.is_equivalent(&request))
            {
                debug!("Request for {:?} unchanged, not reissuing", request.codes);
                return;
            }

            let ticket = state.sequence.next();
            state.last_issued = Some(request.clone());
            state.loading = true;
            (ticket, request)
        };

        debug!("Issuing comparison #{} for {:?}", ticket, request.codes);
        let api = self.inner.api.clone();
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let outcome = fetch_comparison(api.as_ref(), &request).await;
            if let Some(inner) = weak.upgrade() {
                Dashboard { inner }.complete(ticket, &request, outcome);
            }
        });
    }

    fn complete(
        &self,
        ticket: u64,
        request: &ComparisonRequest,
        outcome: Option<ComparisonResult>,
    ) {
        let mut state = self.state();
        if !state.sequence.is_current(ticket) {
            debug!("Discarding stale comparison #{}", ticket);
            return;
        }

        state.loading = false;
        match outcome {
            Some(result) => {
                let returned = result.len();
                let result = result.restricted_to(&request.codes);
                if result.len() != returned {
                    warn!(
                        "Dropped {} fund(s) the comparison was not asked for",
                        returned - result.len()
                    );
                }
                state.result = Some(result);
                state.updated_at = Some(Utc::now());
            }
            None => {
                // A later equivalent change should retry rather than be skipped.
                state.last_issued = None;
                state.result = None;
                state.updated_at = None;
            }
        }
    }
}
