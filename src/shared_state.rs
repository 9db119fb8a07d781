use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;

use crate::config::Config;

/// Shared across handlers. Runs never share engine state; only the
/// service counters live here.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub started_at: Instant,
    /// Simulations completed successfully since startup
    pub runs_completed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            runs_completed: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_run(&self) -> u64 {
        self.runs_completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn runs_completed(&self) -> u64 {
        self.runs_completed.load(Ordering::Relaxed)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
