//! Fixed-window budget for pipeline runs against the upstream API.
//!
//! One unit buys a full run: a token exchange plus one ranking request per
//! planned day. Handlers that answer from already-fetched rows do not spend
//! anything.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

#[derive(Debug)]
struct Window {
    started_at: Instant,
    spent: usize,
}

#[derive(Debug, Clone)]
pub struct UpstreamBudget {
    max_runs: usize,
    window: Duration,
    state: Arc<Mutex<Window>>,
}

impl UpstreamBudget {
    #[must_use]
    pub fn new(max_runs: usize, window: Duration) -> Self {
        Self {
            max_runs,
            window,
            state: Arc::new(Mutex::new(Window {
                started_at: Instant::now(),
                spent: 0,
            })),
        }
    }

    /// Spends one run if the current window has room.
    pub async fn try_acquire(&self) -> bool {
        let mut window = self.state.lock().await;

        if window.started_at.elapsed() >= self.window {
            window.started_at = Instant::now();
            window.spent = 0;
        }

        if window.spent >= self.max_runs {
            tracing::warn!(max_runs = self.max_runs, "upstream run budget exhausted");
            return false;
        }

        window.spent += 1;
        true
    }

    /// Runs left in the current window.
    pub async fn remaining(&self) -> usize {
        let window = self.state.lock().await;
        if window.started_at.elapsed() >= self.window {
            return self.max_runs;
        }
        self.max_runs.saturating_sub(window.spent)
    }
}

impl Default for UpstreamBudget {
    fn default() -> Self {
        Self::new(30, Duration::from_secs(60))
    }
}
