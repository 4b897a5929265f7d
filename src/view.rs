use crate::errors::FetchError;
use crate::fetch::HeatSource;
use crate::models::HeatSample;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub samples: Option<Arc<Vec<HeatSample>>>,
    pub refreshed_at: Option<DateTime<Local>>,
    pub revision: u64,
}

/// Holds the current sample set and notifies subscribers whenever a fetch
/// replaces it.
pub struct HeatView {
    started_at: DateTime<Local>,
    state: watch::Sender<ViewState>,
}

impl HeatView {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            started_at: Local::now(),
            state,
        }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn apply(&self, result: Result<Vec<HeatSample>, FetchError>) -> bool {
        match result {
            Ok(samples) => {
                let count = samples.len();
                self.state.send_modify(|state| {
                    state.samples = Some(Arc::new(samples));
                    state.refreshed_at = Some(Local::now());
                    state.revision += 1;
                });
                info!(samples = count, "heat data replaced");
                true
            }
            Err(err) => {
                debug!("keeping previous heat data: {err}");
                false
            }
        }
    }

    pub async fn refresh_from<S: HeatSource>(&self, source: &S) -> bool {
        self.apply(source.fetch().await)
    }
}

impl Default for HeatView {
    fn default() -> Self {
        Self::new()
    }
}
