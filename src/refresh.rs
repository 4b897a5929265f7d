use crate::clock::{Clock, TICK};
use crate::fetch::HeatSource;
use crate::state::{AppState, RenderedChart};
use crate::view::{HeatView, ViewState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Owns the view's background tasks: the refresh loop, the clock ticker and
/// the chart re-renderer.
pub struct Scheduler {
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn start<S: HeatSource>(source: S, every: Duration) -> (Self, AppState) {
        let view = Arc::new(HeatView::new());
        let (clock, clock_task) = Clock::spawn(TICK);
        let state = AppState::new(Arc::clone(&view), clock);

        let renderer = spawn_renderer(view.subscribe(), Arc::clone(&state.chart));
        let refresher = spawn_refresh(view, source, every);
        info!(?every, "scheduler started");

        (
            Self {
                tasks: vec![clock_task, renderer, refresher],
            },
            state,
        )
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    pub fn stop(self) {
        for task in &self.tasks {
            task.abort();
        }
        info!("scheduler stopped");
    }
}

fn spawn_refresh<S: HeatSource>(view: Arc<HeatView>, source: S, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        // The first tick fires immediately: that is the initial load.
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let updated = view.refresh_from(&source).await;
            debug!(updated, "refresh tick");
        }
    })
}

fn spawn_renderer(
    mut updates: watch::Receiver<ViewState>,
    chart: Arc<RwLock<RenderedChart>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            let rendered = RenderedChart::from_state(&snapshot);
            *chart.write().await = rendered;
        }
    })
}
