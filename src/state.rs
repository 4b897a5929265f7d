use crate::clock::Clock;
use crate::ui::render_chart;
use crate::view::{HeatView, ViewState};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Last rendered chart markup, tagged with the view revision it was built from.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedChart {
    pub revision: u64,
    pub svg: String,
}

impl RenderedChart {
    pub fn from_state(state: &ViewState) -> Self {
        Self {
            revision: state.revision,
            svg: render_chart(state),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub view: Arc<HeatView>,
    pub clock: Clock,
    pub chart: Arc<RwLock<RenderedChart>>,
}

impl AppState {
    pub fn new(view: Arc<HeatView>, clock: Clock) -> Self {
        let chart = RenderedChart::from_state(&view.snapshot());
        Self {
            view,
            clock,
            chart: Arc::new(RwLock::new(chart)),
        }
    }
}
