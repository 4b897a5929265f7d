pub mod app;
pub mod clock;
pub mod config;
pub mod datagen;
pub mod errors;
pub mod fetch;
pub mod handlers;
pub mod layout;
pub mod models;
pub mod refresh;
pub mod state;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::Config;
pub use fetch::{HeatSource, HttpHeatSource};
pub use refresh::Scheduler;
pub use state::AppState;
