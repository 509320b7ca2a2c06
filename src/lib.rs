pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod locations;
pub mod models;
pub mod normalize;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::VizConfig;
pub use normalize::prepare_entries;
pub use state::AppState;
pub use storage::{load_entries, resolve_data_path};
