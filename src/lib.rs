pub mod app;
pub mod calendar;
pub mod config;
pub mod fallback;
pub mod fetch;
pub mod handlers;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use config::load_config;
pub use state::AppState;
