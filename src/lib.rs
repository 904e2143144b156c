pub mod app;
pub mod chart;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod lenient;
pub mod models;
pub mod records;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod ui;
pub mod writers;

pub use app::router;
pub use chart::render;
pub use config::AppConfig;
pub use state::AppState;
pub use stats::{aggregate, LiveSnapshot};
pub use storage::{load_store, persist_store, spawn_reload_task};
pub use store::{MemoryStore, StateStore};
