pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::{ReconcileError, ReconcileResult};
pub use service::ReconcileService;
