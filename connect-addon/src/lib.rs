pub mod app;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod lifecycle;

pub use app::{build_router, AppState};
pub use config::AddonConfig;
pub use error::AddonError;
