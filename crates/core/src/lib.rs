pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod human;
pub mod legend;
pub mod loader;
pub mod model;
pub mod render;
pub mod scene;
pub mod search;
pub mod tile;
pub mod tooltip;
pub mod treemap;

pub use error::*;
pub use model::*;
pub use render::*;

/// Installs the fmt subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
