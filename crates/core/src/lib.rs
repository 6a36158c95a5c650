pub mod color;
pub mod config;
pub mod export;
pub mod human;
pub mod label;
pub mod legend;
pub mod loader;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod scene;
pub mod tooltip;
pub mod treemap;
pub mod view;

pub use color::{Color, ColorMap};
pub use config::Config;
pub use loader::{DataSource, LoadError};
pub use model::*;
pub use pipeline::Visualization;
