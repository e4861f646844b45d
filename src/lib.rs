//! scatter-rs: interactive scatterplot engine.
//!
//! Records are indexed in a quadtree over a normalized coordinate space so
//! panning, zooming, lasso and click selection stay cheap for large data
//! sets. Rendering goes through the `Renderer` trait and retained layers;
//! the host forwards pointer input and elapsed time.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{DualAxisScatterplot, Scatterplot, ScatterplotConfig};
pub use error::{PlotError, PlotResult};
