mod axis_renderer;
mod coordinate_space;
mod data_controller;
mod engine_config;
mod engine_init;
mod events;
mod hooks;
mod interaction_controller;
mod minimap;
mod render_engine;
mod scatterplot;
mod selection_controller;
mod selection_model;
mod series;

pub use coordinate_space::{
    CoordinateSpace, NORMALIZED_EXTENT, NormalizedScales, TransformedScales,
};
pub use engine_config::{AxisConfig, ScatterplotConfig, ZoomScaleExtent};
pub use events::{EventEmitter, ListenerId, ScatterplotEvent, ScatterplotEventKind};
pub use hooks::{
    AxisHooks, LayerPainter, PlotHooks, SelectPredicate, TickFormatter, TickProvider,
    TooltipHandler, TooltipRequest, default_select_predicate,
};
pub use minimap::MiniMap;
pub use render_engine::TraversalStats;
pub use scatterplot::{DualAxisScatterplot, Scatterplot};
pub use selection_model::SelectionModel;
pub use series::{Accessor, Accessors, Series, XyRecord};
