use tracing::{debug, warn};

use crate::error::{PlotError, PlotResult};
use crate::interaction::{GestureState, Lasso, TimerQueue};
use crate::render::{Renderer, Surface, SurfacePair, symbol_from_code};

use super::coordinate_space::resolve_scale;
use super::scatterplot::PendingTimers;
use super::series::finite_extent;
use super::{
    Accessors, CoordinateSpace, EventEmitter, PlotHooks, Scatterplot, ScatterplotConfig,
    SelectionModel, Series, TraversalStats,
};

const DEFAULT_DOMAIN: (f64, f64) = (0.0, 100.0);
const DEFAULT_Y2_DOMAIN: (f64, f64) = (0.0, 1000.0);

impl<T, R: Renderer> Scatterplot<T, R> {
    /// Creates a single-axis plot.
    ///
    /// Scale domains come from the axis config, then from the data extent.
    /// Nothing is painted until `render` is called.
    pub fn new(
        renderer: R,
        config: ScatterplotConfig,
        records: Vec<T>,
        accessors: Accessors<T>,
    ) -> PlotResult<Self> {
        Self::build(renderer, config, records, accessors, None)
    }
}

impl<T, R: Renderer, U> Scatterplot<T, R, U> {
    /// Creates a plot with a secondary series on a right-hand y axis that
    /// shares the x axis and zoom state of the primary one.
    pub fn new_dual_axis(
        renderer: R,
        config: ScatterplotConfig,
        records: Vec<T>,
        accessors: Accessors<T>,
        secondary_records: Vec<U>,
        secondary_accessors: Accessors<U>,
    ) -> PlotResult<Self> {
        Self::build(
            renderer,
            config,
            records,
            accessors,
            Some((secondary_records, secondary_accessors)),
        )
    }

    fn build(
        renderer: R,
        config: ScatterplotConfig,
        records: Vec<T>,
        accessors: Accessors<T>,
        secondary: Option<(Vec<U>, Accessors<U>)>,
    ) -> PlotResult<Self> {
        config.validate()?;

        let x = resolve_scale(
            &config.x_axis,
            finite_extent(records.iter().map(|record| accessors.x(record))),
            DEFAULT_DOMAIN,
        )?;
        let y = resolve_scale(
            &config.y_axis,
            finite_extent(records.iter().map(|record| accessors.y(record))),
            DEFAULT_DOMAIN,
        )?;
        let y2 = secondary
            .as_ref()
            .map(|(records, accessors)| {
                resolve_scale(
                    &config.y2_axis,
                    finite_extent(records.iter().map(|record| accessors.y(record))),
                    DEFAULT_Y2_DOMAIN,
                )
            })
            .transpose()?;

        let mut space = CoordinateSpace::new(
            x,
            y,
            y2,
            config.scale,
            config.aspect_ratio,
            config.margins,
            config.zoom_scale_extent.bounds(),
        )?;
        if config.surface_size.is_valid() {
            space.layout(config.surface_size);
        } else {
            warn!(
                width = config.surface_size.width,
                height = config.surface_size.height,
                "surface has no area yet, deferring layout"
            );
        }
        if config.scale.is_some() {
            match config.zoom_window {
                Some(window) => {
                    space.set_window(window)?;
                }
                None => {
                    space.set_initial_zoom(config.zoom_scale_to, config.zoom_translate_by);
                }
            }
        }

        let primary = Series::build(
            records,
            accessors,
            symbol_from_code(&config.symbol),
            space.domain_to_normalized(),
        );
        let secondary = match secondary {
            Some((records, accessors)) => {
                let to_normalized = space.domain_to_normalized_y2().ok_or_else(|| {
                    PlotError::InvalidConfig("secondary series needs a y2 scale".to_owned())
                })?;
                Some(Series::build(
                    records,
                    accessors,
                    symbol_from_code(&config.secondary_symbol),
                    to_normalized,
                ))
            }
            None => None,
        };
        let selection = SelectionModel::for_index(primary.index());

        debug!(
            records = primary.len(),
            secondary = secondary.as_ref().map_or(0, Series::len),
            axes = ?config.scale,
            "created scatterplot"
        );

        Ok(Self {
            renderer,
            size: config.surface_size,
            lasso: Lasso::new(config.lasso),
            config,
            space,
            primary,
            secondary,
            selection,
            hooks: PlotHooks::default(),
            layers: SurfacePair::default(),
            axes_layer: Surface::new(),
            timers: TimerQueue::new(),
            pending: PendingTimers::default(),
            gesture: GestureState::Idle,
            suppress_click: false,
            events: EventEmitter::new(),
            stats: TraversalStats::default(),
        })
    }
}
