//! Fluent builder for constructing a [`Pipeline`].

use tracing::debug;

use cam_core::PipelineConfig;
use cam_spatial::{GeometryStore, SpatialIndex};

use crate::{Pipeline, PipelineResult};

/// Fluent builder for [`Pipeline`].
///
/// # Optional inputs (have defaults)
///
/// | Method       | Default                    |
/// |--------------|----------------------------|
/// | `.roads(s)`  | `GeometryStore::empty()`   |
///
/// # Example
///
/// ```rust,ignore
/// let (store, _report) = cam_spatial::load_geojson_path(&roads_path)?;
/// let pipeline = PipelineBuilder::new(PipelineConfig::default())
///     .roads(store)
///     .build()?;
/// let output = pipeline.run(points, &mut NoopObserver)?;
/// ```
pub struct PipelineBuilder {
    config: PipelineConfig,
    roads:  Option<GeometryStore>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, roads: None }
    }

    /// Supply the road geometry to match against.
    ///
    /// If not called, an empty store is used and every point is unmatched.
    pub fn roads(mut self, roads: GeometryStore) -> Self {
        self.roads = Some(roads);
        self
    }

    /// Validate the configuration, build the spatial index, and return a
    /// ready-to-run [`Pipeline`].
    pub fn build(self) -> PipelineResult<Pipeline> {
        self.config.validate()?;

        let store = self.roads.unwrap_or_else(GeometryStore::empty);
        let index = SpatialIndex::build(store.segments());
        debug!(roads = index.len(), "spatial index built");

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| crate::PipelineError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        #[cfg(not(feature = "parallel"))]
        if let Some(n) = self.config.num_threads {
            debug!(num_threads = n, "built without `parallel`; matching on one thread");
        }

        Ok(Pipeline {
            config: self.config,
            store,
            index,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
