use std::sync::Arc;

use tracing::{debug, info, info_span};

use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::frame_cache::FrameCacheEntry;
use crate::image_pipeline::motion::estimator::{MotionEstimator, MotionRequest, TemporalSeed};
use crate::image_pipeline::motion::registry::MotionEstimatorRegistry;
use crate::image_pipeline::motion::types::{DirectionHint, MotionField};
use crate::image_pipeline::motion::warp::warp_by_field;
use crate::image_pipeline::raster::RgbaImageData;

/// Aligns the secondary working image onto the primary one.
pub struct MotionAligner {
    engine: Arc<dyn MotionEstimator>,
}

impl MotionAligner {
    pub fn new(engine: Arc<dyn MotionEstimator>) -> Self {
        Self { engine }
    }

    pub fn from_registry(registry: &MotionEstimatorRegistry, name: &str) -> Result<Self> {
        Ok(Self::new(registry.get(name)?))
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Computes the primary-to-secondary field and the warped secondary.
    ///
    /// Without a previous frame the engine receives zero-sized seed values.
    pub fn align(
        &self,
        primary: &RgbaImageData,
        secondary: &RgbaImageData,
        prior: Option<&FrameCacheEntry>,
    ) -> Result<(MotionField, RgbaImageData)> {
        if !primary.same_size(secondary) {
            return Err(FusionError::Alignment(format!(
                "primary is {}x{} but secondary is {}x{}",
                primary.width, primary.height, secondary.width, secondary.height
            )));
        }

        let empty_field = MotionField::empty();
        let empty_image = RgbaImageData::empty();
        let seed = match prior {
            Some(entry) => {
                if entry.field.dimensions() != primary.dimensions() {
                    return Err(FusionError::Alignment(format!(
                        "previous frame field is {}x{} but images are {}x{}",
                        entry.field.width, entry.field.height, primary.width, primary.height
                    )));
                }
                if !entry.primary.same_size(primary) || !entry.secondary.same_size(primary) {
                    return Err(FusionError::Alignment(format!(
                        "previous frame images are {}x{} and {}x{} but images are {}x{}",
                        entry.primary.width,
                        entry.primary.height,
                        entry.secondary.width,
                        entry.secondary.height,
                        primary.width,
                        primary.height
                    )));
                }
                debug!("Seeding motion estimation with previous frame");
                TemporalSeed {
                    field: &entry.field,
                    primary: &entry.primary,
                    secondary: &entry.secondary,
                }
            }
            None => TemporalSeed {
                field: &empty_field,
                primary: &empty_image,
                secondary: &empty_image,
            },
        };

        let request = MotionRequest {
            primary,
            secondary,
            seed,
            hint: DirectionHint::Down,
        };

        let field = {
            let _span = info_span!("estimate_motion", engine = self.engine.name()).entered();
            self.engine.estimate(&request)?
        };
        if field.dimensions() != primary.dimensions() {
            return Err(FusionError::Alignment(format!(
                "engine {} returned a {}x{} field for {}x{} images",
                self.engine.name(),
                field.width,
                field.height,
                primary.width,
                primary.height
            )));
        }

        info!("Warping secondary bottom camera to align with primary bottom camera");
        let warped = {
            let _span = info_span!("warp_secondary").entered();
            warp_by_field(secondary, &field)?
        };
        Ok((field, warped))
    }
}
