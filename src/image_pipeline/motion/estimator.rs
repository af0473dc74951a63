use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::motion::types::{DirectionHint, MotionField};
use crate::image_pipeline::raster::RgbaImageData;

/// Previous frame's field and working images.
///
/// An unseeded request carries zero-sized values here.
#[derive(Debug, Clone, Copy)]
pub struct TemporalSeed<'a> {
    pub field: &'a MotionField,
    pub primary: &'a RgbaImageData,
    pub secondary: &'a RgbaImageData,
}

impl TemporalSeed<'_> {
    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }
}

/// Inputs handed to a motion-estimation engine
#[derive(Debug, Clone, Copy)]
pub struct MotionRequest<'a> {
    pub primary: &'a RgbaImageData,
    pub secondary: &'a RgbaImageData,
    pub seed: TemporalSeed<'a>,
    pub hint: DirectionHint,
}

/// A dense motion-estimation engine.
///
/// Implementations must return a field with the same dimensions as the
/// request's images, mapping primary pixels to secondary locations.
pub trait MotionEstimator: Send + Sync {
    fn name(&self) -> &str;
    fn estimate(&self, request: &MotionRequest<'_>) -> Result<MotionField>;
}
