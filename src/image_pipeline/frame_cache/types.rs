use crate::image_pipeline::motion::MotionField;
use crate::image_pipeline::raster::RgbaImageData;

/// Field and masked working images of one frame, kept for the next
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCacheEntry {
    pub field: MotionField,
    pub primary: RgbaImageData,
    pub secondary: RgbaImageData,
}
