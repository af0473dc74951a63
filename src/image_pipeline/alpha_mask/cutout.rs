use crate::image_pipeline::alpha_mask::pole_mask::PoleMask;
use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::raster::RgbaImageData;

/// Zeroes alpha outside the circle of `radius` centered on the optical axis.
pub fn circle_alpha_cut(image: &mut RgbaImageData, radius: f32) {
    let cx = image.width as f32 / 2.0;
    let cy = image.height as f32 / 2.0;
    let r2 = radius * radius;
    let width = image.width;
    for (i, px) in image.data.chunks_exact_mut(4).enumerate() {
        let dx = (i % width) as f32 - cx;
        let dy = (i / width) as f32 - cy;
        if dx * dx + dy * dy > r2 {
            px[3] = 0;
        }
    }
}

/// Zeroes alpha wherever the pole mask marks exclusion.
pub fn cut_pole_mask(image: &mut RgbaImageData, mask: &PoleMask) -> Result<()> {
    if mask.width() != image.width || mask.height() != image.height {
        return Err(FusionError::MissingResource(format!(
            "pole mask is {}x{} but image is {}x{}",
            mask.width(),
            mask.height(),
            image.width,
            image.height
        )));
    }
    for (px, &excluded) in image.data.chunks_exact_mut(4).zip(mask.excluded()) {
        if excluded {
            px[3] = 0;
        }
    }
    Ok(())
}
