use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::raster::RgbImageData;

/// Pixels painted at or above this red level, with green and blue below it,
/// belong to the pole.
const RED_THRESHOLD: u8 = 128;

/// Read-only exclusion raster marking the pixels covered by the rig pole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoleMask {
    width: usize,
    height: usize,
    excluded: Vec<bool>,
}

impl PoleMask {
    /// Builds the mask from a red-painted mask image.
    pub fn from_rgb(image: &RgbImageData) -> Result<Self> {
        if image.is_empty() {
            return Err(FusionError::MissingResource(format!(
                "pole mask has zero extent ({}x{})",
                image.width, image.height
            )));
        }
        let excluded = image
            .data
            .chunks_exact(3)
            .map(|p| p[0] >= RED_THRESHOLD && p[1] < RED_THRESHOLD && p[2] < RED_THRESHOLD)
            .collect();
        Ok(Self {
            width: image.width,
            height: image.height,
            excluded,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_excluded(&self, x: usize, y: usize) -> bool {
        self.excluded[y * self.width + x]
    }

    pub(crate) fn excluded(&self) -> &[bool] {
        &self.excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_pixels_are_excluded() {
        let mut image = RgbImageData::filled(3, 1, [255, 255, 255]);
        image.set_pixel(0, 0, [255, 0, 0]);
        image.set_pixel(1, 0, [200, 40, 30]);
        let mask = PoleMask::from_rgb(&image).unwrap();
        assert!(mask.is_excluded(0, 0));
        assert!(mask.is_excluded(1, 0));
        assert!(!mask.is_excluded(2, 0));
    }

    #[test]
    fn zero_extent_mask_is_missing_resource() {
        let image = RgbImageData::new(0, 0, Vec::new()).unwrap();
        assert!(matches!(
            PoleMask::from_rgb(&image),
            Err(FusionError::MissingResource(_))
        ));
    }
}
