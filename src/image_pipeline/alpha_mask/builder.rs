use tracing::{debug, info_span};

use crate::image_pipeline::alpha_mask::cutout::{circle_alpha_cut, cut_pole_mask};
use crate::image_pipeline::alpha_mask::feather::feather_alpha;
use crate::image_pipeline::alpha_mask::pole_mask::PoleMask;
use crate::image_pipeline::camera::CameraModel;
use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::raster::{RgbImageData, RgbaImageData};

/// Converts a raw camera image into a validity-tagged working image.
///
/// The pole mask is checked before any pixel is touched, so a bad mask
/// always surfaces as [`FusionError::MissingResource`].
pub fn build_masked(
    image: &RgbImageData,
    usable_radius: f32,
    pole_mask: &PoleMask,
    feather_width: u32,
) -> Result<RgbaImageData> {
    if pole_mask.width() != image.width || pole_mask.height() != image.height {
        return Err(FusionError::MissingResource(format!(
            "pole mask is {}x{} but image is {}x{}",
            pole_mask.width(),
            pole_mask.height(),
            image.width,
            image.height
        )));
    }

    let mut masked = RgbaImageData::from_rgb_opaque(image);
    circle_alpha_cut(&mut masked, usable_radius);
    cut_pole_mask(&mut masked, pole_mask)?;
    feather_alpha(&mut masked, feather_width);
    Ok(masked)
}

/// Builds the working image for one camera, applying its calibration.
///
/// Cameras mounted upside down are rotated 180° after masking, since their
/// pole mask is drawn in raw sensor orientation.
pub fn build_camera_image(
    model: &CameraModel,
    image: &RgbImageData,
    pole_mask: &PoleMask,
    feather_width: u32,
) -> Result<RgbaImageData> {
    let _span = info_span!("build_masked", camera_id = %model.camera_id).entered();

    let mut masked = build_masked(image, model.usable_pixels_radius, pole_mask, feather_width)?;
    if model.flip180 {
        debug!(camera_id = %model.camera_id, "Rotating working image 180 degrees");
        masked.rotate_180();
    }
    Ok(masked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::camera::CameraRole;

    fn gradient(width: usize, height: usize) -> RgbImageData {
        let data = (0..width * height)
            .flat_map(|i| {
                let v = (i % 251) as u8;
                [v, v / 2, 255 - v]
            })
            .collect();
        RgbImageData::new(width, height, data).unwrap()
    }

    fn clear_mask(width: usize, height: usize) -> PoleMask {
        PoleMask::from_rgb(&RgbImageData::filled(width, height, [0, 0, 0])).unwrap()
    }

    #[test]
    fn colors_survive_masking() {
        let raw = gradient(16, 16);
        let masked = build_masked(&raw, 6.0, &clear_mask(16, 16), 2).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(masked.pixel(x, y)[..3], raw.pixel(x, y));
            }
        }
        assert_eq!(masked.alpha(8, 8), 255);
        assert_eq!(masked.alpha(0, 0), 0);
    }

    #[test]
    fn pole_region_is_transparent() {
        let raw = gradient(16, 16);
        let mut mask_image = RgbImageData::filled(16, 16, [0, 0, 0]);
        for y in 0..16 {
            mask_image.set_pixel(8, y, [255, 0, 0]);
        }
        let mask = PoleMask::from_rgb(&mask_image).unwrap();
        let masked = build_masked(&raw, 100.0, &mask, 0).unwrap();
        assert_eq!(masked.alpha(8, 3), 0);
        assert_eq!(masked.alpha(7, 3), 255);
    }

    #[test]
    fn mask_size_mismatch_is_missing_resource() {
        let raw = gradient(16, 16);
        let err = build_masked(&raw, 6.0, &clear_mask(8, 8), 2).unwrap_err();
        assert!(matches!(err, FusionError::MissingResource(_)));
    }

    #[test]
    fn flipped_camera_is_rotated_after_masking() {
        let raw = gradient(9, 7);
        let mask = clear_mask(9, 7);
        let upright = CameraModel::new("b", CameraRole::BottomSecondary, 100.0);
        let flipped = upright.clone().with_flip180(true);

        let a = build_camera_image(&upright, &raw, &mask, 0).unwrap();
        let b = build_camera_image(&flipped, &raw, &mask, 0).unwrap();
        assert_eq!(b.pixel(0, 0), a.pixel(8, 6));
        assert_eq!(b.pixel(8, 6), a.pixel(0, 0));
        assert_eq!(b.pixel(2, 3), a.pixel(6, 3));
    }
}
