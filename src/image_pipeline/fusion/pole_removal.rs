use tracing::{info, info_span};

use crate::image_pipeline::alpha_mask::{PoleMask, build_camera_image};
use crate::image_pipeline::camera::CameraModel;
use crate::image_pipeline::color::ColorAdjustmentModel;
use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::compositor::Compositor;
use crate::image_pipeline::frame_cache::FrameCacheEntry;
use crate::image_pipeline::motion::MotionAligner;
use crate::image_pipeline::raster::{RgbImageData, RgbaImageData};

/// Raw inputs for one frame: a color image and a pole mask per camera.
#[derive(Debug, Clone, Copy)]
pub struct BottomInputs<'a> {
    pub primary: &'a RgbImageData,
    pub secondary: &'a RgbImageData,
    pub primary_mask: &'a RgbImageData,
    pub secondary_mask: &'a RgbImageData,
}

/// Everything one fusion produces.
///
/// Only `primary_model` and `combined` are the logical result; the rest is
/// for persistence.
#[derive(Debug, Clone)]
pub struct FusedFrame {
    pub primary_model: CameraModel,
    pub combined: RgbaImageData,
    /// Seed for the next frame: this frame's field and working images
    pub next_seed: FrameCacheEntry,
    pub warped_secondary: RgbaImageData,
}

/// In-memory bottom pole removal, free of any file system access.
pub struct PoleRemoval {
    aligner: MotionAligner,
    feather_width: u32,
}

fn check_mask(model: &CameraModel, image: &RgbImageData, mask: &RgbImageData) -> Result<PoleMask> {
    if mask.is_empty() || mask.width != image.width || mask.height != image.height {
        return Err(FusionError::MissingResource(format!(
            "missing or bad pole mask for {}: mask {}x{}, image {}x{}",
            model.camera_id, mask.width, mask.height, image.width, image.height
        )));
    }
    PoleMask::from_rgb(mask)
}

impl PoleRemoval {
    pub fn new(aligner: MotionAligner, feather_width: u32) -> Self {
        Self {
            aligner,
            feather_width,
        }
    }

    /// Fuses the two bottom views into one pole-free image.
    ///
    /// Stages run strictly in order: masks, alignment, color matching,
    /// compositing. Any failure aborts the frame with no partial output.
    pub fn combine(
        &self,
        primary_model: &CameraModel,
        secondary_model: &CameraModel,
        inputs: BottomInputs<'_>,
        prior: Option<&FrameCacheEntry>,
    ) -> Result<FusedFrame> {
        let primary_mask = check_mask(primary_model, inputs.primary, inputs.primary_mask)?;
        let secondary_mask = check_mask(secondary_model, inputs.secondary, inputs.secondary_mask)?;

        let primary = build_camera_image(primary_model, inputs.primary, &primary_mask, self.feather_width)?;
        let secondary =
            build_camera_image(secondary_model, inputs.secondary, &secondary_mask, self.feather_width)?;

        info!(
            engine = self.aligner.engine_name(),
            seeded = prior.is_some(),
            "Doing optical flow to merge bottom camera images"
        );
        let (field, warped) = self.aligner.align(&primary, &secondary, prior)?;

        let adjusted = {
            let _span = info_span!("color_match").entered();
            let model = ColorAdjustmentModel::fit(&primary, &warped)?;
            model.apply(&warped)
        };

        info!("Combining the primary bottom image and the secondary warped image");
        let compositor = Compositor::new(primary_model.usable_pixels_radius, self.feather_width);
        let combined = compositor.composite(&primary, &adjusted)?;

        Ok(FusedFrame {
            primary_model: primary_model.clone(),
            combined,
            next_seed: FrameCacheEntry {
                field,
                primary,
                secondary,
            },
            warped_secondary: warped,
        })
    }
}
