//! Fusion configuration types

use std::path::PathBuf;

use crate::image_pipeline::camera::CameraModel;
use crate::image_pipeline::raster::TiffCompression;

/// What to do when a debug snapshot or next-frame seed cannot be written.
///
/// These writes happen after the combined image exists, so a failure leaves
/// a valid result next to an incomplete side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactWritePolicy {
    /// Return the write error and drop the result
    Fatal,
    /// Log the write error and return the result
    WarnAndContinue,
}

/// Configuration for bottom pole removal
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// Directory holding `<camera_id>.tiff` source images
    pub images_dir: PathBuf,
    /// Directory holding `<camera_id>.tiff` pole masks
    pub pole_mask_dir: PathBuf,
    /// Previous frame's cache directory; `None` disables temporal seeding
    pub prev_frame_data_dir: Option<PathBuf>,
    /// Where debug snapshots and the next frame's seed are written
    pub output_data_dir: Option<PathBuf>,
    pub save_debug_images: bool,
    pub save_flow_for_next_frame: bool,
    /// Name of the registered motion estimation engine
    pub flow_alg_name: String,
    /// Width in pixels of the alpha falloff at mask edges
    pub alpha_feather_size: u32,
    /// Calibration records of every rig camera
    pub rig: Vec<CameraModel>,
    /// Compression used for persisted artifacts
    pub compression: TiffCompression,
    pub artifact_write_policy: ArtifactWritePolicy,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("."),
            pole_mask_dir: PathBuf::from("."),
            prev_frame_data_dir: None,
            output_data_dir: None,
            save_debug_images: false,
            save_flow_for_next_frame: false,
            flow_alg_name: "block_match".to_string(),
            alpha_feather_size: 20,
            rig: Vec::new(),
            compression: TiffCompression::None,
            artifact_write_policy: ArtifactWritePolicy::Fatal,
        }
    }
}

impl FusionConfig {
    pub fn builder() -> FusionConfigBuilder {
        FusionConfigBuilder::default()
    }
}

/// Builder for FusionConfig
#[derive(Default)]
pub struct FusionConfigBuilder {
    images_dir: Option<PathBuf>,
    pole_mask_dir: Option<PathBuf>,
    prev_frame_data_dir: Option<Option<PathBuf>>,
    output_data_dir: Option<Option<PathBuf>>,
    save_debug_images: Option<bool>,
    save_flow_for_next_frame: Option<bool>,
    flow_alg_name: Option<String>,
    alpha_feather_size: Option<u32>,
    rig: Option<Vec<CameraModel>>,
    compression: Option<TiffCompression>,
    artifact_write_policy: Option<ArtifactWritePolicy>,
}

impl FusionConfigBuilder {
    pub fn images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = Some(dir.into());
        self
    }

    pub fn pole_mask_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pole_mask_dir = Some(dir.into());
        self
    }

    pub fn prev_frame_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.prev_frame_data_dir = Some(dir);
        self
    }

    pub fn output_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_data_dir = Some(dir);
        self
    }

    pub fn save_debug_images(mut self, enable: bool) -> Self {
        self.save_debug_images = Some(enable);
        self
    }

    pub fn save_flow_for_next_frame(mut self, enable: bool) -> Self {
        self.save_flow_for_next_frame = Some(enable);
        self
    }

    pub fn flow_alg_name(mut self, name: impl Into<String>) -> Self {
        self.flow_alg_name = Some(name.into());
        self
    }

    pub fn alpha_feather_size(mut self, size: u32) -> Self {
        self.alpha_feather_size = Some(size);
        self
    }

    pub fn rig(mut self, rig: Vec<CameraModel>) -> Self {
        self.rig = Some(rig);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn artifact_write_policy(mut self, policy: ArtifactWritePolicy) -> Self {
        self.artifact_write_policy = Some(policy);
        self
    }

    pub fn build(self) -> FusionConfig {
        let default = FusionConfig::default();
        FusionConfig {
            images_dir: self.images_dir.unwrap_or(default.images_dir),
            pole_mask_dir: self.pole_mask_dir.unwrap_or(default.pole_mask_dir),
            prev_frame_data_dir: self.prev_frame_data_dir.unwrap_or(default.prev_frame_data_dir),
            output_data_dir: self.output_data_dir.unwrap_or(default.output_data_dir),
            save_debug_images: self.save_debug_images.unwrap_or(default.save_debug_images),
            save_flow_for_next_frame: self
                .save_flow_for_next_frame
                .unwrap_or(default.save_flow_for_next_frame),
            flow_alg_name: self.flow_alg_name.unwrap_or(default.flow_alg_name),
            alpha_feather_size: self.alpha_feather_size.unwrap_or(default.alpha_feather_size),
            rig: self.rig.unwrap_or(default.rig),
            compression: self.compression.unwrap_or(default.compression),
            artifact_write_policy: self
                .artifact_write_policy
                .unwrap_or(default.artifact_write_policy),
        }
    }
}
