use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::image_pipeline::camera::{CameraModel, select_bottom_pair};
use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::frame_cache::{FrameCacheEntry, FrameCacheStore};
use crate::image_pipeline::fusion::config::{ArtifactWritePolicy, FusionConfig};
use crate::image_pipeline::fusion::pole_removal::{BottomInputs, FusedFrame, PoleRemoval};
use crate::image_pipeline::motion::{MotionAligner, MotionEstimatorRegistry};
use crate::image_pipeline::raster::{
    RasterReader, RasterWriter, RgbImageData, RgbaImageData, StandardTiffWriter, TiffRasterReader,
};

const IMAGE_EXTENSION: &str = "tiff";

/// File-backed bottom pole removal for one frame of a video sequence.
pub struct PoleRemovalPipeline<R: RasterReader, W: RasterWriter> {
    reader: R,
    writer: W,
    config: FusionConfig,
    registry: MotionEstimatorRegistry,
}

impl PoleRemovalPipeline<TiffRasterReader, StandardTiffWriter> {
    pub fn new(config: FusionConfig) -> Self {
        Self {
            reader: TiffRasterReader,
            writer: StandardTiffWriter,
            config,
            registry: MotionEstimatorRegistry::with_defaults(),
        }
    }
}

impl<R: RasterReader, W: RasterWriter> PoleRemovalPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: FusionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
            registry: MotionEstimatorRegistry::with_defaults(),
        }
    }

    /// Replaces the engine registry, e.g. to add an external algorithm.
    pub fn with_registry(mut self, registry: MotionEstimatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    fn camera_file(dir: &Path, model: &CameraModel) -> PathBuf {
        dir.join(format!("{}.{}", model.camera_id, IMAGE_EXTENSION))
    }

    fn read_rgb(&self, path: &Path) -> Result<RgbImageData> {
        let data = fs::read(path)
            .map_err(|e| FusionError::MissingResource(format!("{}: {}", path.display(), e)))?;
        self.reader
            .read_rgb(&data)
            .map_err(|e| FusionError::MissingResource(format!("{}: {}", path.display(), e)))
    }

    fn write_image(&self, path: &Path, image: &RgbaImageData) -> Result<()> {
        let mut file = fs::File::create(path)
            .map_err(|e| FusionError::OutputWrite(format!("{}: {}", path.display(), e)))?;
        self.writer.write_rgba(image, &mut file, self.config.compression)
    }

    fn cache_store(&self) -> FrameCacheStore<'_> {
        FrameCacheStore::new(&self.reader, &self.writer, self.config.compression)
    }

    fn output_dir(&self) -> Result<Option<&Path>> {
        let wants_output = self.config.save_debug_images || self.config.save_flow_for_next_frame;
        match (&self.config.output_data_dir, wants_output) {
            (Some(dir), true) => Ok(Some(dir.as_path())),
            (None, true) => Err(FusionError::Configuration(
                "saving debug images or flow requires an output data directory".to_string(),
            )),
            (_, false) => Ok(None),
        }
    }

    fn persist(&self, output_dir: &Path, frame: &FusedFrame) -> Result<()> {
        if self.config.save_flow_for_next_frame {
            self.cache_store().write(output_dir, &frame.next_seed)?;
        }

        if self.config.save_debug_images {
            let _span = tracing::info_span!("save_debug_images").entered();
            fs::create_dir_all(output_dir).map_err(|e| {
                FusionError::OutputWrite(format!("{}: {}", output_dir.display(), e))
            })?;
            let snapshots = [
                ("bottomImage.tiff", &frame.next_seed.primary),
                ("bottomImage2.tiff", &frame.next_seed.secondary),
                ("bottomWarp2.tiff", &frame.warped_secondary),
                ("_bottomCombined.tiff", &frame.combined),
            ];
            for (name, image) in snapshots {
                self.write_image(&output_dir.join(name), image)?;
            }
        }
        Ok(())
    }

    /// Fuses the rig's two bottom cameras into one pole-free image.
    ///
    /// Returns the primary camera's calibration record together with the
    /// combined image. Debug snapshots and the next frame's seed are written
    /// afterwards, as configured.
    #[instrument(skip(self), fields(engine = %self.config.flow_alg_name))]
    pub fn combine_bottom_images(&self) -> Result<(CameraModel, RgbaImageData)> {
        let (primary_model, secondary_model) = select_bottom_pair(&self.config.rig)?;
        let aligner = MotionAligner::from_registry(&self.registry, &self.config.flow_alg_name)?;
        let output_dir = self.output_dir()?;

        let (primary, secondary, primary_mask, secondary_mask) = {
            let _span = tracing::info_span!("read_inputs").entered();
            let images_dir = &self.config.images_dir;
            let mask_dir = &self.config.pole_mask_dir;
            (
                self.read_rgb(&Self::camera_file(images_dir, &primary_model))?,
                self.read_rgb(&Self::camera_file(images_dir, &secondary_model))?,
                self.read_rgb(&Self::camera_file(mask_dir, &primary_model))?,
                self.read_rgb(&Self::camera_file(mask_dir, &secondary_model))?,
            )
        };

        let prior: Option<FrameCacheEntry> = self
            .config
            .prev_frame_data_dir
            .as_deref()
            .map(|dir| self.cache_store().read(dir))
            .transpose()?;

        let frame = PoleRemoval::new(aligner, self.config.alpha_feather_size).combine(
            &primary_model,
            &secondary_model,
            BottomInputs {
                primary: &primary,
                secondary: &secondary,
                primary_mask: &primary_mask,
                secondary_mask: &secondary_mask,
            },
            prior.as_ref(),
        )?;

        info!(
            camera_id = %frame.primary_model.camera_id,
            width = frame.combined.width,
            height = frame.combined.height,
            "Bottom images combined"
        );

        if let Some(dir) = output_dir {
            if let Err(e) = self.persist(dir, &frame) {
                match self.config.artifact_write_policy {
                    ArtifactWritePolicy::Fatal => return Err(e),
                    ArtifactWritePolicy::WarnAndContinue => {
                        warn!(error = %e, "Failed to persist frame artifacts, keeping result");
                    }
                }
            }
        }

        Ok((frame.primary_model, frame.combined))
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: FusionConfig) {
        self.config = config;
    }
}
