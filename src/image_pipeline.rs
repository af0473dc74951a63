//! Bottom pole removal pipeline module
//!
//! This module fuses the two downward-facing rig cameras into one image with
//! the pole removed, with separate modules for masking, motion alignment,
//! color matching, compositing, frame caching and raster I/O.

pub mod alpha_mask;
pub mod camera;
pub mod color;
pub mod common;
pub mod compositor;
pub mod frame_cache;
pub mod fusion;
pub mod motion;
pub mod raster;

pub use common::{
    FusionError,
    Result,
};

pub use camera::{
    CameraModel,
    CameraRole,
    select_bottom_pair,
};

pub use raster::{
    RgbImageData,
    RgbaImageData,
    TiffCompression,
    RasterReader,
    RasterWriter,
    TiffRasterReader,
    StandardTiffWriter,
};

pub use motion::{
    DirectionHint,
    MotionAligner,
    MotionEstimator,
    MotionEstimatorRegistry,
    MotionField,
};

pub use color::ColorAdjustmentModel;
pub use compositor::Compositor;
pub use frame_cache::FrameCacheEntry;

pub use fusion::{
    ArtifactWritePolicy,
    FusionConfig,
    FusionConfigBuilder,
    PoleRemoval,
    PoleRemovalPipeline,
};
