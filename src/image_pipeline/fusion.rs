//! Bottom pole removal orchestration
//!
//! [`PoleRemoval`] runs the fusion stages on in-memory rasters.
//! [`PoleRemovalPipeline`] adds the file layout around it: source images and
//! pole masks keyed by camera id, the optional previous-frame seed, debug
//! snapshots and the seed for the next frame.

mod config;
mod pipeline;
mod pole_removal;


pub use config::{ArtifactWritePolicy, FusionConfig, FusionConfigBuilder};
pub use pipeline::PoleRemovalPipeline;
pub use pole_removal::{BottomInputs, FusedFrame, PoleRemoval};
