//! Dense motion estimation and warping
//!
//! The aligner never computes motion itself. It hands the two working
//! images, the temporal seed and a direction hint to an engine looked up by
//! name in a [`MotionEstimatorRegistry`], then resamples the secondary image
//! through the returned field.

mod aligner;
mod block_match;
mod estimator;
mod identity;
mod registry;
pub mod types;
mod warp;

pub use aligner::MotionAligner;
pub use block_match::BlockMatchEstimator;
pub use estimator::{MotionEstimator, MotionRequest, TemporalSeed};
pub use identity::IdentityEstimator;
pub use registry::MotionEstimatorRegistry;
pub use types::{DirectionHint, MotionField};
pub use warp::warp_by_field;
