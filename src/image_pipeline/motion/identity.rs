use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::motion::estimator::{MotionEstimator, MotionRequest};
use crate::image_pipeline::motion::types::MotionField;

/// Engine that assumes the two views are already aligned.
pub struct IdentityEstimator;

impl MotionEstimator for IdentityEstimator {
    fn name(&self) -> &str {
        "identity"
    }

    fn estimate(&self, request: &MotionRequest<'_>) -> Result<MotionField> {
        Ok(MotionField::zeros(request.primary.width, request.primary.height))
    }
}
