//! Camera calibration types

/// Position of a camera within the capture rig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraRole {
    Side,
    Top,
    /// Primary downward-facing camera
    Bottom,
    /// Redundant downward-facing camera used to fill the pole region
    BottomSecondary,
}

/// Immutable calibration record for one rig camera
#[derive(Debug, Clone, PartialEq)]
pub struct CameraModel {
    pub camera_id: String,
    pub role: CameraRole,
    /// Radius in pixels, around the image center, of the region free of
    /// vignetting and structural obstruction
    pub usable_pixels_radius: f32,
    /// Camera is mounted upside down relative to its partner
    pub flip180: bool,
}

impl CameraModel {
    pub fn new(camera_id: impl Into<String>, role: CameraRole, usable_pixels_radius: f32) -> Self {
        Self {
            camera_id: camera_id.into(),
            role,
            usable_pixels_radius,
            flip180: false,
        }
    }

    pub fn with_flip180(mut self, flip180: bool) -> Self {
        self.flip180 = flip180;
        self
    }
}
