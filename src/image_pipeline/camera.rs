//! Camera calibration records and bottom-pair selection

mod selector;
pub mod types;

pub use selector::select_bottom_pair;
pub use types::{CameraModel, CameraRole};
