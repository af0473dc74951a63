//! Validity masks for the bottom cameras
//!
//! A working image carries its validity in the alpha channel. The mask
//! builder starts from a fully opaque copy of the camera image, cuts away
//! the pixels outside the usable sensor circle and the pixels covered by
//! the rig pole, then feathers the resulting edges.

mod builder;
mod cutout;
mod feather;
mod pole_mask;

pub use builder::{build_camera_image, build_masked};
pub use cutout::{circle_alpha_cut, cut_pole_mask};
pub use feather::feather_alpha;
pub use pole_mask::PoleMask;
