//! Alpha compositing of the primary view with the aligned secondary view

mod blend;

pub use blend::Compositor;
