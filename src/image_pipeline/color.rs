//! Color matching between the aligned bottom views

mod model;

pub use model::ColorAdjustmentModel;
