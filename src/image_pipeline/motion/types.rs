//! Motion field types

use crate::image_pipeline::common::error::{FusionError, Result};

/// Coarse prior on the dominant motion direction, used by engines to
/// disambiguate low-texture content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionHint {
    Unknown,
    Right,
    Left,
    Up,
    Down,
}

/// Dense per-pixel displacement map.
///
/// Entry `(dx, dy)` at `(x, y)` says that the target pixel `(x, y)` is found
/// at `(x + dx, y + dy)` in the other image.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionField {
    pub width: usize,
    pub height: usize,
    /// Row-major displacement pairs
    pub data: Vec<[f32; 2]>,
}

impl MotionField {
    pub fn new(width: usize, height: usize, data: Vec<[f32; 2]>) -> Result<Self> {
        if data.len() != width * height {
            return Err(FusionError::Alignment(format!(
                "motion field has {} entries, expected {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0, 0.0]; width * height],
        }
    }

    /// Zero-sized field, used where no previous frame exists.
    pub fn empty() -> Self {
        Self::zeros(0, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> [f32; 2] {
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, d: [f32; 2]) {
        self.data[y * self.width + x] = d;
    }
}
