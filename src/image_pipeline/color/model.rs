use tracing::debug;

use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::raster::RgbaImageData;

/// Per-channel affine color correction `out = scale * in + bias`.
///
/// Fit on geometrically aligned images only: the samples are taken pixel by
/// pixel, so unaligned inputs would pair unrelated colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAdjustmentModel {
    pub scale: [f32; 3],
    pub bias: [f32; 3],
}

impl Default for ColorAdjustmentModel {
    fn default() -> Self {
        Self::identity()
    }
}

/// Running sums for a least-squares line fit of one channel
#[derive(Default, Clone, Copy)]
struct ChannelSums {
    n: f64,
    x: f64,
    y: f64,
    xx: f64,
    xy: f64,
}

impl ChannelSums {
    fn add(&mut self, x: f64, y: f64) {
        self.n += 1.0;
        self.x += x;
        self.y += y;
        self.xx += x * x;
        self.xy += x * y;
    }

    fn solve(&self) -> (f32, f32) {
        if self.n == 0.0 {
            return (1.0, 0.0);
        }
        let var = self.n * self.xx - self.x * self.x;
        if var.abs() < 1e-9 {
            // Flat candidate channel: only the offset is observable.
            return (1.0, ((self.y - self.x) / self.n) as f32);
        }
        let scale = (self.n * self.xy - self.x * self.y) / var;
        let bias = (self.y - scale * self.x) / self.n;
        (scale as f32, bias as f32)
    }
}

impl ColorAdjustmentModel {
    pub fn identity() -> Self {
        Self {
            scale: [1.0; 3],
            bias: [0.0; 3],
        }
    }

    /// Fits a correction mapping `candidate` colors onto `reference` colors,
    /// using only pixels valid (nonzero alpha) in both images.
    pub fn fit(reference: &RgbaImageData, candidate: &RgbaImageData) -> Result<Self> {
        if !reference.same_size(candidate) {
            return Err(FusionError::Alignment(format!(
                "color reference is {}x{} but candidate is {}x{}",
                reference.width, reference.height, candidate.width, candidate.height
            )));
        }

        let mut sums = [ChannelSums::default(); 3];
        for (r, c) in reference.data.chunks_exact(4).zip(candidate.data.chunks_exact(4)) {
            if r[3] == 0 || c[3] == 0 {
                continue;
            }
            for ch in 0..3 {
                sums[ch].add(c[ch] as f64, r[ch] as f64);
            }
        }

        let mut model = Self::identity();
        for ch in 0..3 {
            let (scale, bias) = sums[ch].solve();
            model.scale[ch] = scale;
            model.bias[ch] = bias;
        }

        debug!(
            samples = sums[0].n as u64,
            scale = ?model.scale,
            bias = ?model.bias,
            "Fitted color adjustment model"
        );
        Ok(model)
    }

    /// Maps every pixel's color through the correction. Alpha is untouched.
    pub fn apply(&self, image: &RgbaImageData) -> RgbaImageData {
        let mut adjusted = image.clone();
        for px in adjusted.data.chunks_exact_mut(4) {
            for ch in 0..3 {
                let v = self.scale[ch] * px[ch] as f32 + self.bias[ch];
                px[ch] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
        adjusted
    }
}
