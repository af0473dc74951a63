use rayon::prelude::*;
use tracing::info_span;

use crate::image_pipeline::alpha_mask::{circle_alpha_cut, feather_alpha};
use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::raster::RgbaImageData;

/// Fills the primary's masked regions from the color-matched secondary.
///
/// The primary stays authoritative wherever it is fully valid. Elsewhere the
/// secondary contributes whenever its alpha is nonzero, weighted only by how
/// much validity the primary has left.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    pub usable_radius: f32,
    pub feather_width: u32,
}

fn blend_pixel(out: &mut [u8], secondary: &[u8]) {
    let a1 = out[3];
    if a1 == u8::MAX || secondary[3] == 0 {
        return;
    }
    let w1 = a1 as f32 / 255.0;
    let w2 = 1.0 - w1;
    for c in 0..3 {
        let v = w1 * out[c] as f32 + w2 * secondary[c] as f32;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = u8::MAX;
}

impl Compositor {
    pub fn new(usable_radius: f32, feather_width: u32) -> Self {
        Self {
            usable_radius,
            feather_width,
        }
    }

    /// Per-pixel blend of `primary` with `secondary`, without the final recut.
    pub fn blend(&self, primary: &RgbaImageData, secondary: &RgbaImageData) -> Result<RgbaImageData> {
        if !primary.same_size(secondary) {
            return Err(FusionError::Alignment(format!(
                "cannot blend {}x{} primary with {}x{} secondary",
                primary.width, primary.height, secondary.width, secondary.height
            )));
        }

        let mut combined = primary.clone();
        if combined.is_empty() {
            return Ok(combined);
        }
        let row_len = combined.width * 4;
        combined
            .data
            .par_chunks_mut(row_len)
            .zip(secondary.data.par_chunks(row_len))
            .for_each(|(row, secondary_row)| {
                for (out, s) in row.chunks_exact_mut(4).zip(secondary_row.chunks_exact(4)) {
                    blend_pixel(out, s);
                }
            });
        Ok(combined)
    }

    /// Blends, then recuts the usable circle and re-feathers the alpha.
    ///
    /// Where both pole masks overlap near the center neither view has data,
    /// so the blend leaves a hole; the second mask pass turns its hard edge
    /// into a feathered one.
    pub fn composite(&self, primary: &RgbaImageData, secondary: &RgbaImageData) -> Result<RgbaImageData> {
        let mut combined = {
            let _span = info_span!("blend").entered();
            self.blend(primary, secondary)?
        };
        let _span = info_span!("recut_alpha").entered();
        circle_alpha_cut(&mut combined, self.usable_radius);
        feather_alpha(&mut combined, self.feather_width);
        Ok(combined)
    }
}
