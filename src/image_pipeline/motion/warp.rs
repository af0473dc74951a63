use rayon::prelude::*;

use crate::image_pipeline::common::error::{FusionError, Result};
use crate::image_pipeline::motion::types::MotionField;
use crate::image_pipeline::raster::RgbaImageData;

/// Keys cubic convolution coefficient, as used by common remap kernels.
const CUBIC_A: f32 = -0.75;

/// Value read for taps outside the source image (fully transparent).
const BORDER: [f32; 4] = [0.0; 4];

fn cubic_weights(t: f32) -> [f32; 4] {
    let a = CUBIC_A;
    let near = |d: f32| ((a + 2.0) * d - (a + 3.0)) * d * d + 1.0;
    let far = |d: f32| ((a * d - 5.0 * a) * d + 8.0 * a) * d - 4.0 * a;
    [far(1.0 + t), near(t), near(1.0 - t), far(2.0 - t)]
}

fn sample_bicubic(source: &RgbaImageData, sx: f32, sy: f32) -> [u8; 4] {
    // Beyond this margin every tap is outside the image.
    let in_reach = sx >= -2.0
        && sy >= -2.0
        && sx <= source.width as f32 + 1.0
        && sy <= source.height as f32 + 1.0;
    if !in_reach {
        return [0; 4];
    }
    let (w, h) = (source.width as isize, source.height as isize);
    let x0 = sx.floor();
    let y0 = sy.floor();
    let wx = cubic_weights(sx - x0);
    let wy = cubic_weights(sy - y0);
    let (x0, y0) = (x0 as isize, y0 as isize);

    let mut acc = [0.0f32; 4];
    for (j, wyj) in wy.iter().enumerate() {
        let y = y0 - 1 + j as isize;
        for (i, wxi) in wx.iter().enumerate() {
            let x = x0 - 1 + i as isize;
            let weight = wxi * wyj;
            let tap = if x < 0 || y < 0 || x >= w || y >= h {
                BORDER
            } else {
                let idx = ((y * w + x) * 4) as usize;
                let p = &source.data[idx..idx + 4];
                [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
            };
            for c in 0..4 {
                acc[c] += weight * tap[c];
            }
        }
    }
    acc.map(|v| v.round().clamp(0.0, 255.0) as u8)
}

/// Resamples `source` so that output pixel `(x, y)` takes the bicubic value
/// at `(x + dx, y + dy)`. Taps beyond the image read as transparent black.
pub fn warp_by_field(source: &RgbaImageData, field: &MotionField) -> Result<RgbaImageData> {
    if field.dimensions() != source.dimensions() {
        return Err(FusionError::Alignment(format!(
            "motion field is {}x{} but image is {}x{}",
            field.width, field.height, source.width, source.height
        )));
    }

    let width = source.width;
    let mut warped = RgbaImageData::filled(width, source.height, [0; 4]);
    if warped.is_empty() {
        return Ok(warped);
    }

    warped
        .data
        .par_chunks_mut(width * 4)
        .zip(field.data.par_chunks(width))
        .enumerate()
        .for_each(|(y, (row, flow_row))| {
            for (x, (px, d)) in row.chunks_exact_mut(4).zip(flow_row).enumerate() {
                let sx = x as f32 + d[0];
                let sy = y as f32 + d[1];
                px.copy_from_slice(&sample_bicubic(source, sx, sy));
            }
        });

    Ok(warped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> RgbaImageData {
        let data = (0..width * height)
            .flat_map(|i| [(i % 256) as u8, (i / width * 10) as u8, 7, 255])
            .collect();
        RgbaImageData::new(width, height, data).unwrap()
    }

    #[test]
    fn weights_sum_to_one() {
        for t in [0.0, 0.25, 0.5, 0.9] {
            let sum: f32 = cubic_weights(t).iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
        assert_eq!(cubic_weights(0.0), [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_field_is_identity() {
        let image = ramp(12, 9);
        let warped = warp_by_field(&image, &MotionField::zeros(12, 9)).unwrap();
        assert_eq!(warped, image);
    }

    #[test]
    fn integer_shift_moves_pixels() {
        let image = ramp(12, 9);
        let field = MotionField {
            width: 12,
            height: 9,
            data: vec![[2.0, 1.0]; 12 * 9],
        };
        let warped = warp_by_field(&image, &field).unwrap();
        assert_eq!(warped.pixel(3, 4), image.pixel(5, 5));
        assert_eq!(warped.pixel(0, 0), image.pixel(2, 1));
    }

    #[test]
    fn out_of_bounds_samples_are_transparent() {
        let image = ramp(12, 9);
        let field = MotionField {
            width: 12,
            height: 9,
            data: vec![[0.0, 100.0]; 12 * 9],
        };
        let warped = warp_by_field(&image, &field).unwrap();
        assert!(warped.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn huge_displacements_read_as_transparent() {
        let image = RgbaImageData::filled(4, 4, [50, 60, 70, 255]);
        for d in [[1.0e20, 0.0], [-1.0e20, 0.0], [0.0, f32::MAX], [f32::NAN, 0.0]] {
            let field = MotionField::new(4, 4, vec![d; 16]).unwrap();
            let warped = warp_by_field(&image, &field).unwrap();
            assert!(warped.data.iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn field_size_mismatch_is_alignment_error() {
        let image = ramp(12, 9);
        assert!(matches!(
            warp_by_field(&image, &MotionField::zeros(9, 12)),
            Err(FusionError::Alignment(_))
        ));
    }
}
