use std::f32::consts::SQRT_2;

use crate::image_pipeline::raster::RgbaImageData;

/// Distance from every pixel to the nearest zero-alpha pixel, using a
/// two-pass 3x3 chamfer transform. Returns `None` when no pixel is zero.
fn distance_to_invalid(image: &RgbaImageData) -> Option<Vec<f32>> {
    let (w, h) = image.dimensions();
    let mut dist: Vec<f32> = image
        .data
        .chunks_exact(4)
        .map(|p| if p[3] == 0 { 0.0 } else { f32::INFINITY })
        .collect();
    if dist.iter().all(|d| d.is_infinite()) {
        return None;
    }

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let mut d = dist[i];
            if x > 0 {
                d = d.min(dist[i - 1] + 1.0);
            }
            if y > 0 {
                d = d.min(dist[i - w] + 1.0);
                if x > 0 {
                    d = d.min(dist[i - w - 1] + SQRT_2);
                }
                if x + 1 < w {
                    d = d.min(dist[i - w + 1] + SQRT_2);
                }
            }
            dist[i] = d;
        }
    }

    for y in (0..h).rev() {
        for x in (0..w).rev() {
            let i = y * w + x;
            let mut d = dist[i];
            if x + 1 < w {
                d = d.min(dist[i + 1] + 1.0);
            }
            if y + 1 < h {
                d = d.min(dist[i + w] + 1.0);
                if x + 1 < w {
                    d = d.min(dist[i + w + 1] + SQRT_2);
                }
                if x > 0 {
                    d = d.min(dist[i + w - 1] + SQRT_2);
                }
            }
            dist[i] = d;
        }
    }

    Some(dist)
}

/// Smooths the alpha edge so validity ramps from 0 to 255 over
/// `feather_width` pixels inside every masked boundary.
///
/// Alpha only ever decreases. A zero width leaves the image untouched.
pub fn feather_alpha(image: &mut RgbaImageData, feather_width: u32) {
    if feather_width == 0 {
        return;
    }
    let Some(dist) = distance_to_invalid(image) else {
        return;
    };
    let width = feather_width as f32;
    for (px, d) in image.data.chunks_exact_mut(4).zip(dist) {
        let ramp = (255.0 * (d / width).min(1.0)).round() as u8;
        px[3] = px[3].min(ramp);
    }
}
