use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::motion::estimator::{MotionEstimator, MotionRequest, TemporalSeed};
use crate::image_pipeline::motion::types::{DirectionHint, MotionField};
use crate::image_pipeline::raster::RgbaImageData;

/// Exhaustive patch search on a coarse grid, densified bilinearly.
///
/// Costs are alpha-weighted mean absolute color differences, so masked
/// pixels never attract a match. On top of the photometric cost every
/// candidate pays for moving against the direction hint, for deviating
/// from the previous frame's vector, and a small amount for its magnitude
/// so that featureless patches settle on zero motion.
#[derive(Debug, Clone)]
pub struct BlockMatchEstimator {
    /// Spacing in pixels between estimated grid points
    pub grid_step: usize,
    /// Half-size of the square comparison patch
    pub patch_radius: usize,
    /// Largest displacement searched along each axis
    pub search_radius: i32,
    /// Cost per pixel of motion against the direction hint
    pub hint_weight: f32,
    /// Cost per pixel of deviation from the prior vector
    pub temporal_weight: f32,
    /// Cost per pixel of displacement magnitude
    pub magnitude_weight: f32,
    /// Mean color change below which a patch is considered static since the
    /// previous frame, keeping the prior vector as is
    pub static_threshold: f32,
    /// Fraction of the patch that must be valid in both images
    pub min_valid_fraction: f32,
}

impl Default for BlockMatchEstimator {
    fn default() -> Self {
        Self {
            grid_step: 8,
            patch_radius: 4,
            search_radius: 8,
            hint_weight: 0.5,
            temporal_weight: 0.5,
            magnitude_weight: 0.01,
            static_threshold: 1.0,
            min_valid_fraction: 0.3,
        }
    }
}

fn grid_positions(len: usize, step: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut positions: Vec<usize> = (0..len).step_by(step.max(1)).collect();
    if positions.last() != Some(&(len - 1)) {
        positions.push(len - 1);
    }
    positions
}

fn color_diff(a: &[u8], b: &[u8]) -> f32 {
    (0..3)
        .map(|c| (a[c] as f32 - b[c] as f32).abs())
        .sum::<f32>()
        / 3.0
}

pub(crate) fn hint_penalty(hint: DirectionHint, dx: i32, dy: i32) -> f32 {
    let against = match hint {
        DirectionHint::Unknown => 0,
        DirectionHint::Down => (-dy).max(0),
        DirectionHint::Up => dy.max(0),
        DirectionHint::Right => (-dx).max(0),
        DirectionHint::Left => dx.max(0),
    };
    against as f32
}

impl BlockMatchEstimator {
    /// Alpha-weighted cost of matching the primary patch at `(x, y)` with
    /// the `b` patch displaced by `(dx, dy)`. `None` when too little of the
    /// patch is valid in both images.
    fn patch_cost(
        &self,
        a: &RgbaImageData,
        b: &RgbaImageData,
        x: usize,
        y: usize,
        dx: i32,
        dy: i32,
    ) -> Option<f32> {
        let r = self.patch_radius as i32;
        let (w, h) = (a.width as i32, a.height as i32);
        let mut cost = 0.0f32;
        let mut weight_sum = 0.0f32;
        for v in -r..=r {
            let ay = y as i32 + v;
            let by = ay + dy;
            if ay < 0 || ay >= h || by < 0 || by >= h {
                continue;
            }
            for u in -r..=r {
                let ax = x as i32 + u;
                let bx = ax + dx;
                if ax < 0 || ax >= w || bx < 0 || bx >= w {
                    continue;
                }
                let ia = ((ay * w + ax) * 4) as usize;
                let ib = ((by * w + bx) * 4) as usize;
                let pa = &a.data[ia..ia + 4];
                let pb = &b.data[ib..ib + 4];
                let weight = pa[3].min(pb[3]) as f32 / 255.0;
                if weight > 0.0 {
                    cost += weight * color_diff(pa, pb);
                    weight_sum += weight;
                }
            }
        }
        let side = (2 * self.patch_radius + 1) as f32;
        if weight_sum <= 0.0 || weight_sum < self.min_valid_fraction * side * side {
            return None;
        }
        Some(cost / weight_sum)
    }

    fn estimate_point(
        &self,
        request: &MotionRequest<'_>,
        prior: Option<[f32; 2]>,
        x: usize,
        y: usize,
    ) -> [f32; 2] {
        if let Some(p) = prior {
            if request.seed.primary.same_size(request.primary) {
                let change = self.patch_cost(request.primary, request.seed.primary, x, y, 0, 0);
                if change.is_some_and(|c| c < self.static_threshold) {
                    return p;
                }
            }
        }

        let mut best: Option<(f32, [i32; 2])> = None;
        let s = self.search_radius;
        for dy in -s..=s {
            for dx in -s..=s {
                let Some(cost) =
                    self.patch_cost(request.primary, request.secondary, x, y, dx, dy)
                else {
                    continue;
                };
                let mut total = cost
                    + self.hint_weight * hint_penalty(request.hint, dx, dy)
                    + self.magnitude_weight * (dx.abs() + dy.abs()) as f32;
                if let Some(p) = prior {
                    total += self.temporal_weight
                        * ((dx as f32 - p[0]).abs() + (dy as f32 - p[1]).abs());
                }
                if best.is_none_or(|(b, _)| total < b) {
                    best = Some((total, [dx, dy]));
                }
            }
        }

        match best {
            Some((_, [dx, dy])) => [dx as f32, dy as f32],
            None => prior.unwrap_or([0.0, 0.0]),
        }
    }

    fn usable_seed<'a>(seed: &TemporalSeed<'a>, width: usize, height: usize) -> Option<&'a MotionField> {
        if seed.is_empty() || seed.field.dimensions() != (width, height) {
            return None;
        }
        Some(seed.field)
    }
}

impl MotionEstimator for BlockMatchEstimator {
    fn name(&self) -> &str {
        "block_match"
    }

    fn estimate(&self, request: &MotionRequest<'_>) -> Result<MotionField> {
        let (width, height) = request.primary.dimensions();
        let xs = grid_positions(width, self.grid_step);
        let ys = grid_positions(height, self.grid_step);
        let seed_field = Self::usable_seed(&request.seed, width, height);

        debug!(
            grid_cols = xs.len(),
            grid_rows = ys.len(),
            seeded = seed_field.is_some(),
            "Block matching"
        );

        let grid: Vec<Vec<[f32; 2]>> = ys
            .par_iter()
            .map(|&y| {
                xs.iter()
                    .map(|&x| {
                        let prior = seed_field.map(|f| f.get(x, y));
                        self.estimate_point(request, prior, x, y)
                    })
                    .collect()
            })
            .collect();

        let mut field = MotionField::zeros(width, height);
        if width == 0 || height == 0 {
            return Ok(field);
        }

        let step = self.grid_step.max(1);
        let cell = |positions: &[usize], p: usize| -> (usize, usize, f32) {
            let i0 = (p / step).min(positions.len() - 1);
            let i1 = (i0 + 1).min(positions.len() - 1);
            let span = positions[i1] as f32 - positions[i0] as f32;
            let t = if span > 0.0 {
                (p as f32 - positions[i0] as f32) / span
            } else {
                0.0
            };
            (i0, i1, t)
        };

        field
            .data
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let (j0, j1, ty) = cell(ys.as_slice(), y);
                for (x, out) in row.iter_mut().enumerate() {
                    let (i0, i1, tx) = cell(xs.as_slice(), x);
                    for c in 0..2 {
                        let top = grid[j0][i0][c] * (1.0 - tx) + grid[j0][i1][c] * tx;
                        let bottom = grid[j1][i0][c] * (1.0 - tx) + grid[j1][i1][c] * tx;
                        out[c] = top * (1.0 - ty) + bottom * ty;
                    }
                }
            });

        Ok(field)
    }
}
