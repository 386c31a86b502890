//! Planar homographies: four-point estimation, point mapping and
//! perspective warping of float images.
use crate::image::{ImageF32, ImageViewMut};
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

const EPS: f32 = 1e-9;

/// Solve for `H` such that `H · [src_i, 1]ᵀ ∝ [dst_i, 1]ᵀ` for the four
/// correspondences, with `H[2][2] = 1`. Returns `None` when three of the
/// points are collinear (singular system) or the result is not finite.
pub fn homography_from_points(src: &[[f32; 2]; 4], dst: &[[f32; 2]; 4]) -> Option<Matrix3<f32>> {
    if has_collinear_triple(src) || has_collinear_triple(dst) {
        return None;
    }
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let (x, y) = (src[i][0] as f64, src[i][1] as f64);
        let (u, v) = (dst[i][0] as f64, dst[i][1] as f64);
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -u * y;
        b[r] = u;
        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -v * x;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = v;
    }
    let h = a.lu().solve(&b)?;
    if h.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(Matrix3::new(
        h[0] as f32,
        h[1] as f32,
        h[2] as f32,
        h[3] as f32,
        h[4] as f32,
        h[5] as f32,
        h[6] as f32,
        h[7] as f32,
        1.0,
    ))
}

fn has_collinear_triple(pts: &[[f32; 2]; 4]) -> bool {
    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    let scale = pts
        .iter()
        .flat_map(|p| p.iter())
        .fold(1.0f32, |m, v| m.max(v.abs()));
    TRIPLES.iter().any(|t| {
        let (a, b, c) = (pts[t[0]], pts[t[1]], pts[t[2]]);
        let twice_area = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        twice_area.abs() <= 1e-6 * scale * scale
    })
}

/// Map points through `h`. Returns `None` if any point maps to infinity.
pub fn apply_homography_points(h: &Matrix3<f32>, pts: &[[f32; 2]]) -> Option<Vec<[f32; 2]>> {
    let mut out = Vec::with_capacity(pts.len());
    for &p in pts {
        out.push(apply_homography(h, p)?);
    }
    Some(out)
}

#[inline]
pub fn apply_homography(h: &Matrix3<f32>, p: [f32; 2]) -> Option<[f32; 2]> {
    let v = h * Vector3::new(p[0], p[1], 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some([v[0] / w, v[1] / w])
}

/// Render a `out_w × out_h` image whose pixel (x, y) takes the bilinear
/// sample of `src` at `dst_to_src · (x, y)`. Pixels whose preimage is at
/// infinity take `fill`.
pub fn warp_perspective(
    src: &ImageF32,
    dst_to_src: &Matrix3<f32>,
    out_w: usize,
    out_h: usize,
    fill: f32,
) -> ImageF32 {
    let mut out = ImageF32::new(out_w, out_h);
    for y in 0..out_h {
        let row = out.row_mut(y);
        for (x, px) in row.iter_mut().enumerate() {
            *px = match apply_homography(dst_to_src, [x as f32, y as f32]) {
                Some([sx, sy]) => src.sample_bilinear(sx, sy),
                None => fill,
            };
        }
    }
    out
}
