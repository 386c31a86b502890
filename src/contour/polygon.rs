use super::hull::cross;

/// Signed shoelace area; positive for counter-clockwise order in a y-up frame.
pub fn signed_area(poly: &[[f32; 2]]) -> f32 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0f64;
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        acc += a[0] as f64 * b[1] as f64 - b[0] as f64 * a[1] as f64;
    }
    (acc * 0.5) as f32
}

/// Unsigned polygon area.
pub fn polygon_area(poly: &[[f32; 2]]) -> f32 {
    signed_area(poly).abs()
}

/// Closed perimeter length.
pub fn perimeter(poly: &[[f32; 2]]) -> f32 {
    if poly.len() < 2 {
        return 0.0;
    }
    (0..poly.len())
        .map(|i| distance(poly[i], poly[(i + 1) % poly.len()]))
        .sum()
}

/// Strict convexity: every turn has the same sign and none is degenerate.
pub fn is_convex(poly: &[[f32; 2]]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let c = cross(poly[i], poly[(i + 1) % n], poly[(i + 2) % n]);
        if c.abs() <= f32::EPSILON {
            return false;
        }
        if sign == 0.0 {
            sign = c.signum();
        } else if c.signum() != sign {
            return false;
        }
    }
    true
}

/// Douglas–Peucker simplification of a closed polygon.
///
/// The ring is split at the vertex farthest from the first one and each half
/// is simplified independently, so the two split vertices always survive.
pub fn approx_closed_polygon(poly: &[[f32; 2]], epsilon: f32) -> Vec<[f32; 2]> {
    let n = poly.len();
    if n <= 3 {
        return poly.to_vec();
    }
    let far = (1..n)
        .max_by(|&a, &b| {
            distance(poly[0], poly[a])
                .partial_cmp(&distance(poly[0], poly[b]))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(n / 2);

    let first: Vec<[f32; 2]> = poly[..=far].to_vec();
    let mut second: Vec<[f32; 2]> = poly[far..].to_vec();
    second.push(poly[0]);

    let mut out = douglas_peucker(&first, epsilon);
    let tail = douglas_peucker(&second, epsilon);
    out.pop();
    out.extend_from_slice(&tail[..tail.len() - 1]);
    out
}

fn douglas_peucker(chain: &[[f32; 2]], epsilon: f32) -> Vec<[f32; 2]> {
    if chain.len() <= 2 {
        return chain.to_vec();
    }
    let (a, b) = (chain[0], chain[chain.len() - 1]);
    let mut best = (0usize, -1.0f32);
    for (i, &p) in chain.iter().enumerate().take(chain.len() - 1).skip(1) {
        let d = point_segment_distance(p, a, b);
        if d > best.1 {
            best = (i, d);
        }
    }
    if best.1 > epsilon {
        let mut left = douglas_peucker(&chain[..=best.0], epsilon);
        let right = douglas_peucker(&chain[best.0..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![a, b]
    }
}

#[inline]
pub(crate) fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

fn point_segment_distance(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return distance(p, a);
    }
    let t = (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, [a[0] + t * dx, a[1] + t * dy])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [[f32; 2]; 4] = [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];

    #[test]
    fn square_area_and_perimeter() {
        assert_eq!(polygon_area(&SQUARE), 100.0);
        assert_eq!(perimeter(&SQUARE), 40.0);
        assert!(is_convex(&SQUARE));
    }

    #[test]
    fn bow_tie_is_not_convex() {
        let bow = [[0.0, 0.0], [10.0, 10.0], [10.0, 0.0], [0.0, 10.0]];
        assert!(!is_convex(&bow));
    }

    #[test]
    fn noisy_square_simplifies_to_four_corners() {
        let mut ring = Vec::new();
        for i in 0..10 {
            ring.push([i as f32, if i % 2 == 0 { 0.0 } else { 0.2 }]);
        }
        for i in 0..10 {
            ring.push([10.0, i as f32]);
        }
        for i in 0..10 {
            ring.push([10.0 - i as f32, 10.0]);
        }
        for i in 0..10 {
            ring.push([0.0, 10.0 - i as f32]);
        }
        let simplified = approx_closed_polygon(&ring, 0.5);
        assert_eq!(simplified.len(), 4, "{simplified:?}");
        assert!((polygon_area(&simplified) - 100.0).abs() < 3.0);
    }
}
