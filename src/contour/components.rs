use crate::threshold::BinaryMask;

/// Connected region of ink pixels.
#[derive(Clone, Debug)]
pub struct Component {
    /// Linear indices (`y * w + x`) of every pixel in the region.
    pub pixels: Vec<usize>,
    /// Inclusive bounding box `[x_min, y_min, x_max, y_max]`.
    pub bbox: [usize; 4],
    pub centroid: [f32; 2],
    /// Width of the mask the indices refer to.
    pub mask_width: usize,
}

impl Component {
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn bbox_width(&self) -> usize {
        self.bbox[2] - self.bbox[0] + 1
    }

    pub fn bbox_height(&self) -> usize {
        self.bbox[3] - self.bbox[1] + 1
    }

    /// Leftmost and rightmost pixel centre of every row the region touches.
    /// The convex hull of these points equals the hull of the whole region.
    pub fn row_extremes(&self) -> Vec<[f32; 2]> {
        let rows = self.bbox_height();
        let mut min_x = vec![usize::MAX; rows];
        let mut max_x = vec![0usize; rows];
        for &idx in &self.pixels {
            let (x, y) = (idx % self.mask_width, idx / self.mask_width);
            let r = y - self.bbox[1];
            min_x[r] = min_x[r].min(x);
            max_x[r] = max_x[r].max(x);
        }
        let mut pts = Vec::with_capacity(rows * 2);
        for r in 0..rows {
            if min_x[r] == usize::MAX {
                continue;
            }
            let y = (self.bbox[1] + r) as f32;
            pts.push([min_x[r] as f32, y]);
            if max_x[r] != min_x[r] {
                pts.push([max_x[r] as f32, y]);
            }
        }
        pts
    }

    /// Whether the bounding box intersects the axis-aligned window
    /// `[x0, x1) × [y0, y1)`.
    pub fn bbox_intersects(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> bool {
        self.bbox[0] < x1 && self.bbox[2] >= x0 && self.bbox[1] < y1 && self.bbox[3] >= y0
    }
}

/// Running statistics while a region is flood-filled.
struct RegionAccumulator {
    indices: Vec<usize>,
    sum_x: f64,
    sum_y: f64,
    bbox: [usize; 4],
}

impl RegionAccumulator {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            sum_x: 0.0,
            sum_y: 0.0,
            bbox: [usize::MAX, usize::MAX, 0, 0],
        }
    }

    fn reset(&mut self) {
        self.indices.clear();
        self.sum_x = 0.0;
        self.sum_y = 0.0;
        self.bbox = [usize::MAX, usize::MAX, 0, 0];
    }

    fn push(&mut self, idx: usize, x: usize, y: usize) {
        self.indices.push(idx);
        self.sum_x += x as f64;
        self.sum_y += y as f64;
        self.bbox[0] = self.bbox[0].min(x);
        self.bbox[1] = self.bbox[1].min(y);
        self.bbox[2] = self.bbox[2].max(x);
        self.bbox[3] = self.bbox[3].max(y);
    }

    fn finish(&self, mask_width: usize) -> Component {
        let n = self.indices.len().max(1) as f64;
        Component {
            pixels: self.indices.clone(),
            bbox: self.bbox,
            centroid: [(self.sum_x / n) as f32, (self.sum_y / n) as f32],
            mask_width,
        }
    }
}

/// Label 8-connected ink regions, keeping those with at least `min_pixels`
/// pixels. Regions are returned in raster order of their first pixel.
pub fn label_components(mask: &BinaryMask, min_pixels: usize) -> Vec<Component> {
    let (w, h) = (mask.w, mask.h);
    let mut visited = vec![false; w * h];
    let mut stack: Vec<usize> = Vec::new();
    let mut acc = RegionAccumulator::with_capacity(256);
    let mut out = Vec::new();

    for seed in 0..w * h {
        if visited[seed] || mask.data[seed] == 0 {
            continue;
        }
        acc.reset();
        visited[seed] = true;
        stack.push(seed);
        while let Some(idx) = stack.pop() {
            let (x, y) = (idx % w, idx / w);
            acc.push(idx, x, y);
            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    let n = ny * w + nx;
                    if !visited[n] && mask.data[n] != 0 {
                        visited[n] = true;
                        stack.push(n);
                    }
                }
            }
        }
        if acc.indices.len() >= min_pixels {
            out.push(acc.finish(w));
        }
    }
    out
}
