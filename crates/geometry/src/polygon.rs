//! Generic polygon primitive
//!
//! A single closed ring stored as flat XY coordinates. Rectangles and other
//! shape kinds are built on top of this by composition.

/// Axis-aligned bounding box in render coordinates
///
/// The vertical axis points up, so the top edge is `max_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Compute the extent of flat XY coordinates
    ///
    /// An empty buffer yields a zero extent at the origin.
    pub fn of_flat_coordinates(flat_coordinates: &[f64]) -> Self {
        let mut points = flat_coordinates.chunks_exact(2);
        let Some(first) = points.next() else {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        };

        let mut extent = Self::new(first[0], first[1], first[0], first[1]);
        for point in points {
            extent.min_x = extent.min_x.min(point[0]);
            extent.min_y = extent.min_y.min(point[1]);
            extent.max_x = extent.max_x.max(point[0]);
            extent.max_y = extent.max_y.max(point[1]);
        }
        extent
    }

    pub fn top_left(&self) -> [f64; 2] {
        [self.min_x, self.max_y]
    }

    pub fn top_right(&self) -> [f64; 2] {
        [self.max_x, self.max_y]
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Closed ring of XY coordinates
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    flat_coordinates: Vec<f64>,
}

impl Polygon {
    /// Create a polygon from ring points
    pub fn new(ring: &[[f64; 2]]) -> Self {
        Self {
            flat_coordinates: ring.iter().flat_map(|point| *point).collect(),
        }
    }

    /// Get the flat XY coordinates
    pub fn flat_coordinates(&self) -> &[f64] {
        &self.flat_coordinates
    }

    /// Replace the ring
    pub fn set_flat_coordinates(&mut self, flat_coordinates: Vec<f64>) {
        self.flat_coordinates = flat_coordinates;
    }

    /// Iterate over the ring points
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.flat_coordinates
            .chunks_exact(2)
            .map(|pair| [pair[0], pair[1]])
    }

    /// Number of points in the ring (closing point included)
    pub fn point_count(&self) -> usize {
        self.flat_coordinates.len() / 2
    }

    /// Move every point by `(dx, dy)`
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for pair in self.flat_coordinates.chunks_exact_mut(2) {
            pair[0] += dx;
            pair[1] += dy;
        }
    }

    /// Get the bounding box
    pub fn extent(&self) -> Extent {
        Extent::of_flat_coordinates(&self.flat_coordinates)
    }
}
