//! Straight line geometry

use crate::metrics;
use crate::polygon::Extent;
use crate::rectangle::image_row;

/// Line segment between two endpoints in render coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    coordinates: [f64; 4],
}

impl LineGeometry {
    /// Create a line from `start` to `end`
    pub fn new(start: [f64; 2], end: [f64; 2]) -> Self {
        Self {
            coordinates: [start[0], start[1], end[0], end[1]],
        }
    }

    /// Endpoints as `[x1, y1, x2, y2]`
    pub fn line_coordinates(&self) -> [f64; 4] {
        self.coordinates
    }

    pub fn start(&self) -> [f64; 2] {
        [self.coordinates[0], self.coordinates[1]]
    }

    pub fn end(&self) -> [f64; 2] {
        [self.coordinates[2], self.coordinates[3]]
    }

    /// X of the visually upper endpoint
    ///
    /// The vertical axis points up, so this is the endpoint with the greater
    /// y. Ties resolve to the start point.
    pub fn upper_endpoint_x(&self) -> f64 {
        let [x1, y1, x2, y2] = self.coordinates;
        if y2 > y1 {
            x2
        } else {
            x1
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.coordinates[0] += dx;
        self.coordinates[1] += dy;
        self.coordinates[2] += dx;
        self.coordinates[3] += dy;
    }

    pub fn extent(&self) -> Extent {
        Extent::of_flat_coordinates(&self.coordinates)
    }

    /// Euclidean length of the segment
    pub fn length(&self) -> f64 {
        metrics::path_length(&self.coordinates)
    }

    /// Display pairs: `X1`, `Y1`, `X2`, `Y2` (Y as image rows)
    pub fn display_coords(&self) -> Vec<(String, String)> {
        let [x1, y1, x2, y2] = self.coordinates;
        vec![
            ("X1".to_string(), format!("{:.1}", x1)),
            ("Y1".to_string(), format!("{:.1}", image_row(y1))),
            ("X2".to_string(), format!("{:.1}", x2)),
            ("Y2".to_string(), format!("{:.1}", image_row(y2))),
        ]
    }
}
