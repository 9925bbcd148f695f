//! Length and area measurements for shapes
//!
//! Values are computed on rendered coordinates (so a scaling transform is
//! reflected in the result) and optionally converted into calibrated units
//! with the image pixel size.

use crate::shape::ShapeGeometry;
use serde::Serialize;

/// Kind of measurement reported for a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Enclosed area of a closed shape
    Area,
    /// Path length of an open shape
    Length,
}

impl MetricKind {
    /// Display name used in labels
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Area => "Area",
            MetricKind::Length => "Length",
        }
    }
}

/// Measured values of a shape
///
/// A metric that does not apply to the shape kind is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ShapeMetrics {
    #[serde(rename = "Area", skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(rename = "Length", skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

impl ShapeMetrics {
    /// Present metrics, area first
    pub fn entries(&self) -> Vec<(MetricKind, f64)> {
        let mut entries = Vec::with_capacity(2);
        if let Some(area) = self.area {
            entries.push((MetricKind::Area, area));
        }
        if let Some(length) = self.length {
            entries.push((MetricKind::Length, length));
        }
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.area.is_none() && self.length.is_none()
    }
}

/// Measure a shape
///
/// Closed shapes report their area, lines their length. `pixel_size` is the
/// calibrated size of one pixel; lengths scale by it and areas by its square.
/// Results are rounded to two decimals.
pub fn measure(geometry: &ShapeGeometry, pixel_size: Option<f64>) -> ShapeMetrics {
    let scale = pixel_size
        .filter(|size| size.is_finite() && *size > 0.0)
        .unwrap_or(1.0);

    match geometry {
        ShapeGeometry::Rectangle(rectangle) => ShapeMetrics {
            area: Some(round2(ring_area(rectangle.render_coordinates()) * scale * scale)),
            length: None,
        },
        ShapeGeometry::Polygon(polygon) => ShapeMetrics {
            area: Some(round2(ring_area(polygon.flat_coordinates()) * scale * scale)),
            length: None,
        },
        ShapeGeometry::Line(line) => ShapeMetrics {
            area: None,
            length: Some(round2(path_length(&line.line_coordinates()) * scale)),
        },
    }
}

/// Enclosed area of a ring (shoelace formula, absolute value)
pub fn ring_area(flat_coordinates: &[f64]) -> f64 {
    let points: Vec<&[f64]> = flat_coordinates.chunks_exact(2).collect();
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    for i in 0..points.len() {
        let current = points[i];
        let next = points[(i + 1) % points.len()];
        twice_area += current[0] * next[1] - next[0] * current[1];
    }
    (twice_area / 2.0).abs()
}

/// Length of an open path
pub fn path_length(flat_coordinates: &[f64]) -> f64 {
    flat_coordinates
        .chunks_exact(2)
        .collect::<Vec<_>>()
        .windows(2)
        .map(|segment| {
            let dx = segment[1][0] - segment[0][0];
            let dy = segment[1][1] - segment[0][1];
            (dx * dx + dy * dy).sqrt()
        })
        .sum()
}

/// Perimeter of a ring
///
/// The closing segment is added when the ring is not explicitly closed.
pub fn perimeter(flat_coordinates: &[f64]) -> f64 {
    let mut length = path_length(flat_coordinates);
    let n = flat_coordinates.len();
    if n >= 4 {
        let (first_x, first_y) = (flat_coordinates[0], flat_coordinates[1]);
        let (last_x, last_y) = (flat_coordinates[n - 2], flat_coordinates[n - 1]);
        if first_x != last_x || first_y != last_y {
            let dx = first_x - last_x;
            let dy = first_y - last_y;
            length += (dx * dx + dy * dy).sqrt();
        }
    }
    length
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::LineGeometry;
    use crate::polygon::Polygon;
    use crate::rectangle::RectangleGeometry;
    use crate::transform::AffineTransform;

    #[test]
    fn test_rectangle_area() {
        let geometry = ShapeGeometry::Rectangle(RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, None));
        let metrics = measure(&geometry, None);
        assert_eq!(metrics.area, Some(1200.0));
        assert_eq!(metrics.length, None);
    }

    #[test]
    fn test_rectangle_area_reflects_scaling_transform() {
        let transform = AffineTransform::from_coefficients([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        let geometry = ShapeGeometry::Rectangle(RectangleGeometry::new(
            0.0,
            0.0,
            10.0,
            10.0,
            Some(&transform),
        ));
        assert_eq!(measure(&geometry, None).area, Some(400.0));
    }

    #[test]
    fn test_line_length_is_calibrated() {
        let geometry = ShapeGeometry::Line(LineGeometry::new([0.0, 0.0], [3.0, 4.0]));
        let metrics = measure(&geometry, Some(0.5));
        assert_eq!(metrics.length, Some(2.5));
        assert_eq!(metrics.area, None);
    }

    #[test]
    fn test_area_is_calibrated_by_square_and_rounded() {
        let geometry = ShapeGeometry::Polygon(Polygon::new(&[
            [0.0, 0.0],
            [3.0, 0.0],
            [3.0, 3.0],
            [0.0, 3.0],
            [0.0, 0.0],
        ]));
        let metrics = measure(&geometry, Some(0.333));
        // 9 * 0.333^2 = 0.998001
        assert_eq!(metrics.area, Some(1.0));
    }

    #[test]
    fn test_invalid_pixel_size_is_ignored() {
        let geometry = ShapeGeometry::Line(LineGeometry::new([0.0, 0.0], [0.0, 10.0]));
        assert_eq!(measure(&geometry, Some(-1.0)).length, Some(10.0));
        assert_eq!(measure(&geometry, Some(f64::NAN)).length, Some(10.0));
    }

    #[test]
    fn test_perimeter_closes_open_ring() {
        let open = [0.0, 0.0, 4.0, 0.0, 4.0, 3.0];
        assert!((perimeter(&open) - 12.0).abs() < 1e-9);

        let closed = [0.0, 0.0, 4.0, 0.0, 4.0, 3.0, 0.0, 0.0];
        assert!((perimeter(&closed) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_entries_order() {
        let metrics = ShapeMetrics {
            area: Some(2.0),
            length: Some(1.0),
        };
        let entries = metrics.entries();
        assert_eq!(entries[0], (MetricKind::Area, 2.0));
        assert_eq!(entries[1], (MetricKind::Length, 1.0));
        assert!(ShapeMetrics::default().is_empty());
    }
}
