//! Shape geometry tagged by kind

use crate::line::LineGeometry;
use crate::polygon::{Extent, Polygon};
use crate::rectangle::RectangleGeometry;
use serde::{Deserialize, Serialize};

/// Kind of a shape geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Line,
    Polygon,
}

/// Geometry of an annotation
///
/// Callers that need kind specific behaviour match on the variant or on
/// [`ShapeGeometry::kind`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Rectangle(RectangleGeometry),
    Line(LineGeometry),
    Polygon(Polygon),
}

impl ShapeGeometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Rectangle(_) => ShapeKind::Rectangle,
            ShapeGeometry::Line(_) => ShapeKind::Line,
            ShapeGeometry::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Bounding box of the rendered geometry
    pub fn extent(&self) -> Extent {
        match self {
            ShapeGeometry::Rectangle(rectangle) => rectangle.extent(),
            ShapeGeometry::Line(line) => line.extent(),
            ShapeGeometry::Polygon(polygon) => polygon.extent(),
        }
    }

    /// Key/value pairs shown in the annotation panel
    ///
    /// Generic polygons have no display coordinates.
    pub fn display_coords(&self) -> Vec<(String, String)> {
        match self {
            ShapeGeometry::Rectangle(rectangle) => rectangle.display_coords(),
            ShapeGeometry::Line(line) => line.display_coords(),
            ShapeGeometry::Polygon(_) => Vec::new(),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            ShapeGeometry::Rectangle(rectangle) => rectangle.translate(dx, dy),
            ShapeGeometry::Line(line) => line.translate(dx, dy),
            ShapeGeometry::Polygon(polygon) => polygon.translate(dx, dy),
        }
    }

    pub fn as_rectangle(&self) -> Option<&RectangleGeometry> {
        match self {
            ShapeGeometry::Rectangle(rectangle) => Some(rectangle),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineGeometry> {
        match self {
            ShapeGeometry::Line(line) => Some(line),
            _ => None,
        }
    }
}

impl From<RectangleGeometry> for ShapeGeometry {
    fn from(rectangle: RectangleGeometry) -> Self {
        ShapeGeometry::Rectangle(rectangle)
    }
}

impl From<LineGeometry> for ShapeGeometry {
    fn from(line: LineGeometry) -> Self {
        ShapeGeometry::Line(line)
    }
}

impl From<Polygon> for ShapeGeometry {
    fn from(polygon: Polygon) -> Self {
        ShapeGeometry::Polygon(polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        let rectangle: ShapeGeometry = RectangleGeometry::new(0.0, 0.0, 1.0, 1.0, None).into();
        let line: ShapeGeometry = LineGeometry::new([0.0, 0.0], [1.0, 1.0]).into();
        let polygon: ShapeGeometry = Polygon::new(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).into();

        assert_eq!(rectangle.kind(), ShapeKind::Rectangle);
        assert_eq!(line.kind(), ShapeKind::Line);
        assert_eq!(polygon.kind(), ShapeKind::Polygon);
        assert!(rectangle.as_rectangle().is_some());
        assert!(line.as_line().is_some());
        assert!(polygon.as_rectangle().is_none());
    }

    #[test]
    fn test_translate_dispatches_to_rectangle_rules() {
        let mut geometry: ShapeGeometry = RectangleGeometry::new(0.0, 0.0, 2.0, 2.0, None).into();
        geometry.translate(3.0, 4.0);
        let rectangle = geometry.as_rectangle().unwrap();
        assert_eq!(rectangle.upper_left_corner(), Some([3.0, 4.0]));
    }

    #[test]
    fn test_polygon_has_no_display_coords() {
        let geometry: ShapeGeometry = Polygon::new(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).into();
        assert!(geometry.display_coords().is_empty());
    }
}
