//! ROI geometry library
//!
//! Geometry model for region-of-interest annotations drawn over microscopy
//! images. Shapes keep a canonical (untransformed) representation and an
//! optional affine transform that produces the rendered coordinates.

pub mod line;
pub mod metrics;
pub mod polygon;
pub mod record;
pub mod rectangle;
pub mod shape;
pub mod transform;

pub use line::LineGeometry;
pub use metrics::{MetricKind, ShapeMetrics};
pub use polygon::{Extent, Polygon};
pub use record::{GeometryRecord, LineRecord, PolygonRecord, RectangleRecord};
pub use rectangle::RectangleGeometry;
pub use shape::{ShapeGeometry, ShapeKind};
pub use transform::{AffineMatrix, AffineTransform, AFFINE_TRANSFORM_TYPE};
