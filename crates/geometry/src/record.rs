//! Serializable geometry records
//!
//! Records mirror the OME ROI JSON layout (`@type` tag, capitalised field
//! names). Numeric fields are lenient: a value that is missing or not a
//! number deserializes to `None` and the geometry constructors apply their
//! usual defaults.

use crate::line::LineGeometry;
use crate::polygon::Polygon;
use crate::rectangle::RectangleGeometry;
use crate::shape::ShapeGeometry;
use crate::transform::AffineTransform;
use serde::{Deserialize, Deserializer, Serialize};

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Rectangle record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RectangleRecord {
    #[serde(rename = "X", default, deserialize_with = "lenient_f64")]
    pub x: Option<f64>,
    #[serde(rename = "Y", default, deserialize_with = "lenient_f64")]
    pub y: Option<f64>,
    #[serde(rename = "Width", default, deserialize_with = "lenient_f64")]
    pub width: Option<f64>,
    #[serde(rename = "Height", default, deserialize_with = "lenient_f64")]
    pub height: Option<f64>,
    #[serde(rename = "Transform", default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<AffineTransform>,
}

impl From<&RectangleGeometry> for RectangleRecord {
    fn from(rectangle: &RectangleGeometry) -> Self {
        let corner = rectangle.upper_left_corner();
        Self {
            x: corner.map(|c| c[0]),
            y: corner.map(|c| c[1]),
            width: Some(rectangle.width()),
            height: Some(rectangle.height()),
            transform: rectangle.transform(),
        }
    }
}

/// Line record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    #[serde(rename = "X1", default, deserialize_with = "lenient_f64")]
    pub x1: Option<f64>,
    #[serde(rename = "Y1", default, deserialize_with = "lenient_f64")]
    pub y1: Option<f64>,
    #[serde(rename = "X2", default, deserialize_with = "lenient_f64")]
    pub x2: Option<f64>,
    #[serde(rename = "Y2", default, deserialize_with = "lenient_f64")]
    pub y2: Option<f64>,
}

/// Polygon record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonRecord {
    #[serde(rename = "Points", default)]
    pub points: Vec<[f64; 2]>,
}

/// Geometry record tagged by `@type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum GeometryRecord {
    Rectangle(RectangleRecord),
    Line(LineRecord),
    Polygon(PolygonRecord),
}

impl GeometryRecord {
    /// Build the geometry described by this record
    pub fn to_geometry(&self) -> ShapeGeometry {
        match self {
            GeometryRecord::Rectangle(record) => {
                ShapeGeometry::Rectangle(RectangleGeometry::from_record(record))
            }
            GeometryRecord::Line(record) => {
                let value = |v: Option<f64>| v.filter(|v| v.is_finite()).unwrap_or(0.0);
                ShapeGeometry::Line(LineGeometry::new(
                    [value(record.x1), value(record.y1)],
                    [value(record.x2), value(record.y2)],
                ))
            }
            GeometryRecord::Polygon(record) => ShapeGeometry::Polygon(Polygon::new(&record.points)),
        }
    }
}

impl From<&ShapeGeometry> for GeometryRecord {
    fn from(geometry: &ShapeGeometry) -> Self {
        match geometry {
            ShapeGeometry::Rectangle(rectangle) => GeometryRecord::Rectangle(rectangle.into()),
            ShapeGeometry::Line(line) => {
                let [x1, y1, x2, y2] = line.line_coordinates();
                GeometryRecord::Line(LineRecord {
                    x1: Some(x1),
                    y1: Some(y1),
                    x2: Some(x2),
                    y2: Some(y2),
                })
            }
            ShapeGeometry::Polygon(polygon) => GeometryRecord::Polygon(PolygonRecord {
                points: polygon.points().collect(),
            }),
        }
    }
}
