//! Affine transforms
//!
//! Transforms travel between the viewer and the annotation model as OME
//! `AffineTransform` records. Internally they are kept as a flat six
//! coefficient matrix so that translation can be applied in place.

use serde::{Deserialize, Serialize};

/// Schema type written into the `@type` field of transform records
pub const AFFINE_TRANSFORM_TYPE: &str =
    "http://www.openmicroscopy.org/Schemas/OME/2016-06#AffineTransform";

fn default_transform_type() -> String {
    AFFINE_TRANSFORM_TYPE.to_string()
}

/// External affine transform record
///
/// Field names follow the OME model:
/// - `A00`, `A01`, `A10`, `A11` hold scale, rotation and shear
/// - `A02`, `A12` hold the translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    #[serde(rename = "@type", default = "default_transform_type")]
    pub kind: String,
    #[serde(rename = "A00")]
    pub a00: f64,
    #[serde(rename = "A10")]
    pub a10: f64,
    #[serde(rename = "A01")]
    pub a01: f64,
    #[serde(rename = "A11")]
    pub a11: f64,
    #[serde(rename = "A02")]
    pub a02: f64,
    #[serde(rename = "A12")]
    pub a12: f64,
}

impl AffineTransform {
    /// Create a record from coefficients in `[a00, a10, a01, a11, a02, a12]` order
    pub fn from_coefficients(coefficients: [f64; 6]) -> Self {
        let [a00, a10, a01, a11, a02, a12] = coefficients;
        Self {
            kind: default_transform_type(),
            a00,
            a10,
            a01,
            a11,
            a02,
            a12,
        }
    }

    /// Coefficients in `[a00, a10, a01, a11, a02, a12]` order
    pub fn coefficients(&self) -> [f64; 6] {
        [self.a00, self.a10, self.a01, self.a11, self.a02, self.a12]
    }
}

/// Six coefficient affine matrix stored as `[a00, a10, a01, a11, a02, a12]`
///
/// A point `(x, y)` maps to `(a00*x + a01*y + a02, a10*x + a11*y + a12)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix([f64; 6]);

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Create a matrix from its flat coefficients
    pub fn new(coefficients: [f64; 6]) -> Self {
        Self(coefficients)
    }

    /// Convert an external record into a matrix
    ///
    /// Returns `None` when any coefficient is not a finite number; such a
    /// transform is treated as absent.
    pub fn from_record(record: &AffineTransform) -> Option<Self> {
        let coefficients = record.coefficients();
        if coefficients.iter().all(|value| value.is_finite()) {
            Some(Self(coefficients))
        } else {
            log::warn!("ignoring affine transform with non-finite coefficients");
            None
        }
    }

    /// Convert back into the external record shape
    pub fn to_record(&self) -> AffineTransform {
        AffineTransform::from_coefficients(self.0)
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// Add to the translation coefficients in place
    pub fn translate_by(&mut self, dx: f64, dy: f64) {
        self.0[4] += dx;
        self.0[5] += dy;
    }

    /// Map a single point
    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        let [a00, a10, a01, a11, a02, a12] = self.0;
        (a00 * x + a01 * y + a02, a10 * x + a11 * y + a12)
    }

    /// Map flat XY coordinates, returning a new buffer
    ///
    /// A dangling trailing value (odd length buffer) is copied unchanged.
    pub fn apply(&self, flat_coordinates: &[f64]) -> Vec<f64> {
        let mut transformed = Vec::with_capacity(flat_coordinates.len());
        let mut pairs = flat_coordinates.chunks_exact(2);
        for pair in &mut pairs {
            let (x, y) = self.apply_point(pair[0], pair[1]);
            transformed.push(x);
            transformed.push(y);
        }
        transformed.extend_from_slice(pairs.remainder());
        transformed
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_leaves_points_unchanged() {
        let coords = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(AffineMatrix::IDENTITY.apply(&coords), coords);
    }

    #[test]
    fn test_apply_scale_and_translation() {
        let matrix = AffineMatrix::new([2.0, 0.0, 0.0, 3.0, 10.0, -5.0]);
        assert_eq!(matrix.apply_point(1.0, 1.0), (12.0, -2.0));
    }

    #[test]
    fn test_apply_uses_off_diagonal_terms() {
        // 90 degree rotation: (x, y) -> (-y, x)
        let matrix = AffineMatrix::new([0.0, 1.0, -1.0, 0.0, 0.0, 0.0]);
        assert_eq!(matrix.apply_point(2.0, 5.0), (-5.0, 2.0));
    }

    #[test]
    fn test_record_round_trip_is_positional() {
        let record = AffineTransform::from_coefficients([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(record.a00, 1.0);
        assert_eq!(record.a10, 2.0);
        assert_eq!(record.a01, 3.0);
        assert_eq!(record.a11, 4.0);
        assert_eq!(record.a02, 5.0);
        assert_eq!(record.a12, 6.0);

        let matrix = AffineMatrix::from_record(&record).unwrap();
        assert_eq!(matrix.to_record(), record);
    }

    #[test]
    fn test_non_finite_record_is_rejected() {
        let record = AffineTransform::from_coefficients([1.0, 0.0, 0.0, f64::NAN, 0.0, 0.0]);
        assert!(AffineMatrix::from_record(&record).is_none());
    }

    #[test]
    fn test_record_json_uses_ome_field_names() {
        let json = r#"{
            "@type": "http://www.openmicroscopy.org/Schemas/OME/2016-06#AffineTransform",
            "A00": 1.0, "A10": 0.0, "A01": 0.0, "A11": 1.0, "A02": 5.0, "A12": 5.0
        }"#;
        let record: AffineTransform = serde_json::from_str(json).unwrap();
        assert_eq!(record.coefficients(), [1.0, 0.0, 0.0, 1.0, 5.0, 5.0]);
        assert_eq!(record.kind, AFFINE_TRANSFORM_TYPE);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["@type"], AFFINE_TRANSFORM_TYPE);
        assert_eq!(value["A02"], 5.0);
    }

    #[test]
    fn test_missing_type_defaults_to_ome_uri() {
        let json = r#"{"A00": 1, "A10": 0, "A01": 0, "A11": 1, "A02": 0, "A12": 0}"#;
        let record: AffineTransform = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, AFFINE_TRANSFORM_TYPE);
    }

    #[test]
    fn test_odd_buffer_keeps_remainder() {
        let matrix = AffineMatrix::new([1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(matrix.apply(&[0.0, 0.0, 7.0]), vec![1.0, 1.0, 7.0]);
    }
}
