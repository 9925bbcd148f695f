//! Rectangle geometry with an optional affine transform
//!
//! A rectangle is represented by its canonical ring, built from the upper
//! left corner, width and height:
//!
//! ```text
//! (x, y) ---------- (x+w, y)
//!   |                  |
//! (x, y-h) -------- (x+w, y-h)
//! ```
//!
//! The vertical axis points up, so the bottom edge sits at `y - h`. When a
//! transform is present the rendered ring is `transform(canonical)`; width,
//! height and corner queries always read the canonical ring.

use crate::metrics;
use crate::polygon::{Extent, Polygon};
use crate::record::RectangleRecord;
use crate::transform::{AffineMatrix, AffineTransform};

/// Number of flat values in a closed five point ring
const RING_LEN: usize = 10;

/// Axis-aligned rectangle in canonical space, optionally transformed
#[derive(Debug, PartialEq)]
pub struct RectangleGeometry {
    /// Untransformed ring, source of truth for dimension queries
    canonical: Vec<f64>,

    /// Ring after applying the transform
    rendered: Polygon,

    /// Transform matrix, `None` means identity
    transform: Option<AffineMatrix>,
}

impl RectangleGeometry {
    /// Create a rectangle from its upper left corner and dimensions
    ///
    /// Inputs are coerced rather than rejected: a non-finite `x`/`y` becomes
    /// `0`, a non-finite or non-positive `w`/`h` becomes `1`, as does a
    /// dimension whose far edge (`x + w`, `y - h`) would overflow. A transform
    /// with non-finite coefficients is ignored.
    pub fn new(x: f64, y: f64, w: f64, h: f64, transform: Option<&AffineTransform>) -> Self {
        Self::from_parts(Some(x), Some(y), Some(w), Some(h), transform)
    }

    /// Create a rectangle from an external record
    ///
    /// Missing or non-numeric fields follow the same coercion as [`Self::new`].
    pub fn from_record(record: &RectangleRecord) -> Self {
        Self::from_parts(
            record.x,
            record.y,
            record.width,
            record.height,
            record.transform.as_ref(),
        )
    }

    fn from_parts(
        x: Option<f64>,
        y: Option<f64>,
        w: Option<f64>,
        h: Option<f64>,
        transform: Option<&AffineTransform>,
    ) -> Self {
        let x = sanitize_position(x);
        let y = sanitize_position(y);
        let w = fit_dimension(x, 1.0, [sanitize_dimension(w)]);
        let h = fit_dimension(y, -1.0, [sanitize_dimension(h)]);

        let transform = transform.and_then(AffineMatrix::from_record);
        let mut rectangle = Self {
            canonical: Vec::new(),
            rendered: Polygon::default(),
            transform,
        };
        rectangle.set_canonical(ring(x, y, w, h));
        rectangle
    }

    /// Gets the upper left corner as `[x, y]`
    ///
    /// Returns `None` if the coordinate buffer is corrupted.
    pub fn upper_left_corner(&self) -> Option<[f64; 2]> {
        let coords = self.rectangle_coordinates();
        if coords.len() != RING_LEN {
            return None;
        }
        Some([coords[0], coords[1]])
    }

    /// Moves the upper left corner, keeping width and height
    pub fn set_upper_left_corner(&mut self, corner: [f64; 2]) {
        self.change_rectangle(Some(corner[0]), Some(corner[1]), None, None);
    }

    /// Gets the width, `0` on a corrupted buffer
    pub fn width(&self) -> f64 {
        let coords = self.rectangle_coordinates();
        if coords.len() != RING_LEN {
            return 0.0;
        }
        coords[2] - coords[0]
    }

    pub fn set_width(&mut self, width: f64) {
        self.change_rectangle(None, None, Some(width), None);
    }

    /// Gets the height, `0` on a corrupted buffer
    pub fn height(&self) -> f64 {
        let coords = self.rectangle_coordinates();
        if coords.len() != RING_LEN {
            return 0.0;
        }
        (coords[5] - coords[3]).abs()
    }

    pub fn set_height(&mut self, height: f64) {
        self.change_rectangle(None, None, None, Some(height));
    }

    /// Rebuild the rectangle from merged values
    ///
    /// Omitted values keep the rectangle's current value. Supplied values that
    /// are non-finite, and dimensions that are not positive, are treated as
    /// omitted. A dimension whose far edge would overflow keeps its current
    /// value, or `1` if that overflows too. The rendered ring is recomputed
    /// through the transform.
    pub fn change_rectangle(
        &mut self,
        x: Option<f64>,
        y: Option<f64>,
        w: Option<f64>,
        h: Option<f64>,
    ) {
        let Some([current_x, current_y]) = self.upper_left_corner() else {
            log::warn!("rectangle coordinate buffer is corrupted, ignoring change");
            return;
        };

        let x = x.filter(|v| v.is_finite()).unwrap_or(current_x);
        let y = y.filter(|v| v.is_finite()).unwrap_or(current_y);
        let valid = |v: &f64| v.is_finite() && *v > 0.0;
        let (current_w, current_h) = (self.width(), self.height());
        let w = fit_dimension(x, 1.0, [w.filter(valid).unwrap_or(current_w), current_w]);
        let h = fit_dimension(y, -1.0, [h.filter(valid).unwrap_or(current_h), current_h]);

        self.set_canonical(ring(x, y, w, h));
    }

    /// Move the rectangle by `(dx, dy)`
    ///
    /// With a transform only its translation changes (`a02 += dx`,
    /// `a12 -= dy`) and the rendered ring is recomputed; the canonical ring is
    /// left alone. Without a transform both rings move together.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self.transform.as_mut() {
            Some(matrix) => {
                matrix.translate_by(dx, -dy);
                let rendered = matrix.apply(&self.canonical);
                self.rendered.set_flat_coordinates(rendered);
            }
            None => {
                self.rendered.translate(dx, dy);
                self.canonical = self.rendered.flat_coordinates().to_vec();
            }
        }
    }

    /// Turn the transform back into the external record
    pub fn transform(&self) -> Option<AffineTransform> {
        self.transform.as_ref().map(AffineMatrix::to_record)
    }

    /// Coordinates used for dimension queries
    ///
    /// The canonical ring when a transform is present, otherwise the rendered
    /// ring (the two coincide).
    pub fn rectangle_coordinates(&self) -> &[f64] {
        if self.transform.is_some() {
            &self.canonical
        } else {
            self.rendered.flat_coordinates()
        }
    }

    /// Untransformed ring
    pub fn canonical_coordinates(&self) -> &[f64] {
        &self.canonical
    }

    /// Ring as drawn on screen
    pub fn render_coordinates(&self) -> &[f64] {
        self.rendered.flat_coordinates()
    }

    /// Bounding box of the rendered ring
    pub fn extent(&self) -> Extent {
        self.rendered.extent()
    }

    /// Perimeter of the rendered ring
    pub fn length(&self) -> f64 {
        metrics::perimeter(self.render_coordinates())
    }

    /// Display pairs: `X`, `Y` (image row), `Width`, `Height`
    pub fn display_coords(&self) -> Vec<(String, String)> {
        let [x, y] = self.upper_left_corner().unwrap_or([0.0, 0.0]);
        vec![
            ("X".to_string(), format!("{:.1}", x)),
            ("Y".to_string(), format!("{:.1}", image_row(y))),
            ("Width".to_string(), format!("{:.1}", self.width())),
            ("Height".to_string(), format!("{:.1}", self.height())),
        ]
    }

    fn set_canonical(&mut self, canonical: Vec<f64>) {
        let rendered = match &self.transform {
            Some(matrix) => matrix.apply(&canonical),
            None => canonical.clone(),
        };
        self.canonical = canonical;
        self.rendered.set_flat_coordinates(rendered);
    }
}

impl Clone for RectangleGeometry {
    /// Rebuilds a fresh rectangle from the current corner, dimensions and
    /// transform
    fn clone(&self) -> Self {
        let [x, y] = self.upper_left_corner().unwrap_or([0.0, 0.0]);
        let transform = self.transform();
        Self::new(x, y, self.width(), self.height(), transform.as_ref())
    }
}

fn ring(x: f64, y: f64, w: f64, h: f64) -> Vec<f64> {
    vec![x, y, x + w, y, x + w, y - h, x, y - h, x, y]
}

fn sanitize_position(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// First positive candidate that keeps the far edge `origin + direction * d`
/// finite, falling back to `1`
fn fit_dimension<const N: usize>(origin: f64, direction: f64, candidates: [f64; N]) -> f64 {
    candidates
        .into_iter()
        .find(|d| *d > 0.0 && (origin + direction * d).is_finite())
        .unwrap_or(1.0)
}

fn sanitize_dimension(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 1.0,
    }
}

/// Image row for a vertical coordinate (rows grow downwards)
pub(crate) fn image_row(y: f64) -> f64 {
    if y == 0.0 {
        0.0
    } else {
        -y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation_only(dx: f64, dy: f64) -> AffineTransform {
        AffineTransform::from_coefficients([1.0, 0.0, 0.0, 1.0, dx, dy])
    }

    #[test]
    fn test_canonical_ring_layout() {
        let rectangle = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, None);
        assert_eq!(
            rectangle.canonical_coordinates(),
            &[10.0, 20.0, 40.0, 20.0, 40.0, -20.0, 10.0, -20.0, 10.0, 20.0]
        );
        assert_eq!(rectangle.width(), 30.0);
        assert_eq!(rectangle.height(), 40.0);
        assert_eq!(rectangle.upper_left_corner(), Some([10.0, 20.0]));
    }

    #[test]
    fn test_dimensions_round_trip() {
        for &(x, y, w, h) in &[
            (0.0, 0.0, 1.0, 1.0),
            (-5.5, 3.25, 0.5, 100.0),
            (1000.0, -2000.0, 12.0, 7.0),
        ] {
            let rectangle = RectangleGeometry::new(x, y, w, h, None);
            assert_eq!(rectangle.width(), w);
            assert_eq!(rectangle.height(), h);
            assert_eq!(rectangle.upper_left_corner(), Some([x, y]));
        }
    }

    #[test]
    fn test_invalid_dimensions_coerce_to_one() {
        let rectangle = RectangleGeometry::new(0.0, 0.0, -3.0, 0.0, None);
        assert_eq!(rectangle.width(), 1.0);
        assert_eq!(rectangle.height(), 1.0);

        let rectangle = RectangleGeometry::new(0.0, 0.0, f64::NAN, f64::INFINITY, None);
        assert_eq!(rectangle.width(), 1.0);
        assert_eq!(rectangle.height(), 1.0);
    }

    #[test]
    fn test_invalid_position_coerces_to_zero() {
        let rectangle = RectangleGeometry::new(f64::NAN, f64::NEG_INFINITY, 5.0, 5.0, None);
        assert_eq!(rectangle.upper_left_corner(), Some([0.0, 0.0]));
    }

    #[test]
    fn test_render_equals_canonical_without_transform() {
        let rectangle = RectangleGeometry::new(1.0, 2.0, 3.0, 4.0, None);
        assert_eq!(
            rectangle.render_coordinates(),
            rectangle.canonical_coordinates()
        );
        assert!(rectangle.transform().is_none());
    }

    #[test]
    fn test_render_applies_transform() {
        let transform = translation_only(5.0, 5.0);
        let rectangle = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, Some(&transform));
        assert_eq!(
            rectangle.render_coordinates(),
            &[15.0, 25.0, 45.0, 25.0, 45.0, -15.0, 15.0, -15.0, 15.0, 25.0]
        );
        // Dimension queries read the canonical ring
        assert_eq!(rectangle.upper_left_corner(), Some([10.0, 20.0]));
    }

    #[test]
    fn test_transform_round_trip() {
        let transform = AffineTransform::from_coefficients([0.5, 0.25, -0.25, 0.5, 12.0, -7.0]);
        let rectangle = RectangleGeometry::new(0.0, 0.0, 10.0, 10.0, Some(&transform));
        assert_eq!(rectangle.transform(), Some(transform));
    }

    #[test]
    fn test_translate_with_transform_shifts_translation_only() {
        let transform = translation_only(5.0, 5.0);
        let mut rectangle = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, Some(&transform));
        let canonical_before = rectangle.canonical_coordinates().to_vec();

        rectangle.translate(2.0, 3.0);

        let record = rectangle.transform().unwrap();
        assert_eq!(record.coefficients(), [1.0, 0.0, 0.0, 1.0, 7.0, 2.0]);
        assert_eq!(rectangle.canonical_coordinates(), canonical_before.as_slice());
        assert_eq!(
            rectangle.render_coordinates(),
            &[17.0, 22.0, 47.0, 22.0, 47.0, -18.0, 17.0, -18.0, 17.0, 22.0]
        );
    }

    #[test]
    fn test_repeated_translations_accumulate() {
        let transform = AffineTransform::from_coefficients([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        let mut rectangle = RectangleGeometry::new(0.0, 0.0, 1.0, 1.0, Some(&transform));
        for _ in 0..4 {
            rectangle.translate(1.5, 0.5);
        }
        let record = rectangle.transform().unwrap();
        assert_eq!(record.a02, 6.0);
        assert_eq!(record.a12, -2.0);
        assert_eq!(record.a00, 2.0);
        assert_eq!(record.a11, 2.0);
    }

    #[test]
    fn test_translate_without_transform_moves_ring() {
        let mut rectangle = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, None);
        rectangle.translate(2.0, 3.0);
        assert_eq!(rectangle.upper_left_corner(), Some([12.0, 23.0]));
        assert_eq!(rectangle.width(), 30.0);
        assert_eq!(rectangle.height(), 40.0);
        assert_eq!(
            rectangle.render_coordinates(),
            rectangle.canonical_coordinates()
        );
    }

    #[test]
    fn test_set_width_keeps_height() {
        let mut rectangle = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, None);
        rectangle.set_width(55.0);
        assert_eq!(rectangle.width(), 55.0);
        assert_eq!(rectangle.height(), 40.0);
        assert_eq!(rectangle.upper_left_corner(), Some([10.0, 20.0]));
    }

    #[test]
    fn test_set_height_keeps_width() {
        let mut rectangle = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, None);
        rectangle.set_height(8.0);
        assert_eq!(rectangle.height(), 8.0);
        assert_eq!(rectangle.width(), 30.0);
    }

    #[test]
    fn test_set_upper_left_corner_keeps_dimensions() {
        let transform = translation_only(1.0, 1.0);
        let mut rectangle = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, Some(&transform));
        rectangle.set_upper_left_corner([-4.0, 6.0]);
        assert_eq!(rectangle.upper_left_corner(), Some([-4.0, 6.0]));
        assert_eq!(rectangle.width(), 30.0);
        assert_eq!(rectangle.height(), 40.0);
        // Rendered ring follows the new canonical ring through the transform
        assert_eq!(&rectangle.render_coordinates()[..2], &[-3.0, 7.0]);
    }

    #[test]
    fn test_change_rectangle_ignores_invalid_values() {
        let mut rectangle = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, None);
        rectangle.change_rectangle(Some(f64::NAN), None, Some(-2.0), Some(0.0));
        assert_eq!(rectangle.upper_left_corner(), Some([10.0, 20.0]));
        assert_eq!(rectangle.width(), 30.0);
        assert_eq!(rectangle.height(), 40.0);
    }

    #[test]
    fn test_overflowing_dimensions_keep_ring_finite() {
        let rectangle = RectangleGeometry::new(f64::MAX, -f64::MAX, f64::MAX, f64::MAX, None);
        assert!(rectangle.canonical_coordinates().iter().all(|v| v.is_finite()));
        assert!(rectangle.width().is_finite());
        assert!(rectangle.height().is_finite());

        let rectangle = RectangleGeometry::new(0.0, 0.0, f64::MAX, f64::MAX, None);
        assert_eq!(rectangle.width(), f64::MAX);
        assert_eq!(rectangle.height(), f64::MAX);
    }

    #[test]
    fn test_change_rectangle_rejects_overflowing_dimensions() {
        let mut rectangle = RectangleGeometry::new(1e308, -1e308, 2.0, 3.0, None);
        rectangle.change_rectangle(None, None, Some(f64::MAX), Some(f64::MAX));
        assert!(rectangle.render_coordinates().iter().all(|v| v.is_finite()));
        assert_eq!(rectangle.upper_left_corner(), Some([1e308, -1e308]));

        let mut rectangle = RectangleGeometry::new(0.0, 0.0, 1e308, 1e308, None);
        rectangle.set_upper_left_corner([f64::MAX, -f64::MAX]);
        assert!(rectangle.render_coordinates().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_corrupted_buffer_returns_sentinels() {
        let transform = translation_only(0.0, 0.0);
        let mut rectangle = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, Some(&transform));
        rectangle.canonical.truncate(7);

        assert_eq!(rectangle.upper_left_corner(), None);
        assert_eq!(rectangle.width(), 0.0);
        assert_eq!(rectangle.height(), 0.0);

        rectangle.set_width(3.0);
        assert_eq!(rectangle.canonical_coordinates().len(), 7);
    }

    #[test]
    fn test_clone_is_independent() {
        let transform = translation_only(5.0, 5.0);
        let original = RectangleGeometry::new(10.0, 20.0, 30.0, 40.0, Some(&transform));
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.set_width(99.0);
        copy.translate(1.0, 1.0);
        assert_eq!(original.width(), 30.0);
        assert_eq!(original.transform(), Some(transform));
        assert_eq!(copy.width(), 99.0);
    }

    #[test]
    fn test_length_is_perimeter() {
        let rectangle = RectangleGeometry::new(0.0, 0.0, 30.0, 40.0, None);
        assert!((rectangle.length() - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_coords() {
        let rectangle = RectangleGeometry::new(10.0, -20.0, 30.0, 40.5, None);
        let pairs = rectangle.display_coords();
        assert_eq!(
            pairs,
            vec![
                ("X".to_string(), "10.0".to_string()),
                ("Y".to_string(), "20.0".to_string()),
                ("Width".to_string(), "30.0".to_string()),
                ("Height".to_string(), "40.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_record_applies_coercion() {
        let record = RectangleRecord {
            x: None,
            y: Some(4.0),
            width: Some(-1.0),
            height: Some(2.0),
            transform: None,
        };
        let rectangle = RectangleGeometry::from_record(&record);
        assert_eq!(rectangle.upper_left_corner(), Some([0.0, 4.0]));
        assert_eq!(rectangle.width(), 1.0);
        assert_eq!(rectangle.height(), 2.0);
    }
}
