//! Region shapes and the collection the panel reads them from
//!
//! The controller never owns shapes. It talks to a [`RegionsCollection`],
//! which resolves ids, answers visibility questions and computes metrics.
//! [`Regions`] is the in-memory implementation used by the command line
//! tool and the tests.

use crate::error::RegionsError;
use roi_geometry::{metrics, GeometryRecord, ShapeGeometry, ShapeMetrics};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable identifier of a shape
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Label drawn next to a shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    pub text: String,
}

impl TextStyle {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Per-shape permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(rename = "canEdit", default = "default_true")]
    pub can_edit: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self { can_edit: true }
    }
}

/// An annotation shape
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub geometry: ShapeGeometry,
    /// Label currently drawn on the shape
    pub text_style: Option<TextStyle>,
    /// Label kept aside while labels are hidden
    pub old_text: Option<TextStyle>,
    pub owner: Option<String>,
    /// Missing permissions mean the shape is editable
    pub permissions: Option<Permissions>,
    /// Review stage, `1` once confirmed
    pub review_stage: u8,
    pub visible: bool,
}

impl Shape {
    pub fn new(id: impl Into<ShapeId>, geometry: impl Into<ShapeGeometry>) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
            text_style: None,
            old_text: None,
            owner: None,
            permissions: None,
            review_stage: 0,
            visible: true,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_style = Some(TextStyle::new(text));
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Classification label, falling back to the hidden label
    pub fn label(&self) -> Option<&str> {
        self.text_style
            .as_ref()
            .or(self.old_text.as_ref())
            .map(|style| style.text.as_str())
    }

    /// Stop drawing the label but keep its text
    pub fn hide_label(&mut self) {
        if let Some(style) = self.text_style.take() {
            self.old_text = Some(style);
        }
    }

    /// Draw the label kept aside by [`Shape::hide_label`]
    pub fn show_label(&mut self) {
        if self.text_style.is_none() {
            self.text_style = self.old_text.take();
        }
    }

    pub fn is_editable(&self) -> bool {
        self.permissions.map_or(true, |permissions| permissions.can_edit)
    }
}

/// Source of shapes for the annotation panel
pub trait RegionsCollection {
    /// Resolve a shape by id
    fn feature_by_id(&self, id: &ShapeId) -> Option<&Shape>;

    /// Whether the shape is currently drawn
    fn render_feature(&self, shape: &Shape) -> bool;

    /// Calibrated measurements of a geometry
    fn length_and_area(&self, geometry: &ShapeGeometry) -> ShapeMetrics;

    /// Record that a shape was confirmed
    ///
    /// Returns `false` if the id is unknown.
    fn mark_reviewed(&mut self, id: &ShapeId) -> bool;
}

/// In-memory collection of shapes in insertion order
#[derive(Debug, Clone, Default)]
pub struct Regions {
    shapes: HashMap<ShapeId, Shape>,
    order: Vec<ShapeId>,
    /// Physical size of one pixel, if the image is calibrated
    pixel_size: Option<f64>,
}

impl Regions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pixel_size(mut self, pixel_size: f64) -> Self {
        self.pixel_size = Some(pixel_size);
        self
    }

    pub fn pixel_size(&self) -> Option<f64> {
        self.pixel_size
    }

    /// Add a shape
    ///
    /// # Errors
    /// Returns [`RegionsError::DuplicateId`] if a shape with the same id exists.
    pub fn add(&mut self, shape: Shape) -> Result<(), RegionsError> {
        if self.shapes.contains_key(&shape.id) {
            return Err(RegionsError::DuplicateId(shape.id.to_string()));
        }
        self.order.push(shape.id.clone());
        self.shapes.insert(shape.id.clone(), shape);
        Ok(())
    }

    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let shape = self.shapes.remove(id)?;
        self.order.retain(|other| other != id);
        Some(shape)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Parse a region file
    ///
    /// # Errors
    /// Fails on malformed JSON or duplicate shape ids.
    pub fn from_json(json: &str) -> Result<Self, RegionsError> {
        let file: RegionFile = serde_json::from_str(json)?;
        Self::try_from(file)
    }

    pub fn to_file(&self) -> RegionFile {
        RegionFile {
            pixel_size: self.pixel_size,
            shapes: self.iter().map(ShapeRecord::from).collect(),
        }
    }
}

impl TryFrom<RegionFile> for Regions {
    type Error = RegionsError;

    fn try_from(file: RegionFile) -> Result<Self, Self::Error> {
        let mut regions = Regions {
            pixel_size: file.pixel_size,
            ..Regions::default()
        };
        for record in file.shapes {
            regions.add(record.into())?;
        }
        log::debug!("loaded {} shapes", regions.len());
        Ok(regions)
    }
}

impl RegionsCollection for Regions {
    fn feature_by_id(&self, id: &ShapeId) -> Option<&Shape> {
        self.get(id)
    }

    fn render_feature(&self, shape: &Shape) -> bool {
        shape.visible && self.shapes.contains_key(&shape.id)
    }

    fn length_and_area(&self, geometry: &ShapeGeometry) -> ShapeMetrics {
        metrics::measure(geometry, self.pixel_size)
    }

    fn mark_reviewed(&mut self, id: &ShapeId) -> bool {
        match self.shapes.get_mut(id) {
            Some(shape) => {
                shape.review_stage = 1;
                true
            }
            None => false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}

/// Serialized shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(rename = "@id")]
    pub id: ShapeId,
    #[serde(flatten)]
    pub geometry: GeometryRecord,
    #[serde(rename = "Text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "ShowLabel", default = "default_true", skip_serializing_if = "is_true")]
    pub show_label: bool,
    #[serde(rename = "Owner", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "Permissions", default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    #[serde(rename = "ReviewStage", default, skip_serializing_if = "is_zero")]
    pub review_stage: u8,
    #[serde(rename = "Visible", default = "default_true", skip_serializing_if = "is_true")]
    pub visible: bool,
}

impl From<ShapeRecord> for Shape {
    fn from(record: ShapeRecord) -> Self {
        let label = record.text.map(TextStyle::new);
        let (text_style, old_text) = if record.show_label {
            (label, None)
        } else {
            (None, label)
        };
        Shape {
            id: record.id,
            geometry: record.geometry.to_geometry(),
            text_style,
            old_text,
            owner: record.owner,
            permissions: record.permissions,
            review_stage: record.review_stage,
            visible: record.visible,
        }
    }
}

impl From<&Shape> for ShapeRecord {
    fn from(shape: &Shape) -> Self {
        ShapeRecord {
            id: shape.id.clone(),
            geometry: GeometryRecord::from(&shape.geometry),
            text: shape.label().map(str::to_string),
            show_label: shape.text_style.is_some() || shape.old_text.is_none(),
            owner: shape.owner.clone(),
            permissions: shape.permissions,
            review_stage: shape.review_stage,
            visible: shape.visible,
        }
    }
}

/// Region file: an optional pixel size and a list of shapes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionFile {
    #[serde(rename = "PixelSize", default, skip_serializing_if = "Option::is_none")]
    pub pixel_size: Option<f64>,
    #[serde(default)]
    pub shapes: Vec<ShapeRecord>,
}
