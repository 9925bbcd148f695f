//! Shape edit panel
//!
//! Holds what the annotation panel displays for the bound shape:
//! - Classification selector with a fixed option catalog
//! - Coordinate and measurement text
//! - Owner line
//! - Confirm control, exposed only to reviewers
//!
//! The panel is an overlay anchored at a map position. It is visible
//! exactly when it has a position.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Classification options offered by the panel
pub const CLASSIFICATION_OPTIONS: [&str; 22] = [
    "OTHER",
    "ASC-US",
    "ASC-H",
    "LSIL",
    "HSIL",
    "SCC",
    "TR",
    "M",
    "AM",
    "BV",
    "CMV",
    "HSV",
    "IM",
    "S",
    "AGC(NSL)-CC",
    "AGC(NSL)-E",
    "AGC(NSL)-US",
    "AGC(FN)-CC",
    "AGC(FN)-US",
    "AIS-CC",
    "AIS-E",
    "AIS-OT",
];

/// Identifier of a panel overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PanelId(Uuid);

impl PanelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map host that displays overlays
pub trait OverlayHost {
    /// Attach an overlay to the map
    fn attach_overlay(&mut self, panel: PanelId);

    /// Detach an overlay from the map
    fn detach_overlay(&mut self, panel: PanelId);

    /// Unset the position of every attached overlay
    fn clear_overlay_positions(&mut self);
}

/// Overlay host without a display, used outside an interactive viewer
#[derive(Debug, Default)]
pub struct HeadlessHost {
    overlays: Vec<PanelId>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlays(&self) -> &[PanelId] {
        &self.overlays
    }
}

impl OverlayHost for HeadlessHost {
    fn attach_overlay(&mut self, panel: PanelId) {
        if !self.overlays.contains(&panel) {
            self.overlays.push(panel);
        }
    }

    fn detach_overlay(&mut self, panel: PanelId) {
        self.overlays.retain(|id| *id != panel);
    }

    fn clear_overlay_positions(&mut self) {}
}

/// Interactive control of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelControl {
    Classification,
    Confirm,
}

/// User input delivered to the panel
#[derive(Debug, Clone, PartialEq)]
pub enum PanelInput {
    /// The classification selector changed
    ClassificationEdited(String),
    /// The confirm control was activated
    ConfirmClicked,
}

impl PanelInput {
    pub fn control(&self) -> PanelControl {
        match self {
            PanelInput::ClassificationEdited(_) => PanelControl::Classification,
            PanelInput::ConfirmClicked => PanelControl::Confirm,
        }
    }
}

/// Display state of the annotation panel
#[derive(Debug)]
pub struct ShapeEditPanel {
    id: PanelId,

    /// Map anchor, `None` while hidden
    position: Option<[f64; 2]>,

    classification: String,
    coords_text: String,
    metrics_text: String,
    owner_text: String,

    /// Whether the classification selector accepts edits
    classification_enabled: bool,

    confirm_visible: bool,

    /// Controls with a registered input handler
    bindings: Vec<PanelControl>,
}

impl ShapeEditPanel {
    pub fn new() -> Self {
        Self {
            id: PanelId::new(),
            position: None,
            classification: String::new(),
            coords_text: String::new(),
            metrics_text: String::new(),
            owner_text: String::new(),
            classification_enabled: true,
            confirm_visible: false,
            bindings: Vec::new(),
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn position(&self) -> Option<[f64; 2]> {
        self.position
    }

    pub fn set_position(&mut self, position: Option<[f64; 2]>) {
        self.position = position;
    }

    pub fn is_visible(&self) -> bool {
        self.position.is_some()
    }

    pub fn classification(&self) -> &str {
        &self.classification
    }

    pub fn set_classification(&mut self, text: impl Into<String>) {
        self.classification = text.into();
    }

    /// Catalog index of the current classification
    pub fn selected_option(&self) -> Option<usize> {
        CLASSIFICATION_OPTIONS
            .iter()
            .position(|option| *option == self.classification)
    }

    pub fn coords_text(&self) -> &str {
        &self.coords_text
    }

    pub fn set_coords_text(&mut self, text: String) {
        self.coords_text = text;
    }

    pub fn metrics_text(&self) -> &str {
        &self.metrics_text
    }

    pub fn set_metrics_text(&mut self, text: String) {
        self.metrics_text = text;
    }

    pub fn owner_text(&self) -> &str {
        &self.owner_text
    }

    pub fn set_owner_text(&mut self, text: String) {
        self.owner_text = text;
    }

    pub fn is_classification_enabled(&self) -> bool {
        self.classification_enabled
    }

    pub fn set_classification_enabled(&mut self, enabled: bool) {
        self.classification_enabled = enabled;
    }

    pub fn is_confirm_visible(&self) -> bool {
        self.confirm_visible
    }

    pub fn set_confirm_visible(&mut self, visible: bool) {
        self.confirm_visible = visible;
    }

    /// Register the input handler of a control
    pub fn bind(&mut self, control: PanelControl) {
        if !self.bindings.contains(&control) {
            self.bindings.push(control);
        }
    }

    /// Remove every input handler
    pub fn unbind_all(&mut self) {
        self.bindings.clear();
    }

    pub fn is_bound(&self, control: PanelControl) -> bool {
        self.bindings.contains(&control)
    }

    /// Whether an input reaches its handler
    ///
    /// Disabled or hidden controls swallow their input.
    pub fn accepts(&self, input: &PanelInput) -> bool {
        let control = input.control();
        if !self.is_bound(control) {
            return false;
        }
        match control {
            PanelControl::Classification => self.classification_enabled,
            PanelControl::Confirm => self.confirm_visible,
        }
    }
}

impl Default for ShapeEditPanel {
    fn default() -> Self {
        Self::new()
    }
}
