//! Shape annotation controller
//!
//! Binds the annotation panel to at most one shape at a time. The controller
//! holds only the shape id; geometry and metadata are always read back from
//! the [`RegionsCollection`], so a deleted shape simply stops resolving.
//!
//! State machine:
//!
//! ```text
//! Unbound --show--> BoundHidden --renders--> BoundVisible
//!    ^                  |  ^                      |
//!    |                  |  +---- not rendered ----+
//!    +------ hide ------+-------------------------+
//! ```

use crate::context::{PanelConfig, ViewerContext};
use crate::events::{Notification, NotificationSink};
use crate::panel::{OverlayHost, PanelControl, PanelInput, ShapeEditPanel};
use crate::regions::{RegionsCollection, Shape, ShapeId};
use crate::timer::{Clock, Debouncer};
use roi_geometry::{MetricKind, ShapeGeometry, ShapeKind};
use std::time::Duration;

/// Observable state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    /// No shape bound
    Unbound,
    /// Shape bound, panel not positioned
    BoundHidden,
    /// Shape bound and panel positioned
    BoundVisible,
}

/// Classification edit waiting for the quiet period to pass
#[derive(Debug)]
struct PendingClassification {
    shape_id: ShapeId,
    text: String,
}

/// Controller of the shape annotation panel
pub struct ShapeAnnotationController {
    panel: ShapeEditPanel,

    /// Map host, released on teardown
    host: Option<Box<dyn OverlayHost>>,

    sink: Box<dyn NotificationSink>,
    clock: Box<dyn Clock>,
    context: ViewerContext,

    bound_shape_id: Option<ShapeId>,

    /// Derived from the bound shape's permissions
    editable: bool,

    pending_edit: Debouncer<PendingClassification>,
    destroyed: bool,
}

impl ShapeAnnotationController {
    /// Create the controller and attach its panel to the host
    pub fn new(
        mut host: Box<dyn OverlayHost>,
        sink: Box<dyn NotificationSink>,
        clock: Box<dyn Clock>,
        context: ViewerContext,
        config: PanelConfig,
    ) -> Self {
        let mut panel = ShapeEditPanel::new();
        host.attach_overlay(panel.id());
        panel.bind(PanelControl::Classification);
        panel.bind(PanelControl::Confirm);
        panel.set_confirm_visible(context.can_confirm());

        log::debug!("annotation panel {} attached", panel.id());

        Self {
            panel,
            host: Some(host),
            sink,
            clock,
            context,
            bound_shape_id: None,
            editable: true,
            pending_edit: Debouncer::new(config.debounce),
            destroyed: false,
        }
    }

    pub fn panel(&self) -> &ShapeEditPanel {
        &self.panel
    }

    pub fn context(&self) -> &ViewerContext {
        &self.context
    }

    pub fn bound_shape_id(&self) -> Option<&ShapeId> {
        self.bound_shape_id.as_ref()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn state(&self) -> PopupState {
        match (&self.bound_shape_id, self.panel.is_visible()) {
            (None, _) => PopupState::Unbound,
            (Some(_), false) => PopupState::BoundHidden,
            (Some(_), true) => PopupState::BoundVisible,
        }
    }

    /// Replace the viewer context and re-place the panel under it
    pub fn update_context<R>(&mut self, regions: &R, context: ViewerContext)
    where
        R: RegionsCollection + ?Sized,
    {
        self.panel.set_confirm_visible(context.can_confirm());
        self.context = context;
        self.update_popup_visibility(regions);
    }

    /// Bind the panel to `shape` and show it if the shape renders
    pub fn show_popup_for_shape<R>(&mut self, regions: &R, shape: &Shape)
    where
        R: RegionsCollection + ?Sized,
    {
        if self.destroyed {
            return;
        }

        if let Some(host) = self.host.as_mut() {
            host.clear_overlay_positions();
        }
        self.panel.set_position(None);

        self.bound_shape_id = Some(shape.id.clone());
        self.panel.set_classification(shape.label().unwrap_or_default());

        self.editable = shape.is_editable();
        self.panel.set_classification_enabled(self.editable);

        let owner = shape.owner.as_deref().unwrap_or_default();
        self.panel.set_owner_text(format!("Owner: {owner}"));

        log::debug!("annotation panel bound to shape {}", shape.id);

        if regions.render_feature(shape) {
            self.update_popup_coordinates(regions, &shape.geometry);
        }
    }

    /// Replace the displayed label if the bound shape is among `shape_ids`
    pub fn update_popup_text(&mut self, shape_ids: &[ShapeId], text: &str) {
        let Some(bound) = self.bound_shape_id.as_ref() else {
            return;
        };
        if shape_ids.contains(bound) {
            self.panel.set_classification(text);
        }
    }

    /// Re-check whether the bound shape renders and reposition or hide
    pub fn update_popup_visibility<R>(&mut self, regions: &R)
    where
        R: RegionsCollection + ?Sized,
    {
        if self.destroyed {
            return;
        }
        let Some(shape_id) = self.bound_shape_id.clone() else {
            return;
        };

        match regions.feature_by_id(&shape_id) {
            Some(shape) if regions.render_feature(shape) => {
                self.update_popup_coordinates(regions, &shape.geometry);
            }
            _ => self.panel.set_position(None),
        }
    }

    /// Hide the panel and unbind, unless a different shape is bound
    pub fn hide_shape_edit_popup(&mut self, shape_id: Option<&ShapeId>) {
        if let (Some(requested), Some(bound)) = (shape_id, self.bound_shape_id.as_ref()) {
            if requested != bound {
                log::debug!("ignoring stale hide for shape {requested}");
                return;
            }
        }

        self.panel.set_position(None);
        if let Some(previous) = self.bound_shape_id.take() {
            log::debug!("annotation panel unbound from shape {previous}");
        }
    }

    /// Refresh labels from `geometry` and anchor the panel above it
    ///
    /// Does nothing while no shape is bound or after teardown.
    pub fn update_popup_coordinates<R>(&mut self, regions: &R, geometry: &ShapeGeometry)
    where
        R: RegionsCollection + ?Sized,
    {
        if self.destroyed || self.bound_shape_id.is_none() {
            return;
        }

        let extent = geometry.extent();
        let [left, top] = extent.top_left();
        let [right, _] = extent.top_right();
        let anchor_x = match (geometry.kind(), geometry.as_line()) {
            (ShapeKind::Line, Some(line)) => line.upper_endpoint_x(),
            _ => (left + right) / 2.0,
        };

        let coords_text = geometry
            .display_coords()
            .into_iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        self.panel.set_coords_text(coords_text);

        let unit = self.context.pixel_unit_symbol();
        let metrics_text = regions
            .length_and_area(geometry)
            .entries()
            .into_iter()
            .map(|(kind, value)| match kind {
                MetricKind::Area => format!("{}: {value} {unit}²", kind.name()),
                MetricKind::Length => format!("{}: {value} {unit}", kind.name()),
            })
            .collect::<Vec<_>>()
            .join(", ");
        self.panel.set_metrics_text(metrics_text);

        if self.context.shape_popup_enabled {
            self.panel.set_position(Some([anchor_x, top]));
        } else {
            self.panel.set_position(None);
        }
    }

    /// Deliver user input to its handler
    ///
    /// Input for an unbound, disabled or hidden control is dropped.
    pub fn handle_input<R>(&mut self, regions: &mut R, input: PanelInput)
    where
        R: RegionsCollection + ?Sized,
    {
        if !self.panel.accepts(&input) {
            log::debug!("dropping {:?} input", input.control());
            return;
        }

        match input {
            PanelInput::ClassificationEdited(text) => self.edit_classification(text),
            PanelInput::ConfirmClicked => self.confirm(regions),
        }
    }

    fn edit_classification(&mut self, text: String) {
        let Some(shape_id) = self.bound_shape_id.clone() else {
            return;
        };
        if !self.editable {
            return;
        }

        self.panel.set_classification(text.clone());
        let now = self.clock.now();
        if self
            .pending_edit
            .schedule(now, PendingClassification { shape_id, text })
        {
            log::debug!("classification edit superseded");
        }
    }

    fn confirm<R>(&mut self, regions: &mut R)
    where
        R: RegionsCollection + ?Sized,
    {
        let Some(shape_id) = self.bound_shape_id.clone() else {
            return;
        };
        if !regions.mark_reviewed(&shape_id) {
            log::warn!("cannot confirm shape {shape_id}: not found");
            return;
        }

        self.sink.emit(Notification::ConfirmChanged { shape_id });
    }

    /// Emit the pending classification edit once its quiet period passed
    ///
    /// Returns `true` if a notification was emitted.
    pub fn poll_timers(&mut self) -> bool {
        let now = self.clock.now();
        match self.pending_edit.poll(now) {
            Some(PendingClassification { shape_id, text }) => {
                self.sink
                    .emit(Notification::ClassificationChanged { shape_id, text });
                true
            }
            None => false,
        }
    }

    pub fn has_pending_edit(&self) -> bool {
        self.pending_edit.is_pending()
    }

    /// Time left until the pending edit is due
    pub fn next_timer_in(&self) -> Option<Duration> {
        let deadline = self.pending_edit.deadline()?;
        Some(deadline.saturating_sub(self.clock.now()))
    }

    /// Release the panel and the host
    ///
    /// Pending edits are dropped. Calling this again does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        self.panel.unbind_all();
        self.panel.set_position(None);
        self.pending_edit.cancel();
        self.bound_shape_id = None;

        if let Some(mut host) = self.host.take() {
            host.detach_overlay(self.panel.id());
        }
        log::debug!("annotation panel {} destroyed", self.panel.id());
    }
}

impl Drop for ShapeAnnotationController {
    fn drop(&mut self) {
        self.destroy();
    }
}
