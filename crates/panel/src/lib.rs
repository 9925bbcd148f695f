//! ROI annotation panel
//!
//! Controller and state for the panel that shows and edits the metadata of
//! the currently selected region-of-interest shape.

pub mod context;
pub mod controller;
pub mod error;
pub mod events;
pub mod panel;
pub mod regions;
pub mod timer;

pub use context::{PanelConfig, ViewerContext, DEFAULT_PIXEL_UNIT, REVIEW_STEP};
pub use controller::{PopupState, ShapeAnnotationController};
pub use error::{ConfigError, RegionsError};
pub use events::{channel_sink, ChannelSink, Notification, NotificationSink};
pub use panel::{
    HeadlessHost, OverlayHost, PanelControl, PanelId, PanelInput, ShapeEditPanel,
    CLASSIFICATION_OPTIONS,
};
pub use regions::{
    Permissions, RegionFile, Regions, RegionsCollection, Shape, ShapeId, ShapeRecord, TextStyle,
};
pub use timer::{Clock, Debouncer, ManualClock, SystemClock};
