//! Notifications emitted by the annotation panel
//!
//! Emission is fire-and-forget: the panel never waits on a receiver and a
//! receiver that has gone away only costs a log line.

use crate::regions::ShapeId;
use serde::Serialize;
use std::sync::mpsc;

/// Event published to the rest of the viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    /// The classification text of a shape was edited
    #[serde(rename_all = "camelCase")]
    ClassificationChanged { shape_id: ShapeId, text: String },
    /// A shape was confirmed by a reviewer
    #[serde(rename_all = "camelCase")]
    ConfirmChanged { shape_id: ShapeId },
}

impl Notification {
    /// Wire name of the notification
    pub fn name(&self) -> &'static str {
        match self {
            Notification::ClassificationChanged { .. } => "CLASSIFICATION_CHANGED",
            Notification::ConfirmChanged { .. } => "CONFIRM_CHANGED",
        }
    }

    pub fn shape_id(&self) -> &ShapeId {
        match self {
            Notification::ClassificationChanged { shape_id, .. } => shape_id,
            Notification::ConfirmChanged { shape_id } => shape_id,
        }
    }
}

/// Receiver side of panel notifications
pub trait NotificationSink {
    fn emit(&self, notification: Notification);
}

/// Sink that forwards notifications over a channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<Notification>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<Notification>) -> Self {
        Self { sender }
    }
}

impl NotificationSink for ChannelSink {
    fn emit(&self, notification: Notification) {
        let name = notification.name();
        if self.sender.send(notification).is_err() {
            log::debug!("dropping {name} notification: receiver closed");
        }
    }
}

/// Create a channel sink and its receiver
pub fn channel_sink() -> (ChannelSink, mpsc::Receiver<Notification>) {
    let (sender, receiver) = mpsc::channel();
    (ChannelSink::new(sender), receiver)
}
