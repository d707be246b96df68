//! Messages received from the compositor and the types they carry.
//!
//! This module defines the vocabulary that all components share:
//! [`Event`] describes a notification pushed by the compositor after a
//! client subscribed, [`ViewInfo`] / [`ViewRole`] describe the view it
//! refers to, and [`Response`] is the reply to a method call.
//!
//! Both kinds of message travel over the same socket.  They are told apart
//! by the presence of an `"event"` key, see [`Message::from_json`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compositor-assigned view identifier.
pub type ViewId = u32;

/// Kind of a compositor event.
///
/// Only [`ViewFocused`](EventKind::ViewFocused) drives the dimmer; the
/// other kinds are decoded so they can be logged by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    ViewFocused,
    ViewMapped,
    ViewTiled,
    ViewMinimized,
    ViewFullscreen,
    #[serde(other)]
    Other,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::ViewFocused => write!(f, "view-focused"),
            EventKind::ViewMapped => write!(f, "view-mapped"),
            EventKind::ViewTiled => write!(f, "view-tiled"),
            EventKind::ViewMinimized => write!(f, "view-minimized"),
            EventKind::ViewFullscreen => write!(f, "view-fullscreen"),
            EventKind::Other => write!(f, "other"),
        }
    }
}

/// Role of a view as reported in the `"type"` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewRole {
    Toplevel,
    Unmanaged,
    /// Xwayland override-redirect surface.
    XOr,
    Background,
    Panel,
    Overlay,
    #[serde(other)]
    Unknown,
}

/// Subset of the view description attached to events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewInfo {
    pub id: ViewId,
    #[serde(rename = "type")]
    pub role: ViewRole,
    #[serde(rename = "app-id", default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ViewInfo {
    pub fn is_toplevel(&self) -> bool {
        self.role == ViewRole::Toplevel
    }
}

/// An event pushed by the compositor.
///
/// ```json
/// {"event": "view-focused", "view": {"id": 5, "type": "toplevel"}}
/// {"event": "view-focused", "view": null}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "event")]
    pub kind: EventKind,
    #[serde(default)]
    pub view: Option<ViewInfo>,
}

impl Event {
    /// Convenience constructor for a `view-focused` event.
    pub fn focused(view: Option<ViewInfo>) -> Self {
        Self {
            kind: EventKind::ViewFocused,
            view,
        }
    }
}

/// Reply to a method call.
///
/// Success is `{"result": "ok", ...}`, failure is `{"error": "<message>"}`.
/// Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Response {
    /// The error message, if the compositor rejected the call.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Any message read from the socket.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Event(Event),
    Response(Response),
}

impl Message {
    /// Decode a raw JSON payload.
    ///
    /// Objects carrying an `"event"` key are events, everything else is a
    /// method response.
    pub fn from_json(payload: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(payload)?;
        if value.get("event").is_some() {
            Ok(Message::Event(serde_json::from_value(value)?))
        } else {
            Ok(Message::Response(serde_json::from_value(value)?))
        }
    }
}
