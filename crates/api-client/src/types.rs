//! Wire types for the pin API
//!
//! A pin is a positioned annotation record owned by the remote API. The
//! server assigns `id` on creation and applies the documented defaults for
//! omitted optional fields; the client never computes defaults itself.

use serde::{Deserialize, Serialize};

/// A 3D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// Origin coordinate
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a coordinate from its components
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A pin as returned by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Server-assigned identifier, immutable after creation
    pub id: String,
    /// Caller-supplied grouping key shared by related pins
    pub meta_id: String,
    /// Pin position
    pub position: Vector3,
    /// Display offset from the position
    pub offset: Vector3,
    /// Free-form markup content
    pub html: String,
    /// Opacity in `[0, 1]`
    pub opacity: f64,
    /// Whether a line is drawn from the position to the offset content
    #[serde(rename = "enableLine")]
    pub enable_line: bool,
    /// Whether the pin is in the alert state
    pub alert: bool,
    /// Presentation icon identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Hex color string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload for creating a pin
///
/// Same shape as [`Pin`] minus `id`. Optional fields are omitted from the
/// serialized body when unset so the server applies its defaults
/// (`offset` `{0,0,0}`, `opacity` `1`, `enableLine`/`alert` `false`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePin {
    /// Grouping key for the new pin
    pub meta_id: String,
    /// Pin position
    pub position: Vector3,
    /// Free-form markup content
    pub html: String,
    /// Display offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector3>,
    /// Opacity in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Whether a line is drawn to the offset content
    #[serde(rename = "enableLine", skip_serializing_if = "Option::is_none")]
    pub enable_line: Option<bool>,
    /// Whether the pin starts in the alert state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<bool>,
    /// Presentation icon identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Hex color string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CreatePin {
    /// Create a payload with the required fields only
    pub fn new(meta_id: impl Into<String>, position: Vector3, html: impl Into<String>) -> Self {
        Self {
            meta_id: meta_id.into(),
            position,
            html: html.into(),
            offset: None,
            opacity: None,
            enable_line: None,
            alert: None,
            icon: None,
            color: None,
        }
    }

    /// Set the display offset
    #[must_use]
    pub fn with_offset(mut self, offset: Vector3) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the opacity
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Enable or disable the connector line
    #[must_use]
    pub fn with_line(mut self, enable_line: bool) -> Self {
        self.enable_line = Some(enable_line);
        self
    }

    /// Set the alert state
    #[must_use]
    pub fn with_alert(mut self, alert: bool) -> Self {
        self.alert = Some(alert);
        self
    }

    /// Set the presentation icon
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the hex color
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Payload for updating a pin
///
/// Partial [`Pin`]: the `id` is mandatory, every mutable field is optional
/// and omitted from the serialized body when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePin {
    /// Identifier of the pin to update
    pub id: String,
    /// New grouping key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_id: Option<String>,
    /// New position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3>,
    /// New display offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector3>,
    /// New markup content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// New opacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// New connector line state
    #[serde(rename = "enableLine", skip_serializing_if = "Option::is_none")]
    pub enable_line: Option<bool>,
    /// New alert state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<bool>,
    /// New presentation icon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// New hex color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl UpdatePin {
    /// Create an update for the given pin with no fields changed yet
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta_id: None,
            position: None,
            offset: None,
            html: None,
            opacity: None,
            enable_line: None,
            alert: None,
            icon: None,
            color: None,
        }
    }

    /// Move the pin
    #[must_use]
    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = Some(position);
        self
    }

    /// Replace the markup content
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Change the opacity
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Change the alert state
    #[must_use]
    pub fn with_alert(mut self, alert: bool) -> Self {
        self.alert = Some(alert);
        self
    }
}

/// Response of a batch delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    /// Number of pins the server removed
    pub deleted: u64,
}

/// Opaque, server-defined metadata document associated with a meta id
///
/// The shape is not constrained by the client; it is passed through as
/// parsed JSON.
pub type Metadata = serde_json::Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_pin_omits_unset_fields() {
        let pin = CreatePin::new("meta1", Vector3::new(1.0, 2.0, 3.0), "<b>hi</b>");
        let json = serde_json::to_value(&pin).unwrap();

        assert_eq!(json["meta_id"], "meta1");
        assert_eq!(json["position"]["x"], 1.0);
        assert_eq!(json["html"], "<b>hi</b>");
        assert!(json.get("offset").is_none());
        assert!(json.get("opacity").is_none());
        assert!(json.get("enableLine").is_none());
        assert!(json.get("alert").is_none());
        assert!(json.get("icon").is_none());
        assert!(json.get("color").is_none());
    }

    #[test]
    fn test_create_pin_builder() {
        let pin = CreatePin::new("meta1", Vector3::ZERO, "x")
            .with_opacity(0.5)
            .with_line(true)
            .with_icon("flag")
            .with_color("#ff8800");
        let json = serde_json::to_value(&pin).unwrap();

        assert_eq!(json["opacity"], 0.5);
        assert_eq!(json["enableLine"], true);
        assert_eq!(json["icon"], "flag");
        assert_eq!(json["color"], "#ff8800");
    }

    #[test]
    fn test_update_pin_serializes_id_and_changes_only() {
        let update = UpdatePin::new("pin-7").with_html("<i>new</i>").with_alert(true);
        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json["id"], "pin-7");
        assert_eq!(json["html"], "<i>new</i>");
        assert_eq!(json["alert"], true);
        assert!(json.get("position").is_none());
        assert!(json.get("meta_id").is_none());
        assert!(json.get("enableLine").is_none());
    }

    #[test]
    fn test_pin_deserialize() {
        let json = r#"{
            "id": "a1b2",
            "meta_id": "room-3",
            "position": {"x": 0.5, "y": 1.5, "z": -2.0},
            "offset": {"x": 0.0, "y": 0.0, "z": 0.0},
            "html": "<p>door</p>",
            "opacity": 1.0,
            "enableLine": false,
            "alert": false
        }"#;

        let pin: Pin = serde_json::from_str(json).unwrap();
        assert_eq!(pin.id, "a1b2");
        assert_eq!(pin.meta_id, "room-3");
        assert_eq!(pin.position, Vector3::new(0.5, 1.5, -2.0));
        assert_eq!(pin.offset, Vector3::ZERO);
        assert!(!pin.enable_line);
        assert!(pin.icon.is_none());
        assert!(pin.color.is_none());
    }

    #[test]
    fn test_pin_deserialize_with_presentation_fields() {
        let json = r##"{
            "id": "a1b2",
            "meta_id": "room-3",
            "position": {"x": 0.0, "y": 0.0, "z": 0.0},
            "offset": {"x": 0.0, "y": 1.0, "z": 0.0},
            "html": "",
            "opacity": 0.8,
            "enableLine": true,
            "alert": true,
            "icon": "warning",
            "color": "#ff0000"
        }"##;

        let pin: Pin = serde_json::from_str(json).unwrap();
        assert_eq!(pin.icon.as_deref(), Some("warning"));
        assert_eq!(pin.color.as_deref(), Some("#ff0000"));
        assert!(pin.alert);
    }

    #[test]
    fn test_delete_summary_deserialize() {
        let summary: DeleteSummary = serde_json::from_str(r#"{"deleted": 3}"#).unwrap();
        assert_eq!(summary.deleted, 3);
    }
}
