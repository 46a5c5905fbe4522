//! Persisted dashboard records.
//!
//! Dashboards are stored as a JSON record holding the layout and the widget
//! configuration. Two generations of records exist:
//!
//! - Legacy records carry no `version` and store `layout` either as a bare
//!   list of items (implicitly the `lg` breakpoint) or as a breakpoint map.
//! - Current records carry `version: 2` and always store a breakpoint map.
//!
//! ```json
//! {
//!   "version": 2,
//!   "saved_at": "2025-03-01T12:00:00Z",
//!   "layout": { "lg": [{ "i": "weather", "x": 0, "y": 0, "w": 4, "h": 6 }] },
//!   "widgets": { "weather": { "units": "metric" } }
//! }
//! ```
//!
//! Items are kept as raw JSON here; turning them into
//! [`LayoutItem`](crate::LayoutItem)s needs the widget catalog and happens in
//! the normalizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{ProtocolError, Result};
use crate::layout::{DashboardSnapshot, LayoutItem, LayoutSet, WidgetConfigMap};

/// Version written by this crate.
pub const CURRENT_VERSION: u32 = 2;

/// A stored layout, in either of its persisted shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredLayout {
    /// A bare list of items, implicitly the `lg` breakpoint.
    Legacy(Vec<Value>),
    /// A map from breakpoint name to a list of items.
    Breakpoints(Map<String, Value>),
}

impl StoredLayout {
    /// Returns `true` for an empty list or an empty map.
    ///
    /// Both shapes mean "nothing stored".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Legacy(items) => items.is_empty(),
            Self::Breakpoints(map) => map.is_empty(),
        }
    }
}

impl From<&LayoutSet> for StoredLayout {
    fn from(set: &LayoutSet) -> Self {
        let map = set
            .iter()
            .map(|(bp, items)| {
                let items = items.iter().map(item_to_value).collect();
                (bp.name().to_string(), Value::Array(items))
            })
            .collect();
        Self::Breakpoints(map)
    }
}

fn item_to_value(item: &LayoutItem) -> Value {
    let mut value = json!({
        "i": item.id,
        "x": item.x,
        "y": item.y,
        "w": item.width,
        "h": item.height,
    });
    if item.is_static
        && let Some(obj) = value.as_object_mut()
    {
        obj.insert("static".to_string(), Value::Bool(true));
    }
    value
}

/// A leniently parsed layout item.
///
/// Numeric fields are optional: older records may hold `null` (an
/// auto-placed row) or omit sizes entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    /// Widget id.
    pub id: String,
    /// Column, if stored.
    pub x: Option<f64>,
    /// Row, if stored.
    pub y: Option<f64>,
    /// Width, if stored.
    pub w: Option<f64>,
    /// Height, if stored.
    pub h: Option<f64>,
    /// Whether the item is static.
    pub is_static: bool,
}

impl RawItem {
    /// Parses an item, returning `None` if it has no usable id.
    ///
    /// # Examples
    ///
    /// ```
    /// use divedash_protocol::wire::RawItem;
    /// use serde_json::json;
    ///
    /// let item = RawItem::from_value(&json!({"i": "weather", "x": 2, "y": null})).unwrap();
    /// assert_eq!(item.x, Some(2.0));
    /// assert_eq!(item.y, None);
    /// assert!(RawItem::from_value(&json!({"x": 0})).is_none());
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("i")?.as_str()?.trim();
        if id.is_empty() {
            return None;
        }
        let number = |key: &str| obj.get(key).and_then(Value::as_f64);
        Some(Self {
            id: id.to_string(),
            x: number("x"),
            y: number("y"),
            w: number("w"),
            h: number("h"),
            is_static: obj.get("static").and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

/// A persisted dashboard record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDashboard {
    /// Record version; `0` for legacy records without the field.
    #[serde(default)]
    pub version: u32,
    /// When the record was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    /// The stored layout, if any.
    #[serde(default)]
    pub layout: Option<StoredLayout>,
    /// Per-widget configuration.
    #[serde(default, deserialize_with = "null_as_default")]
    pub widgets: WidgetConfigMap,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl StoredDashboard {
    /// Builds a current-version record from a snapshot, stamped now.
    #[must_use]
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        Self {
            version: CURRENT_VERSION,
            saved_at: Some(Utc::now()),
            layout: Some(StoredLayout::from(&snapshot.layouts)),
            widgets: snapshot.widgets.clone(),
        }
    }

    /// Returns `true` for records written before versioning.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.version < CURRENT_VERSION
    }

    /// Returns `false` if a versioned record carries the legacy list shape.
    ///
    /// Such records are still readable; the flag only lets callers report
    /// the inconsistency.
    #[must_use]
    pub fn has_consistent_shape(&self) -> bool {
        self.is_legacy() || !matches!(self.layout, Some(StoredLayout::Legacy(_)))
    }

    /// Parses a record from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::DeserializationFailed`] for malformed JSON or
    /// a record whose fields have the wrong types.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ProtocolError::DeserializationFailed)
    }

    /// Serializes the record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::SerializationFailed`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ProtocolError::SerializationFailed)
    }
}
