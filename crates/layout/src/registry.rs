//! The widget registry.
//!
//! The registry is the static catalog of every widget the dashboard can
//! show. It is built once at startup and never mutated afterwards; share it
//! through an [`Arc`](std::sync::Arc) rather than cloning it.
//!
//! Widgets that can be configured carry a [`ConfigSchema`] describing the
//! fields of their configuration blob. The schema drives the configuration
//! sheet and sanitizes blobs before they are stored.

use std::collections::HashMap;

use divedash_protocol::{Priority, Role};
use serde_json::{Map, Value};

use crate::catalog::builtin_definitions;
use crate::error::{LayoutError, Result};

/// Default size of a widget, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Size {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Which roles may place a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Every role.
    All,
    /// Only the listed roles.
    Only(&'static [Role]),
}

impl Visibility {
    /// Returns `true` if the role may see the widget.
    #[must_use]
    pub fn allows(self, role: Role) -> bool {
        match self {
            Self::All => true,
            Self::Only(roles) => roles.contains(&role),
        }
    }
}

/// The kind of value a configuration field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A boolean switch.
    Toggle,
    /// An integer within an inclusive range.
    Number {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// One of a fixed set of options.
    Choice(&'static [&'static str]),
    /// Free text up to a maximum length in characters.
    Text {
        /// Maximum number of characters kept.
        max_len: usize,
    },
}

/// One field of a widget's configuration blob.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigField {
    /// Key of the field in the blob.
    pub key: &'static str,
    /// Label shown in the configuration sheet.
    pub label: &'static str,
    /// The kind of value.
    pub kind: FieldKind,
    /// Value used when the blob has none.
    pub default: Value,
}

impl ConfigField {
    /// Creates a boolean field.
    #[must_use]
    pub fn toggle(key: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Toggle,
            default: Value::Bool(default),
        }
    }

    /// Creates an integer field.
    #[must_use]
    pub fn number(key: &'static str, label: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Number { min, max },
            default: Value::from(default.clamp(min, max)),
        }
    }

    /// Creates a choice field. The default must be one of the options.
    #[must_use]
    pub fn choice(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Choice(options),
            default: Value::from(default),
        }
    }

    /// Creates a text field.
    #[must_use]
    pub fn text(key: &'static str, label: &'static str, max_len: usize, default: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text { max_len },
            default: Value::from(default),
        }
    }

    /// Coerces a stored value into this field's domain.
    ///
    /// Numbers are clamped and text is truncated; values of the wrong type
    /// are rejected with the reason.
    fn coerce(&self, value: &Value) -> std::result::Result<Value, String> {
        match self.kind {
            FieldKind::Toggle => value
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| format!("`{}` must be true or false", self.key)),
            FieldKind::Number { min, max } => value
                .as_i64()
                .map(|n| Value::from(n.clamp(min, max)))
                .ok_or_else(|| format!("`{}` must be an integer", self.key)),
            FieldKind::Choice(options) => value
                .as_str()
                .filter(|s| options.contains(s))
                .map(Value::from)
                .ok_or_else(|| format!("`{}` must be one of {}", self.key, options.join(", "))),
            FieldKind::Text { max_len } => value
                .as_str()
                .map(|s| Value::from(s.chars().take(max_len).collect::<String>()))
                .ok_or_else(|| format!("`{}` must be text", self.key)),
        }
    }

    /// Steps a value: toggles flip, numbers move by `delta`, choices cycle.
    ///
    /// Text values are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use divedash_layout::registry::ConfigField;
    /// use serde_json::json;
    ///
    /// let units = ConfigField::choice("units", "Units", &["metric", "imperial"], "metric");
    /// assert_eq!(units.step(&json!("metric"), 1), json!("imperial"));
    /// assert_eq!(units.step(&json!("metric"), -1), json!("imperial"));
    /// ```
    #[must_use]
    pub fn step(&self, current: &Value, delta: i16) -> Value {
        let current = self.coerce(current).unwrap_or_else(|_| self.default.clone());
        match self.kind {
            FieldKind::Toggle => Value::Bool(!current.as_bool().unwrap_or(false)),
            FieldKind::Number { min, max } => {
                let n = current.as_i64().unwrap_or(min);
                Value::from(n.saturating_add(i64::from(delta)).clamp(min, max))
            }
            FieldKind::Choice(options) if !options.is_empty() => {
                let len = i64::try_from(options.len()).unwrap_or(i64::MAX);
                let pos = current
                    .as_str()
                    .and_then(|s| options.iter().position(|o| *o == s))
                    .and_then(|p| i64::try_from(p).ok())
                    .unwrap_or(0);
                let next = (pos + i64::from(delta)).rem_euclid(len);
                usize::try_from(next)
                    .ok()
                    .and_then(|i| options.get(i))
                    .map_or(current, |o| Value::from(*o))
            }
            FieldKind::Choice(_) | FieldKind::Text { .. } => current,
        }
    }
}

/// The fields of a widget's configuration blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSchema {
    /// Fields in display order.
    pub fields: Vec<ConfigField>,
}

impl ConfigSchema {
    /// Creates a schema from its fields.
    #[must_use]
    pub fn new(fields: Vec<ConfigField>) -> Self {
        Self { fields }
    }

    /// Returns a blob holding every field's default.
    #[must_use]
    pub fn defaults(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|f| (f.key.to_string(), f.default.clone()))
                .collect(),
        )
    }

    /// Returns the field with the given key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Validates a blob against the schema and returns its sanitized form.
    ///
    /// `null` yields the defaults. Missing fields take their default,
    /// unknown keys are dropped, numbers are clamped and text is truncated.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] if the blob is not an object
    /// or a field holds a value of the wrong type.
    pub fn sanitize(&self, widget: &str, blob: &Value) -> Result<Value> {
        let invalid = |reason: String| LayoutError::InvalidConfig {
            widget: widget.to_string(),
            reason,
        };
        let empty = Map::new();
        let obj = match blob {
            Value::Null => &empty,
            Value::Object(obj) => obj,
            _ => return Err(invalid("expected an object".to_string())),
        };

        let mut out = Map::new();
        for field in &self.fields {
            let value = match obj.get(field.key) {
                None | Some(Value::Null) => field.default.clone(),
                Some(value) => field.coerce(value).map_err(invalid)?,
            };
            out.insert(field.key.to_string(), value);
        }
        Ok(Value::Object(out))
    }
}

/// The configuration editor attached to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigEditor {
    /// Title of the configuration sheet.
    pub title: &'static str,
}

/// Whether and how a widget can be configured.
///
/// Consumers match on this instead of probing optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetConfigSpec {
    /// The widget has a configuration editor and a blob schema.
    WithConfig {
        /// The editor presenting the schema.
        editor: ConfigEditor,
        /// The blob schema.
        schema: ConfigSchema,
    },
    /// The widget takes no configuration.
    WithoutConfig,
}

/// A registered widget.
///
/// # Examples
///
/// ```
/// use divedash_layout::registry::{Size, WidgetDefinition};
/// use divedash_protocol::Priority;
///
/// let def = WidgetDefinition::new("tide-table", "Tide table", Size::new(4, 4))
///     .heavy()
///     .priority(Priority::Low);
/// assert!(def.heavy);
/// assert!(!def.has_editor());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDefinition {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Size of newly added instances.
    pub default_size: Size,
    /// Static widgets cannot be moved, resized or removed.
    pub is_static: bool,
    /// Heavy widgets are rendered lazily.
    pub heavy: bool,
    /// Rendering priority for the lazy gate.
    pub priority: Priority,
    /// Which roles may place the widget.
    pub visibility: Visibility,
    /// Configuration editor, if any.
    pub config: WidgetConfigSpec,
}

impl WidgetDefinition {
    /// Creates a light, movable, unconfigurable widget visible to all roles.
    #[must_use]
    pub fn new(id: &'static str, name: &'static str, default_size: Size) -> Self {
        Self {
            id,
            name,
            default_size,
            is_static: false,
            heavy: false,
            priority: Priority::Normal,
            visibility: Visibility::All,
            config: WidgetConfigSpec::WithoutConfig,
        }
    }

    /// Marks the widget as heavy.
    #[must_use]
    pub fn heavy(mut self) -> Self {
        self.heavy = true;
        self
    }

    /// Marks the widget as static.
    #[must_use]
    pub fn pinned(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Sets the rendering priority.
    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Restricts the widget to the given roles.
    #[must_use]
    pub fn visible_to(mut self, roles: &'static [Role]) -> Self {
        self.visibility = Visibility::Only(roles);
        self
    }

    /// Attaches a configuration editor.
    #[must_use]
    pub fn with_config(mut self, title: &'static str, fields: Vec<ConfigField>) -> Self {
        self.config = WidgetConfigSpec::WithConfig {
            editor: ConfigEditor { title },
            schema: ConfigSchema::new(fields),
        };
        self
    }

    /// Returns `true` if the widget has a configuration editor.
    #[must_use]
    pub fn has_editor(&self) -> bool {
        matches!(self.config, WidgetConfigSpec::WithConfig { .. })
    }
}

/// The immutable widget catalog.
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    definitions: Vec<WidgetDefinition>,
    index: HashMap<&'static str, usize>,
}

impl WidgetRegistry {
    /// Builds a registry from definitions, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateDefinition`] if two definitions share
    /// an id.
    pub fn new(definitions: Vec<WidgetDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (pos, def) in definitions.iter().enumerate() {
            if index.insert(def.id, pos).is_some() {
                return Err(LayoutError::DuplicateDefinition(def.id.to_string()));
            }
        }
        Ok(Self { definitions, index })
    }

    /// Returns the built-in operations-console catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let definitions = builtin_definitions();
        let index = definitions
            .iter()
            .enumerate()
            .map(|(pos, def)| (def.id, pos))
            .collect();
        Self { definitions, index }
    }

    /// Looks up a widget by id. An absent id is a normal outcome.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&WidgetDefinition> {
        self.index.get(id).and_then(|&pos| self.definitions.get(pos))
    }

    /// Returns `true` if the id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns `true` if the id is registered with a configuration editor.
    #[must_use]
    pub fn has_editor(&self, id: &str) -> bool {
        self.lookup(id).is_some_and(WidgetDefinition::has_editor)
    }

    /// Iterates over all definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetDefinition> {
        self.definitions.iter()
    }

    /// Iterates over the definitions visible to a role.
    pub fn visible_for(&self, role: Role) -> impl Iterator<Item = &WidgetDefinition> {
        self.definitions
            .iter()
            .filter(move |def| def.visibility.allows(role))
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
