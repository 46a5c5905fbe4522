//! State of the widget configuration sheet.
//!
//! A sheet edits a copy of one widget's configuration blob. Nothing reaches
//! the dashboard until the sheet is saved; dismissing it drops the copy.

use divedash_layout::{ConfigField, ConfigSchema, FieldKind, LayoutError};
use divedash_protocol::WidgetId;
use serde_json::{Map, Value};

/// An open configuration sheet.
///
/// # Examples
///
/// ```
/// use divedash_layout::WidgetRegistry;
/// use divedash_layout::registry::WidgetConfigSpec;
/// use divedash_tui::config_sheet::ConfigSheet;
/// use serde_json::json;
///
/// let registry = WidgetRegistry::builtin();
/// let def = registry.lookup("weather").unwrap();
/// let WidgetConfigSpec::WithConfig { editor, schema } = &def.config else { unreachable!() };
///
/// let mut sheet = ConfigSheet::new("weather", editor.title, schema, None);
/// sheet.change("units", json!("imperial")).unwrap();
/// assert_eq!(sheet.blob()["units"], json!("imperial"));
/// assert_eq!(sheet.blob()["location"], json!("Puerto Montt"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSheet {
    widget: WidgetId,
    title: &'static str,
    schema: ConfigSchema,
    values: Map<String, Value>,
    selected: usize,
    dirty: bool,
}

impl ConfigSheet {
    /// Opens a sheet on a widget's current blob.
    ///
    /// A missing or unusable blob starts from the schema defaults.
    #[must_use]
    pub fn new(
        widget: impl Into<WidgetId>,
        title: &'static str,
        schema: &ConfigSchema,
        current: Option<&Value>,
    ) -> Self {
        let widget = widget.into();
        let blob = schema
            .sanitize(&widget, current.unwrap_or(&Value::Null))
            .unwrap_or_else(|_| schema.defaults());
        let values = match blob {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            widget,
            title,
            schema: schema.clone(),
            values,
            selected: 0,
            dirty: false,
        }
    }

    /// Returns the widget being configured.
    #[must_use]
    pub fn widget(&self) -> &str {
        &self.widget
    }

    /// Returns the sheet title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Returns the fields in display order.
    #[must_use]
    pub fn fields(&self) -> &[ConfigField] {
        &self.schema.fields
    }

    /// Returns the current value of a field.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the current blob.
    #[must_use]
    pub fn blob(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Consumes the sheet, returning the blob to store.
    #[must_use]
    pub fn into_blob(self) -> Value {
        Value::Object(self.values)
    }

    /// Returns the index of the highlighted field.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Returns the highlighted field.
    #[must_use]
    pub fn selected_field(&self) -> Option<&ConfigField> {
        self.schema.fields.get(self.selected)
    }

    /// Returns `true` if the highlighted field takes typed text.
    #[must_use]
    pub fn is_text_field(&self) -> bool {
        matches!(
            self.selected_field().map(|f| f.kind),
            Some(FieldKind::Text { .. })
        )
    }

    /// Returns `true` once any value differs from when the sheet opened.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Moves the highlight, wrapping around.
    pub fn navigate(&mut self, delta: i32) {
        let count = self.schema.fields.len();
        if count == 0 {
            return;
        }
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        let current = i64::try_from(self.selected).unwrap_or(0);
        let next = (current + i64::from(delta)).rem_euclid(count);
        self.selected = usize::try_from(next).unwrap_or(0);
    }

    /// Sets one field.
    ///
    /// The value is validated like a stored blob: numbers are clamped and
    /// text is truncated.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] for an unknown key or a value
    /// of the wrong type. The sheet is unchanged in that case.
    pub fn change(&mut self, key: &str, value: Value) -> Result<(), LayoutError> {
        if self.schema.field(key).is_none() {
            return Err(LayoutError::InvalidConfig {
                widget: self.widget.clone(),
                reason: format!("unknown field `{key}`"),
            });
        }
        let mut candidate = self.values.clone();
        candidate.insert(key.to_string(), value);
        let Value::Object(values) = self.schema.sanitize(&self.widget, &Value::Object(candidate))?
        else {
            return Ok(());
        };
        if values != self.values {
            self.values = values;
            self.dirty = true;
        }
        Ok(())
    }

    /// Steps the highlighted field. Text fields are left alone.
    pub fn adjust(&mut self, delta: i16) {
        let Some(field) = self.selected_field() else {
            return;
        };
        let current = self.values.get(field.key).unwrap_or(&field.default);
        let next = field.step(current, delta);
        let key = field.key;
        // Stepping only produces values of the field's own type.
        let _ = self.change(key, next);
    }

    /// Appends a character to the highlighted text field.
    pub fn input_char(&mut self, ch: char) {
        self.edit_text(|text| text.push(ch));
    }

    /// Deletes the last character of the highlighted text field.
    pub fn backspace(&mut self) {
        self.edit_text(|text| {
            text.pop();
        });
    }

    fn edit_text(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(field) = self.selected_field() else {
            return;
        };
        if !matches!(field.kind, FieldKind::Text { .. }) {
            return;
        }
        let key = field.key;
        let mut text = self
            .values
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        edit(&mut text);
        let _ = self.change(key, Value::String(text));
    }
}
