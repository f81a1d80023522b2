#![forbid(unsafe_code)]

//! Picker configuration.
//!
//! [`CascaderConfig`] gathers the options the engine recognizes: field-name
//! remapping for option records, the flags that gate selection and clearing,
//! and the presentation options that the engine only carries for the
//! rendering layer (placement, appearance, menu dimensions, placeholder).
//!
//! Configuration can be loaded from TOML or JSON:
//!
//! ```toml
//! value_key = "id"
//! label_key = "name"
//! cleanable = false
//! placement = "topLeft"
//! disabled_item_values = ["legacy"]
//! ```
//!
//! ```rust,ignore
//! let config = CascaderConfig::from_toml_file("cascader.toml")?;
//! let config = CascaderConfig::load_validated(json)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::node::FieldKeys;

/// Errors from loading configuration or option data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Option data whose root is not a list.
    #[error("option data must be an array, got {found}")]
    NotAnArray { found: &'static str },

    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Where the popup opens relative to the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// Below the trigger, aligned to its left edge.
    #[default]
    BottomLeft,
    /// Below the trigger, aligned to its right edge.
    BottomRight,
    /// Above the trigger, aligned to its left edge.
    TopLeft,
    /// Above the trigger, aligned to its right edge.
    TopRight,
    /// Left of the trigger, aligned to its top edge.
    LeftTop,
    /// Right of the trigger, aligned to its top edge.
    RightTop,
    /// Left of the trigger, aligned to its bottom edge.
    LeftBottom,
    /// Right of the trigger, aligned to its bottom edge.
    RightBottom,
}

/// Visual style of the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Appearance {
    #[default]
    Default,
    Subtle,
}

/// Configuration for a [`Cascader`](crate::controller::Cascader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascaderConfig {
    /// Field names for value, label, and children.
    #[serde(flatten)]
    pub keys: FieldKeys,

    /// Disabled pickers ignore selection, clearing, and opening.
    pub disabled: bool,

    /// Whether the host offers a clear affordance. Default: true.
    pub cleanable: bool,

    /// Popup placement, carried for the rendering layer.
    pub placement: Placement,

    /// Trigger appearance, carried for the rendering layer.
    pub appearance: Appearance,

    /// Whether the trigger fills its container's width.
    pub block: bool,

    /// Trigger text when nothing is selected.
    pub placeholder: Option<String>,

    /// Option values that cannot be selected.
    #[serde(alias = "disabledItemValues")]
    pub disabled_item_values: Vec<Value>,

    /// Width of each menu column, in cells.
    #[serde(alias = "menuWidth")]
    pub menu_width: Option<u16>,

    /// Height of the menu, in cells.
    #[serde(alias = "menuHeight")]
    pub menu_height: Option<u16>,

    /// Start with the popup open.
    #[serde(alias = "defaultOpen")]
    pub default_open: bool,
}

impl Default for CascaderConfig {
    fn default() -> Self {
        Self {
            keys: FieldKeys::default(),
            disabled: false,
            cleanable: true,
            placement: Placement::default(),
            appearance: Appearance::default(),
            block: false,
            placeholder: None,
            disabled_item_values: Vec::new(),
            menu_width: None,
            menu_height: None,
            default_open: false,
        }
    }
}

impl CascaderConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load from a JSON string and reject configurations that fail
    /// [`validate`](Self::validate).
    pub fn load_validated(json: &str) -> Result<Self, ConfigError> {
        let config = Self::from_json_str(json)?;
        config.into_validated()
    }

    /// Return `self` if it validates, or the list of problems.
    pub fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Check the configuration for problems.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let keys = [
            ("value_key", &self.keys.value_key),
            ("label_key", &self.keys.label_key),
            ("children_key", &self.keys.children_key),
        ];

        for (name, key) in keys {
            if key.trim().is_empty() {
                errors.push(format!("{name} must not be empty"));
            }
        }

        // Label may share the value field; children may not share either.
        if self.keys.children_key == self.keys.value_key {
            errors.push(format!(
                "children_key and value_key must differ, both are {:?}",
                self.keys.children_key
            ));
        }
        if self.keys.children_key == self.keys.label_key {
            errors.push(format!(
                "children_key and label_key must differ, both are {:?}",
                self.keys.children_key
            ));
        }

        if self.menu_width == Some(0) {
            errors.push("menu_width must be > 0".into());
        }
        if self.menu_height == Some(0) {
            errors.push("menu_height must be > 0".into());
        }

        errors
    }

    /// Whether `value` is listed in `disabled_item_values`.
    #[must_use]
    pub fn is_item_disabled(&self, value: Option<&Value>) -> bool {
        value.is_some_and(|value| self.disabled_item_values.contains(value))
    }

    /// Builder: set the field keys.
    #[must_use]
    pub fn with_keys(mut self, keys: FieldKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Builder: set the disabled flag.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Builder: set the cleanable flag.
    #[must_use]
    pub fn with_cleanable(mut self, cleanable: bool) -> Self {
        self.cleanable = cleanable;
        self
    }

    /// Builder: set the placeholder text.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Builder: set the unselectable option values.
    #[must_use]
    pub fn with_disabled_item_values(mut self, values: Vec<Value>) -> Self {
        self.disabled_item_values = values;
        self
    }

    /// Builder: start with the popup open.
    #[must_use]
    pub fn with_default_open(mut self, open: bool) -> Self {
        self.default_open = open;
        self
    }
}

/// Parse a JSON option list.
pub fn parse_options(json: &str) -> Result<Vec<Value>, ConfigError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(options) => Ok(options),
        other => Err(ConfigError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
