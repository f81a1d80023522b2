#![forbid(unsafe_code)]

//! Option normalization.
//!
//! Callers hand the picker heterogeneous options: plain scalars (`"foo"`,
//! `42`) or records (`{"value": "a", "label": "A", "children": [..]}`) whose
//! field names are configurable through [`FieldKeys`]. [`normalize`] turns a
//! single raw option into a [`NormalizedNode`] without recursing into its
//! children; walking the tree is the resolver's job.
//!
//! # Example
//!
//! ```
//! use cascader_core::node::{FieldKeys, normalize};
//! use serde_json::json;
//!
//! let keys = FieldKeys::default();
//! let node = normalize(&json!("foo"), &keys);
//! assert_eq!(node.value(), Some(&json!("foo")));
//! assert_eq!(node.label_text(), "foo");
//! assert!(node.is_leaf());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names used to read value, label, and children out of record options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKeys {
    /// Field holding the option's value. Default: `"value"`.
    #[serde(alias = "valueKey")]
    pub value_key: String,
    /// Field holding the option's display label. Default: `"label"`.
    #[serde(alias = "labelKey")]
    pub label_key: String,
    /// Field holding the nested option list. Default: `"children"`.
    #[serde(alias = "childrenKey")]
    pub children_key: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            value_key: "value".into(),
            label_key: "label".into(),
            children_key: "children".into(),
        }
    }
}

impl FieldKeys {
    /// Create a key set with explicit field names.
    #[must_use]
    pub fn new(
        value_key: impl Into<String>,
        label_key: impl Into<String>,
        children_key: impl Into<String>,
    ) -> Self {
        Self {
            value_key: value_key.into(),
            label_key: label_key.into(),
            children_key: children_key.into(),
        }
    }

    /// Borrow the value of a raw option without normalizing it.
    ///
    /// Scalars are their own value. Records yield their value field, if any.
    #[must_use]
    pub fn value_of<'a>(&self, raw: &'a Value) -> Option<&'a Value> {
        match raw {
            Value::Object(record) => record.get(&self.value_key),
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(raw),
            Value::Null | Value::Array(_) => None,
        }
    }

    /// Borrow the children list of a raw option, if it carries one.
    ///
    /// A children field that is not an array is ignored.
    #[must_use]
    pub fn children_of<'a>(&self, raw: &'a Value) -> Option<&'a [Value]> {
        match raw {
            Value::Object(record) => match record.get(&self.children_key) {
                Some(Value::Array(children)) => Some(children.as_slice()),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Uniform representation of one option as shown in a picker column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedNode {
    value: Option<Value>,
    label: Option<Value>,
    children: Option<Vec<Value>>,
    extra: Map<String, Value>,
    pub(crate) active: bool,
    pub(crate) parent: Option<usize>,
}

impl NormalizedNode {
    /// The option's value. `None` when the record has no value field; such a
    /// node never matches a search target.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The raw label value.
    #[must_use]
    pub fn label(&self) -> Option<&Value> {
        self.label.as_ref()
    }

    /// Label rendered as text. Missing labels render as an empty string.
    #[must_use]
    pub fn label_text(&self) -> String {
        match &self.label {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// The raw children list, passed through without normalization.
    #[must_use]
    pub fn children(&self) -> Option<&[Value]> {
        self.children.as_deref()
    }

    /// Whether this node carries a children field at all.
    #[must_use]
    pub fn has_children_field(&self) -> bool {
        self.children.is_some()
    }

    /// A node with no children, or an empty children list, is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().is_none_or(Vec::is_empty)
    }

    /// Record fields other than value, label, and children.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Look up a pass-through field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Whether the resolver marked this node as the active one in its column.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Index of this node's parent inside the preceding column.
    ///
    /// Root-level nodes have no parent.
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Whether this node's value equals `target`. Absent values never match.
    #[must_use]
    pub fn matches(&self, target: &Value) -> bool {
        self.value.as_ref() == Some(target)
    }
}

/// Normalize one raw option.
///
/// Scalars become `{ value: s, label: s }`. Records keep their value, label,
/// and children fields (children untouched) and carry every other field in
/// [`NormalizedNode::extra`]. `null` and arrays yield an empty node. The
/// result is never active and has no parent.
#[must_use]
pub fn normalize(raw: &Value, keys: &FieldKeys) -> NormalizedNode {
    match raw {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => NormalizedNode {
            value: Some(raw.clone()),
            label: Some(raw.clone()),
            ..NormalizedNode::default()
        },
        Value::Object(record) => {
            let mut extra = record.clone();
            extra.remove(&keys.value_key);
            extra.remove(&keys.label_key);
            extra.remove(&keys.children_key);
            NormalizedNode {
                value: record.get(&keys.value_key).cloned(),
                label: record.get(&keys.label_key).cloned(),
                children: keys.children_of(raw).map(<[Value]>::to_vec),
                extra,
                active: false,
                parent: None,
            }
        }
        Value::Null | Value::Array(_) => NormalizedNode::default(),
    }
}
