#![forbid(unsafe_code)]

//! Selection state for a cascading picker.
//!
//! [`Cascader`] owns the option tree, the selection value, the active path,
//! the displayed columns, and the popup state. It reacts to three kinds of
//! input:
//!
//! - **Prop changes**: [`Cascader::set_data`] and [`Cascader::set_value`].
//!   Replacing the data after the user clicked a node relocates that node in
//!   the new tree and exposes its freshly loaded children as a trailing
//!   column (a *merge*), without touching the active path.
//! - **User selection**: [`Cascader::select`] drills into non-leaf nodes and
//!   commits leaves; [`Cascader::clear`] resets the selection.
//! - **Popup lifecycle**: [`Cascader::open`] recomputes from the current
//!   props, [`Cascader::close`] only notifies.
//!
//! # Controlled and uncontrolled values
//!
//! [`ValueMode`] is fixed at construction. An uncontrolled picker adopts the
//! value and path of a committed leaf. A controlled picker reports the
//! commit through `on_change` but leaves its value, path, and columns alone
//! until the owner echoes the new value through [`Cascader::set_value`].
//!
//! # Notification order
//!
//! State is always updated before `on_change` fires, so a listener reading
//! the picker sees the new value. `on_select` fires on every accepted click,
//! leaf or not, before the commit.
//!
//! # Example
//!
//! ```
//! use cascader_core::{Cascader, CascaderConfig, SelectOutcome, ValueMode};
//! use serde_json::json;
//!
//! let data = vec![json!({ "value": "a", "label": "A", "children": ["a1", "a2"] })];
//! let mut picker: Cascader =
//!     Cascader::new(data, CascaderConfig::default(), ValueMode::Uncontrolled(None));
//!
//! assert_eq!(picker.select(0, 0, &()), SelectOutcome::Drilled);
//! assert_eq!(picker.columns().len(), 2);
//! assert_eq!(picker.select(1, 1, &()), SelectOutcome::Committed { changed: true });
//! assert_eq!(picker.value(), Some(&json!("a2")));
//! assert_eq!(picker.trigger_label(), "A / a2");
//! ```

use serde_json::Value;

use crate::config::CascaderConfig;
use crate::node::NormalizedNode;
use crate::resolver::{Column, children_column, resolve};

const DEFAULT_PLACEHOLDER: &str = "Select";
const LABEL_SEPARATOR: &str = " / ";

/// Who owns the selection value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueMode {
    /// The caller owns the value; leaf commits are only reported.
    Controlled(Option<Value>),
    /// The picker owns the value, starting from the given default.
    Uncontrolled(Option<Value>),
}

impl ValueMode {
    /// Map a `value` / `defaultValue` prop pair. A present `value` wins.
    #[must_use]
    pub fn from_props(value: Option<Value>, default_value: Option<Value>) -> Self {
        match value {
            Some(value) => Self::Controlled(Some(value)),
            None => Self::Uncontrolled(default_value),
        }
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Controlled(value) | Self::Uncontrolled(value) => value.as_ref(),
        }
    }

    /// Whether the caller owns the value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Controlled(_))
    }
}

/// How to rebuild columns after the data or value changed.
#[derive(Debug, Clone, PartialEq)]
pub enum DataUpdate {
    /// Resolve the current selection value from scratch and drop any
    /// temporary path.
    FullRecompute,
    /// Relocate the node with this value in the new data and append its
    /// children as a trailing column. The active path is left untouched.
    MergeChildrenAt(Value),
}

/// Popup visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    Closed,
    Open,
}

/// Result of [`Cascader::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// A non-leaf node was selected; its children are now the last column.
    Drilled,
    /// A leaf was selected and the popup closed. `changed` reports whether
    /// the selection value differs from the previous one.
    Committed { changed: bool },
    /// The click was rejected (disabled picker or item, or no such node).
    Ignored,
}

type SelectListener<E> = Box<dyn FnMut(&NormalizedNode, &[NormalizedNode], &E)>;
type ChangeListener<E> = Box<dyn FnMut(Option<&Value>, &E)>;
type LifecycleListener = Box<dyn FnMut()>;
type RenderValue = Box<dyn Fn(&[NormalizedNode]) -> String>;

struct Listeners<E> {
    on_select: Option<SelectListener<E>>,
    on_change: Option<ChangeListener<E>>,
    on_open: Option<LifecycleListener>,
    on_close: Option<LifecycleListener>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            on_select: None,
            on_change: None,
            on_open: None,
            on_close: None,
        }
    }
}

/// Selection state controller for a cascading picker.
///
/// `E` is the UI event type passed through to listeners untouched.
pub struct Cascader<E = ()> {
    data: Vec<Value>,
    config: CascaderConfig,
    mode: ValueMode,
    columns: Vec<Column>,
    active_path: Vec<NormalizedNode>,
    temp_path: Option<Vec<NormalizedNode>>,
    /// Last clicked node; the anchor for merging asynchronously loaded data.
    selected: Option<NormalizedNode>,
    popup: PopupState,
    render_value: Option<RenderValue>,
    listeners: Listeners<E>,
}

impl<E> std::fmt::Debug for Cascader<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cascader")
            .field("roots", &self.data.len())
            .field("mode", &self.mode)
            .field("columns", &self.columns.len())
            .field("active_path", &self.active_path.len())
            .field("temp_path", &self.temp_path.as_ref().map(Vec::len))
            .field("popup", &self.popup)
            .finish_non_exhaustive()
    }
}

impl<E> Cascader<E> {
    /// Create a picker over `data` and resolve the initial value.
    #[must_use]
    pub fn new(data: Vec<Value>, config: CascaderConfig, mode: ValueMode) -> Self {
        let popup = if config.default_open && !config.disabled {
            PopupState::Open
        } else {
            PopupState::Closed
        };
        let mut cascader = Self {
            data,
            config,
            mode,
            columns: Vec::new(),
            active_path: Vec::new(),
            temp_path: None,
            selected: None,
            popup,
            render_value: None,
            listeners: Listeners::default(),
        };
        cascader.apply_update(DataUpdate::FullRecompute);
        cascader
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Set the callback fired on every accepted node click.
    pub fn on_select<F>(&mut self, callback: F)
    where
        F: FnMut(&NormalizedNode, &[NormalizedNode], &E) + 'static,
    {
        self.listeners.on_select = Some(Box::new(callback));
    }

    /// Set the callback fired when the selection value changes.
    pub fn on_change<F>(&mut self, callback: F)
    where
        F: FnMut(Option<&Value>, &E) + 'static,
    {
        self.listeners.on_change = Some(Box::new(callback));
    }

    /// Set the callback fired when the popup opens.
    pub fn on_open<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.listeners.on_open = Some(Box::new(callback));
    }

    /// Set the callback fired when the popup closes.
    pub fn on_close<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.listeners.on_close = Some(Box::new(callback));
    }

    /// Set a custom trigger label renderer. It receives the path of the
    /// current selection value.
    pub fn set_render_value<F>(&mut self, render: F)
    where
        F: Fn(&[NormalizedNode]) -> String + 'static,
    {
        self.render_value = Some(Box::new(render));
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The option tree.
    #[must_use]
    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &CascaderConfig {
        &self.config
    }

    /// The effective selection value.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.mode.value()
    }

    /// Whether a non-null selection value is set.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value().is_some_and(|value| !value.is_null())
    }

    /// Whether the caller owns the selection value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.mode.is_controlled()
    }

    /// Columns to display, root first.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The chain of selected or drilled-into nodes, root first.
    #[must_use]
    pub fn active_path(&self) -> &[NormalizedNode] {
        &self.active_path
    }

    /// Provisional path left by a merge, until the next selection or full
    /// recompute.
    #[must_use]
    pub fn temp_path(&self) -> Option<&[NormalizedNode]> {
        self.temp_path.as_deref()
    }

    /// The path the menu should highlight: the temporary path if a merge is
    /// pending, otherwise the active path.
    #[must_use]
    pub fn display_path(&self) -> &[NormalizedNode] {
        self.temp_path.as_deref().unwrap_or(&self.active_path)
    }

    /// Path from the root to the node holding the current selection value.
    #[must_use]
    pub fn selection_path(&self) -> Vec<NormalizedNode> {
        resolve(&self.data, self.value(), &self.config.keys).active_path
    }

    /// Text for the trigger button.
    ///
    /// Uses the custom renderer when set, otherwise the labels of the
    /// selection path joined with `" / "`, falling back to the placeholder.
    #[must_use]
    pub fn trigger_label(&self) -> String {
        let path = self.selection_path();
        if let Some(render) = &self.render_value {
            return render(&path);
        }
        if path.is_empty() {
            return self
                .config
                .placeholder
                .clone()
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_owned());
        }
        path.iter()
            .map(NormalizedNode::label_text)
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR)
    }

    /// Popup visibility.
    #[must_use]
    pub fn popup(&self) -> PopupState {
        self.popup
    }

    /// Whether the popup is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.popup == PopupState::Open
    }

    // ------------------------------------------------------------------
    // Prop changes
    // ------------------------------------------------------------------

    /// Replace the option tree.
    ///
    /// Returns the update that was applied, or `None` when the data is
    /// unchanged. If a node was clicked earlier, its children in the new
    /// tree are merged in; otherwise the selection is recomputed.
    pub fn set_data(&mut self, data: Vec<Value>) -> Option<DataUpdate> {
        if data == self.data {
            return None;
        }
        self.data = data;
        let update = match self.selected.as_ref().and_then(NormalizedNode::value) {
            Some(value) => DataUpdate::MergeChildrenAt(value.clone()),
            None => DataUpdate::FullRecompute,
        };
        self.apply_update(update.clone());
        Some(update)
    }

    /// Replace the controlled value.
    ///
    /// Returns `true` when the value changed and the columns were rebuilt.
    /// Uncontrolled pickers ignore this.
    pub fn set_value(&mut self, value: Option<Value>) -> bool {
        let ValueMode::Controlled(current) = &mut self.mode else {
            tracing::debug!(message = "cascade.set_value.ignored", reason = "uncontrolled");
            return false;
        };
        if *current == value {
            return false;
        }
        *current = value;
        self.selected = None;
        self.apply_update(DataUpdate::FullRecompute);
        true
    }

    /// Rebuild columns and paths.
    pub fn apply_update(&mut self, update: DataUpdate) {
        let keys = &self.config.keys;
        match update {
            DataUpdate::FullRecompute => {
                let resolution = resolve(&self.data, self.mode.value(), keys);
                let empty_tail = resolution.matched_children(keys).filter(Column::is_empty);
                self.columns = resolution.columns;
                self.columns.extend(empty_tail);
                self.active_path = resolution.active_path;
                self.temp_path = None;
            }
            DataUpdate::MergeChildrenAt(value) => {
                let resolution = resolve(&self.data, Some(&value), keys);
                let trailing = resolution.matched_children(keys);
                tracing::debug!(
                    message = "cascade.merge",
                    found = resolution.is_found(),
                    depth = resolution.trail.len(),
                    new_children = trailing.as_ref().map_or(0, Column::len),
                );
                self.columns = resolution.columns;
                self.columns.extend(trailing);
                self.temp_path = Some(resolution.active_path);
            }
        }
    }

    // ------------------------------------------------------------------
    // User input
    // ------------------------------------------------------------------

    /// Handle a click on the node at `index` in column `depth`.
    pub fn select(&mut self, depth: usize, index: usize, event: &E) -> SelectOutcome {
        if self.config.disabled {
            return SelectOutcome::Ignored;
        }
        let Some(node) = self.columns.get(depth).and_then(|column| column.get(index)) else {
            return SelectOutcome::Ignored;
        };
        if self.config.is_item_disabled(node.value()) {
            return SelectOutcome::Ignored;
        }

        let mut node = node.clone();
        node.active = true;
        let mut path: Vec<NormalizedNode> =
            self.display_path().iter().take(depth).cloned().collect();
        path.push(node.clone());

        let mut columns: Vec<Column> = self.columns.iter().take(depth + 1).cloned().collect();
        if let Some(column) = columns.last_mut() {
            column.set_active(Some(index));
        }

        tracing::debug!(
            message = "cascade.select",
            depth,
            index,
            leaf = node.is_leaf(),
            label = %node.label_text(),
        );

        self.selected = Some(node.clone());
        // The displayed columns were built for the temporary path; keep the
        // two in step for controlled commits that leave the columns alone.
        if let Some(temp) = self.temp_path.take() {
            self.active_path = temp;
        }

        if !node.is_leaf() {
            columns.extend(children_column(&node, index, &self.config.keys));
            self.columns = columns;
            self.active_path = path;
            if let Some(on_select) = self.listeners.on_select.as_mut() {
                on_select(&node, &self.active_path, event);
            }
            return SelectOutcome::Drilled;
        }

        if let Some(on_select) = self.listeners.on_select.as_mut() {
            on_select(&node, &path, event);
        }
        self.close();

        let previous = self.value().cloned();
        let next = node.value().cloned();
        if let ValueMode::Uncontrolled(current) = &mut self.mode {
            *current = next.clone();
            // A present but empty children list still shows an empty column.
            columns.extend(children_column(&node, index, &self.config.keys));
            self.columns = columns;
            self.active_path = path;
        }

        let changed = previous != next;
        if changed {
            tracing::debug!(message = "cascade.change", controlled = self.is_controlled());
            if let Some(on_change) = self.listeners.on_change.as_mut() {
                on_change(next.as_ref(), event);
            }
        }
        SelectOutcome::Committed { changed }
    }

    /// Clear the selection.
    ///
    /// Returns `false` without side effects when the picker is disabled.
    /// Otherwise resets the active path and, for uncontrolled pickers, the
    /// value, then reports `on_change(None)` exactly once. `cleanable` only
    /// decides whether the host shows a clear affordance.
    pub fn clear(&mut self, event: &E) -> bool {
        if self.config.disabled {
            return false;
        }
        if let ValueMode::Uncontrolled(current) = &mut self.mode {
            *current = None;
        }
        self.selected = None;
        self.active_path.clear();
        self.temp_path = None;
        self.columns = vec![Column::from_raw(&self.data, None, &self.config.keys)];

        tracing::debug!(message = "cascade.clear", controlled = self.is_controlled());
        if let Some(on_change) = self.listeners.on_change.as_mut() {
            on_change(None, event);
        }
        true
    }

    // ------------------------------------------------------------------
    // Popup lifecycle
    // ------------------------------------------------------------------

    /// Open the popup and recompute from the current props.
    ///
    /// Returns `false` when already open or disabled.
    pub fn open(&mut self) -> bool {
        if self.config.disabled || self.is_open() {
            return false;
        }
        self.popup = PopupState::Open;
        self.apply_update(DataUpdate::FullRecompute);
        tracing::debug!(message = "cascade.popup", state = "open");
        if let Some(on_open) = self.listeners.on_open.as_mut() {
            on_open();
        }
        true
    }

    /// Close the popup. Returns `false` when already closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.popup = PopupState::Closed;
        tracing::debug!(message = "cascade.popup", state = "closed");
        if let Some(on_close) = self.listeners.on_close.as_mut() {
            on_close();
        }
        true
    }

    /// Open when closed, close when open.
    pub fn toggle(&mut self) -> bool {
        if self.is_open() { self.close() } else { self.open() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tree() -> Vec<Value> {
        vec![
            json!({ "value": "a", "label": "A", "children": [
                { "value": "a1", "label": "A1" },
                { "value": "a2", "label": "A2", "children": [{ "value": "a2x", "label": "A2X" }] }
            ]}),
            json!({ "value": "b", "label": "B" }),
        ]
    }

    fn uncontrolled(value: Option<Value>) -> Cascader {
        Cascader::new(tree(), CascaderConfig::default(), ValueMode::Uncontrolled(value))
    }

    fn values(path: &[NormalizedNode]) -> Vec<Value> {
        path.iter().filter_map(|n| n.value().cloned()).collect()
    }

    #[test]
    fn value_mode_from_props() {
        assert_eq!(
            ValueMode::from_props(Some(json!(1)), Some(json!(2))),
            ValueMode::Controlled(Some(json!(1)))
        );
        assert_eq!(
            ValueMode::from_props(None, Some(json!(2))),
            ValueMode::Uncontrolled(Some(json!(2)))
        );
    }

    #[test]
    fn initial_default_value_is_resolved() {
        let picker = uncontrolled(Some(json!("a2x")));
        assert_eq!(values(picker.active_path()), [json!("a"), json!("a2"), json!("a2x")]);
        assert_eq!(picker.columns().len(), 3);
        assert_eq!(picker.trigger_label(), "A / A2 / A2X");
    }

    #[test]
    fn initial_missing_value_shows_root_only() {
        let picker = uncontrolled(Some(json!("zzz")));
        assert!(picker.active_path().is_empty());
        assert_eq!(picker.columns().len(), 1);
        assert_eq!(picker.trigger_label(), "Select");
    }

    #[test]
    fn placeholder_is_used_when_empty() {
        let config = CascaderConfig::default().with_placeholder("Choose");
        let picker: Cascader = Cascader::new(tree(), config, ValueMode::Uncontrolled(None));
        assert_eq!(picker.trigger_label(), "Choose");
        assert!(!picker.has_value());
    }

    #[test]
    fn custom_render_value_receives_selection_path() {
        let mut picker = uncontrolled(Some(json!("a1")));
        picker.set_render_value(|path| format!("{} levels", path.len()));
        assert_eq!(picker.trigger_label(), "2 levels");
    }

    #[test]
    fn drill_exposes_children_and_keeps_popup_open() {
        let mut picker = uncontrolled(None);
        picker.open();
        assert_eq!(picker.select(0, 0, &()), SelectOutcome::Drilled);
        assert!(picker.is_open());
        assert_eq!(picker.columns().len(), 2);
        assert_eq!(picker.columns()[0].active_index(), Some(0));
        assert_eq!(values(picker.active_path()), [json!("a")]);
        assert_eq!(picker.value(), None);

        assert_eq!(picker.select(1, 1, &()), SelectOutcome::Drilled);
        assert_eq!(picker.columns().len(), 3);
        assert_eq!(values(picker.active_path()), [json!("a"), json!("a2")]);
    }

    #[test]
    fn drilling_a_shallower_column_truncates() {
        let mut picker = uncontrolled(Some(json!("a2x")));
        assert_eq!(picker.select(0, 0, &()), SelectOutcome::Drilled);
        assert_eq!(picker.columns().len(), 2);
        assert_eq!(picker.columns()[1].active_index(), None);
        assert_eq!(values(picker.active_path()), [json!("a")]);
    }

    #[test]
    fn leaf_commit_in_uncontrolled_mode_adopts_value_and_path() {
        let mut picker = uncontrolled(None);
        picker.open();
        picker.select(0, 0, &());
        assert_eq!(picker.select(1, 0, &()), SelectOutcome::Committed { changed: true });
        assert!(!picker.is_open());
        assert_eq!(picker.value(), Some(&json!("a1")));
        assert_eq!(values(picker.active_path()), [json!("a"), json!("a1")]);
        assert_eq!(picker.columns().len(), 2);
        assert_eq!(picker.columns()[1].active_index(), Some(0));
    }

    #[test]
    fn reselecting_same_leaf_reports_no_change() {
        let mut picker = uncontrolled(Some(json!("b")));
        assert_eq!(picker.select(0, 1, &()), SelectOutcome::Committed { changed: false });
    }

    #[test]
    fn controlled_leaf_commit_reports_but_keeps_state() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let mut picker: Cascader = Cascader::new(
            tree(),
            CascaderConfig::default(),
            ValueMode::Controlled(Some(json!("a1"))),
        );
        picker.on_change(move |value, _| sink.borrow_mut().push(value.cloned()));

        assert_eq!(picker.select(0, 1, &()), SelectOutcome::Committed { changed: true });
        assert_eq!(picker.value(), Some(&json!("a1")));
        assert_eq!(values(picker.active_path()), [json!("a"), json!("a1")]);
        assert_eq!(*changes.borrow(), vec![Some(json!("b"))]);

        assert!(picker.set_value(Some(json!("b"))));
        assert_eq!(values(picker.active_path()), [json!("b")]);
        assert!(!picker.set_value(Some(json!("b"))));
    }

    #[test]
    fn set_value_is_ignored_when_uncontrolled() {
        let mut picker = uncontrolled(Some(json!("b")));
        assert!(!picker.set_value(Some(json!("a1"))));
        assert_eq!(picker.value(), Some(&json!("b")));
    }

    #[test]
    fn disabled_item_is_ignored() {
        let config = CascaderConfig::default().with_disabled_item_values(vec![json!("b")]);
        let mut picker: Cascader = Cascader::new(tree(), config, ValueMode::Uncontrolled(None));
        assert_eq!(picker.select(0, 1, &()), SelectOutcome::Ignored);
        assert_eq!(picker.value(), None);
    }

    #[test]
    fn out_of_range_select_is_ignored() {
        let mut picker = uncontrolled(None);
        assert_eq!(picker.select(3, 0, &()), SelectOutcome::Ignored);
        assert_eq!(picker.select(0, 9, &()), SelectOutcome::Ignored);
    }

    #[test]
    fn clear_resets_uncontrolled_value() {
        let mut picker = uncontrolled(Some(json!("a1")));
        assert!(picker.clear(&()));
        assert_eq!(picker.value(), None);
        assert!(picker.active_path().is_empty());
        assert_eq!(picker.columns().len(), 1);
    }

    #[test]
    fn clear_is_refused_only_when_disabled() {
        let config = CascaderConfig::default().with_disabled(true);
        let mut picker: Cascader =
            Cascader::new(tree(), config, ValueMode::Uncontrolled(Some(json!("b"))));
        assert!(!picker.clear(&()));
        assert_eq!(picker.value(), Some(&json!("b")));
    }

    #[test]
    fn clear_ignores_cleanable_flag() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let config = CascaderConfig::default().with_cleanable(false);
        let mut picker: Cascader =
            Cascader::new(tree(), config, ValueMode::Uncontrolled(Some(json!("b"))));
        picker.on_change(move |value, _| sink.borrow_mut().push(value.cloned()));

        assert!(picker.clear(&()));
        assert_eq!(picker.value(), None);
        assert_eq!(*changes.borrow(), vec![None]);
    }

    #[test]
    fn empty_children_column_is_route_independent() {
        let data = vec![json!({ "value": "a", "label": "A", "children": [] }), json!("b")];
        let mut picker: Cascader =
            Cascader::new(data, CascaderConfig::default(), ValueMode::Uncontrolled(None));
        picker.open();
        assert_eq!(picker.select(0, 0, &()), SelectOutcome::Committed { changed: true });
        assert_eq!(picker.columns().len(), 2);
        assert!(picker.columns()[1].is_empty());

        let reloaded = vec![json!({ "value": "a", "label": "A2", "children": [] }), json!("b")];
        assert_eq!(picker.set_data(reloaded), Some(DataUpdate::MergeChildrenAt(json!("a"))));
        assert_eq!(picker.columns().len(), 2);

        assert!(picker.open());
        assert_eq!(picker.columns().len(), 2);
        assert!(picker.columns()[1].is_empty());
        assert_eq!(values(picker.active_path()), [json!("a")]);
    }

    #[test]
    fn set_data_without_click_recomputes() {
        let mut picker = uncontrolled(Some(json!("a1")));
        let mut next = tree();
        next[1] = json!({ "value": "c", "label": "C" });
        assert_eq!(picker.set_data(next), Some(DataUpdate::FullRecompute));
        assert!(picker.temp_path().is_none());
        assert_eq!(values(picker.active_path()), [json!("a"), json!("a1")]);
        assert!(picker.set_data(picker.data().to_vec()).is_none());
    }

    #[test]
    fn set_data_after_click_merges_children() {
        let mut picker: Cascader = Cascader::new(
            vec![json!({ "value": "a", "label": "A", "children": ["a1"] })],
            CascaderConfig::default(),
            ValueMode::Uncontrolled(None),
        );
        picker.open();
        assert_eq!(picker.select(0, 0, &()), SelectOutcome::Drilled);

        let loaded = vec![json!({ "value": "a", "label": "A", "children": ["a1", "a2", "a3"] })];
        assert_eq!(
            picker.set_data(loaded),
            Some(DataUpdate::MergeChildrenAt(json!("a")))
        );
        assert_eq!(picker.columns().len(), 2);
        assert_eq!(picker.columns()[1].len(), 3);
        assert_eq!(values(picker.active_path()), [json!("a")]);
        assert_eq!(picker.temp_path().map(values), Some(vec![json!("a")]));
        assert_eq!(values(picker.display_path()), [json!("a")]);
        assert!(picker.is_open());
    }

    #[test]
    fn merge_clears_on_next_selection() {
        let mut picker = uncontrolled(None);
        picker.select(0, 0, &());
        let mut loaded = tree();
        loaded[0]["children"][0]["label"] = json!("A1 (loaded)");
        picker.set_data(loaded);
        assert!(picker.temp_path().is_some());
        let first = picker.columns()[1].get(0).map(NormalizedNode::label_text);
        assert_eq!(first.as_deref(), Some("A1 (loaded)"));

        picker.select(1, 0, &());
        assert!(picker.temp_path().is_none());
        assert_eq!(picker.value(), Some(&json!("a1")));
    }

    #[test]
    fn open_recomputes_and_discards_temp_path() {
        let mut picker = uncontrolled(Some(json!("a1")));
        picker.apply_update(DataUpdate::MergeChildrenAt(json!("a2")));
        assert!(picker.temp_path().is_some());
        assert!(picker.open());
        assert!(picker.temp_path().is_none());
        assert_eq!(values(picker.active_path()), [json!("a"), json!("a1")]);
        assert!(!picker.open());
    }

    #[test]
    fn popup_lifecycle_notifies_once_per_transition() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut picker = uncontrolled(None);
        let opened = Rc::clone(&log);
        picker.on_open(move || opened.borrow_mut().push("open"));
        let closed = Rc::clone(&log);
        picker.on_close(move || closed.borrow_mut().push("close"));

        assert!(picker.toggle());
        assert!(!picker.open());
        assert!(picker.close());
        assert!(!picker.close());
        assert_eq!(*log.borrow(), ["open", "close"]);
    }

    #[test]
    fn disabled_picker_refuses_to_open() {
        let config = CascaderConfig::default().with_disabled(true).with_default_open(true);
        let mut picker: Cascader = Cascader::new(tree(), config, ValueMode::Uncontrolled(None));
        assert!(!picker.is_open());
        assert!(!picker.open());
        assert_eq!(picker.select(0, 1, &()), SelectOutcome::Ignored);
    }

    #[test]
    fn default_open_starts_open() {
        let config = CascaderConfig::default().with_default_open(true);
        let picker: Cascader = Cascader::new(tree(), config, ValueMode::Uncontrolled(None));
        assert_eq!(picker.popup(), PopupState::Open);
    }

    #[test]
    fn debug_output_summarizes_state() {
        let picker = uncontrolled(Some(json!("a1")));
        let debug = format!("{picker:?}");
        assert!(debug.contains("Cascader"));
        assert!(debug.contains("active_path: 2"));
    }
}
