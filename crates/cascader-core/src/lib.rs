#![forbid(unsafe_code)]

//! Selection engine for cascading (multi-column, drill-down) pickers.
//!
//! Given a tree of options and a selection value, the engine derives the
//! columns to display (one sibling list per depth) and the path of active
//! nodes from the root to the selection. It keeps that state consistent as
//! the tree is replaced, for example when lazily loaded children arrive, or
//! when a controlled value changes.
//!
//! - [`node`]: normalizes scalar and record options into [`NormalizedNode`].
//! - [`resolver`]: depth-first search and column reconstruction.
//! - [`controller`]: the [`Cascader`] state machine and its notifications.
//! - [`config`]: [`CascaderConfig`] and its loaders.
//!
//! Rendering, focus handling, and popup positioning are left to the host UI;
//! the engine only produces the data those layers draw.

pub mod config;
pub mod controller;
pub mod node;
pub mod resolver;

pub use config::{Appearance, CascaderConfig, ConfigError, Placement, parse_options};
pub use controller::{Cascader, DataUpdate, PopupState, SelectOutcome, ValueMode};
pub use node::{FieldKeys, NormalizedNode, normalize};
pub use resolver::{Column, Resolution, children_column, locate, resolve};
