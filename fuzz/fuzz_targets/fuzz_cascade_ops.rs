#![no_main]

use arbitrary::Arbitrary;
use cascader_core::{Cascader, CascaderConfig, SelectOutcome, ValueMode};
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Arbitrary)]
struct Input {
    forest: Vec<Shape>,
    controlled: bool,
    initial: Option<u8>,
    ops: Vec<Op>,
}

#[derive(Debug, Arbitrary)]
struct Shape {
    /// Values collide on purpose so first-match-wins is exercised.
    value: u8,
    scalar: bool,
    children: Option<Vec<Shape>>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Select { depth: u8, index: u8 },
    Clear,
    Open,
    Close,
    Toggle,
    SetValue(Option<u8>),
    /// Replace the tree with the same shapes under a bumped label.
    Reload(u8),
}

fn materialize(shapes: &[Shape], depth: usize, tag: u8) -> Vec<Value> {
    if depth > 6 {
        return Vec::new();
    }
    shapes
        .iter()
        .take(8)
        .map(|shape| match &shape.children {
            None if shape.scalar => json!(shape.value),
            None => json!({ "value": shape.value, "label": format!("{}#{tag}", shape.value) }),
            Some(children) => json!({
                "value": shape.value,
                "label": format!("{}#{tag}", shape.value),
                "children": materialize(children, depth + 1, tag),
            }),
        })
        .collect()
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 64 {
        return;
    }
    let data = materialize(&input.forest, 0, 0);
    let initial = input.initial.map(|v| json!(v));
    let mode = if input.controlled {
        ValueMode::Controlled(initial)
    } else {
        ValueMode::Uncontrolled(initial)
    };
    let mut picker: Cascader = Cascader::new(data.clone(), CascaderConfig::default(), mode);

    let changes = Rc::new(Cell::new(0usize));
    let sink = Rc::clone(&changes);
    picker.on_change(move |_, _| sink.set(sink.get() + 1));

    for op in &input.ops {
        let before_value = picker.value().cloned();
        let before_changes = changes.get();
        match op {
            Op::Select { depth, index } => {
                match picker.select(usize::from(*depth), usize::from(*index), &()) {
                    SelectOutcome::Drilled | SelectOutcome::Ignored => {
                        assert_eq!(
                            picker.value(),
                            before_value.as_ref(),
                            "value moved without commit"
                        );
                        assert_eq!(changes.get(), before_changes, "change without commit");
                    }
                    SelectOutcome::Committed { changed } => {
                        assert_eq!(changes.get(), before_changes + usize::from(changed));
                        assert!(!picker.is_open(), "commit left popup open");
                    }
                }
            }
            Op::Clear => {
                assert!(picker.clear(&()));
                assert_eq!(changes.get(), before_changes + 1);
                assert!(picker.active_path().is_empty());
            }
            Op::Open => {
                picker.open();
            }
            Op::Close => {
                picker.close();
            }
            Op::Toggle => {
                picker.toggle();
            }
            Op::SetValue(v) => {
                picker.set_value(v.map(|v| json!(v)));
            }
            Op::Reload(tag) => {
                picker.set_data(materialize(&input.forest, 0, *tag));
            }
        }

        // Columns and the displayed path stay in step.
        let path = picker.display_path();
        let columns = picker.columns();
        assert!(!columns.is_empty(), "root column missing");
        assert!(columns.len() >= path.len(), "path deeper than columns");
        assert!(columns.len() <= path.len() + 1, "more than one trailing column");
        for (column, node) in columns.iter().zip(path) {
            assert_eq!(column.active().and_then(|n| n.value()), node.value());
        }
        for column in columns {
            assert!(column.iter().filter(|n| n.is_active()).count() <= 1);
        }
    }
});
