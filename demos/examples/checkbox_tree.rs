// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a checkbox tree the way a host widget would.
//!
//! This example shows how to:
//! - load partial node data from JSON,
//! - cascade a parent toggle and bubble a child change back up,
//! - read the four views returned after each change.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example checkbox_tree`

use tracing_subscriber::EnvFilter;
use understory_checkbox_tree::{
    Changes, CheckboxNode, Checkboxes, CheckboxesConfig, Selectable, sort_list_by_order,
};

fn mark(node: &impl Selectable) -> &'static str {
    if node.is_indeterminate() {
        "[-]"
    } else if node.is_selected() {
        "[x]"
    } else {
        "[ ]"
    }
}

fn print_tree(nodes: &[CheckboxNode], depth: usize) {
    for node in nodes {
        let fold = match (node.is_leaf(), node.is_expanded()) {
            (true, _) => " ",
            (false, true) => "v",
            (false, false) => ">",
        };
        println!("{:indent$}{fold} {} {}", "", mark(node), node.title, indent = depth * 2);
        if node.is_expanded() {
            print_tree(&node.children, depth + 1);
        }
    }
}

fn report(label: &str, changes: &Changes) {
    println!("== {label}");
    print_tree(&changes.hierarchy, 0);
    let picked: Vec<&str> = changes
        .flat
        .iter()
        .filter(|n| n.is_selected())
        .map(|n| n.id.as_str())
        .collect();
    println!("selected leaves: {picked:?}");
    if let Some((key, node)) = &changes.changed {
        println!("changed: {key} {}", mark(node));
    }
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let input = serde_json::json!([
        {
            "id": "produce",
            "title": "Produce",
            "expanded": true,
            "children": [
                { "id": "pears", "title": "Pears", "order": 2 },
                { "id": "apples", "title": "Apples", "order": 1 },
                {
                    "id": "greens",
                    "title": "Greens",
                    "expanded": true,
                    "children": [
                        { "id": "kale", "title": "Kale", "selected": true },
                        { "id": "chard", "title": "Chard" }
                    ]
                }
            ]
        },
        { "id": "bread", "title": "Bread", "color": "accent" }
    ]);
    let mut nodes: Vec<CheckboxNode> = match serde_json::from_value(input) {
        Ok(nodes) => nodes,
        Err(err) => {
            eprintln!("invalid node data: {err}");
            return;
        }
    };
    sort_list_by_order(&mut nodes);

    let mut boxes = Checkboxes::from_nodes(nodes, CheckboxesConfig::default());
    report("initial", &boxes.emit_changes());

    let changes = boxes.checkbox_change("produce", true);
    report("check produce", &changes);

    boxes.checkbox_change("chard", false);
    let changes = boxes.bubble("chard");
    report("uncheck chard and bubble", &changes);

    boxes.toggle_expand("greens");
    report("collapse greens", &boxes.emit_changes());

    match serde_json::to_string_pretty(&boxes.emit_changes().flat) {
        Ok(json) => println!("flat view for persistence:\n{json}"),
        Err(err) => eprintln!("could not serialize flat view: {err}"),
    }
}
