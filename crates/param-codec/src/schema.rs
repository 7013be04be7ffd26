//! The schema (object-tree) codec (spec.md §4.9): publishes group structure
//! as nested JSON objects, leaves as `name -> global_id` entries. No access
//! gating — this is schema publication, not value transport.

extern crate alloc;

use param_core::node::{GroupNode, Node};
use serde_json::{Map, Value};

/// Render `group` and everything beneath it as a JSON object.
///
/// The source's schema encoder recurses into a variable named `group` that
/// shadows the outer parameter (spec.md §9 open question); here the child
/// group's own name keys the emitted object at its parent, matching how
/// [`param_core::lookup::by_path`] addresses it.
pub fn schema_of(group: &GroupNode) -> Value {
    let mut object = Map::new();
    for child in group.children() {
        match child {
            Node::Leaf(leaf) => {
                object.insert(leaf.name().into(), Value::from(u32::from(leaf.global_id())));
            }
            Node::Group(subgroup) => {
                object.insert(subgroup.name().into(), schema_of(subgroup));
            }
        }
    }
    Value::Object(object)
}
