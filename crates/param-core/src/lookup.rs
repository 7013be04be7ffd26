//! Finding a node by its global id (spec.md §4.5) or by a dotted path
//! (spec.md §4.6).

extern crate alloc;
use alloc::string::String;

use param_types::GlobalId;

use crate::node::{GroupNode, Node};

/// Path separator used by [`by_path`] (spec.md §4.6).
pub const PATH_SEPARATOR: char = '.';

/// Recursively search `root` for the node whose global id is `query`.
///
/// Mirrors the source's `ODIN_get_generic_parameter_by_id`: `shift` is a
/// per-level contribution (spec.md §3), not a cumulative one, so each
/// recursive step sums the current group's own `shift` onto the bits its
/// ancestors already fixed before building the prefix mask that its direct
/// children — leaf or subgroup alike — are tested against. Descending into a
/// matching subgroup carries that running sum forward as the next level's
/// inherited shift, exactly as the source threads `parent_shift`.
pub fn by_id(root: &GroupNode, query: GlobalId) -> Option<Node> {
    by_id_inner(root, query, 0)
}

fn by_id_inner(group: &GroupNode, query: GlobalId, parent_shift: u8) -> Option<Node> {
    let shift = parent_shift + group.shift();
    for child in group.children() {
        if !query.matches_prefix(child.global_id(), shift) {
            continue;
        }
        if child.global_id() == query {
            return Some(child.clone());
        }
        if let Node::Group(subgroup) = child {
            if let Some(found) = by_id_inner(subgroup, query, shift) {
                return Some(found);
            }
        }
    }
    None
}

/// Walk `root` following each dotted segment of `path` by name
/// (spec.md §4.6). An empty path resolves to nothing; a path naming a
/// group with no further segments resolves to that group.
pub fn by_path(root: &GroupNode, path: &str) -> Option<Node> {
    let mut segments = path.split(PATH_SEPARATOR).filter(|s| !s.is_empty());
    let first = segments.next()?;

    let mut current = find_child_by_name(root, first)?;
    for segment in segments {
        let group = current.as_group()?;
        current = find_child_by_name(group, segment)?;
    }
    Some(current)
}

fn find_child_by_name(group: &GroupNode, name: &str) -> Option<Node> {
    group.children().iter().find(|c| c.name() == name).cloned()
}

/// Render a node's absolute path from the root, joining names with
/// [`PATH_SEPARATOR`]. Used by the text codec's tree dump (spec.md §4.10).
pub fn path_of(root: &GroupNode, target: GlobalId) -> Option<String> {
    path_of_inner(root, target, 0, String::new())
}

fn path_of_inner(group: &GroupNode, target: GlobalId, parent_shift: u8, prefix: String) -> Option<String> {
    let shift = parent_shift + group.shift();
    for child in group.children() {
        let mut path = prefix.clone();
        if !path.is_empty() {
            path.push(PATH_SEPARATOR);
        }
        path.push_str(child.name());

        if child.global_id() == target {
            return Some(path);
        }
        if let Node::Group(g) = child {
            if target.matches_prefix(g.global_id(), shift) {
                if let Some(found) = path_of_inner(g, target, shift, path) {
                    return Some(found);
                }
            }
        }
    }
    None
}
