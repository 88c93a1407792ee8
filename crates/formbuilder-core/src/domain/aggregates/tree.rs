//! Field tree walkers
//!
//! Depth-unbounded helpers over a list of [`FieldNode`]s. Real documents nest
//! one level deep (GROUP > field), but nothing here relies on that.

use std::collections::HashSet;

use super::field::{FieldNode, FieldUpdate};

/// Direction of a sibling swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// First node with `id`, depth first
pub fn find<'a>(fields: &'a [FieldNode], id: &str) -> Option<&'a FieldNode> {
    for field in fields {
        if field.id == id {
            return Some(field);
        }
        if let Some(found) = find(&field.child_fields, id) {
            return Some(found);
        }
    }
    None
}

/// Root-level GROUP with `id`. Children are not searched.
pub fn root_group_mut<'a>(fields: &'a mut [FieldNode], id: &str) -> Option<&'a mut FieldNode> {
    fields.iter_mut().find(|f| f.id == id && f.is_group())
}

pub fn contains(fields: &[FieldNode], id: &str) -> bool {
    find(fields, id).is_some()
}

/// Every node in pre-order
pub fn flatten(fields: &[FieldNode]) -> Vec<&FieldNode> {
    let mut out = Vec::new();
    collect(fields, &mut out);
    out
}

fn collect<'a>(fields: &'a [FieldNode], out: &mut Vec<&'a FieldNode>) {
    for field in fields {
        out.push(field);
        collect(&field.child_fields, out);
    }
}

/// Remove every node with `id` at any depth. Returns how many were removed.
pub fn remove_all(fields: &mut Vec<FieldNode>, id: &str) -> usize {
    let before = fields.len();
    fields.retain(|f| f.id != id);
    let mut removed = before - fields.len();
    for field in fields.iter_mut() {
        removed += remove_all(&mut field.child_fields, id);
    }
    removed
}

/// Apply `update` to every node with `id`. A matched node is not descended
/// into. Returns the number of matches.
pub fn update_all(fields: &mut [FieldNode], id: &str, update: &FieldUpdate) -> usize {
    let mut matched = 0;
    for field in fields.iter_mut() {
        if field.id == id {
            field.apply(update.clone());
            matched += 1;
        } else {
            matched += update_all(&mut field.child_fields, id, update);
        }
    }
    matched
}

/// Remove-then-insert within one list. Out-of-range indexes are a no-op.
pub fn move_index(fields: &mut Vec<FieldNode>, from: usize, to: usize) -> bool {
    if from >= fields.len() || to >= fields.len() {
        return false;
    }
    let node = fields.remove(from);
    fields.insert(to, node);
    true
}

/// Swap the node with its neighbour in whichever list contains it
pub fn move_sibling(fields: &mut [FieldNode], id: &str, direction: Direction) -> bool {
    if let Some(index) = fields.iter().position(|f| f.id == id) {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|t| *t < fields.len()),
        };
        return match target {
            Some(target) => {
                fields.swap(index, target);
                true
            }
            None => false,
        };
    }
    fields
        .iter_mut()
        .any(|field| move_sibling(&mut field.child_fields, id, direction))
}

/// Ids found anywhere inside a root GROUP
pub fn grouped_ids(fields: &[FieldNode]) -> HashSet<String> {
    fields
        .iter()
        .filter(|f| f.is_group())
        .flat_map(|group| flatten(&group.child_fields))
        .map(|f| f.id.clone())
        .collect()
}

/// De-duplication pass: drop root non-GROUP fields whose id also lives
/// inside a group. GROUPs are always kept.
pub fn dedupe(fields: Vec<FieldNode>) -> Vec<FieldNode> {
    let grouped = grouped_ids(&fields);
    if grouped.is_empty() {
        return fields;
    }
    fields
        .into_iter()
        .filter(|f| f.is_group() || !grouped.contains(&f.id))
        .collect()
}

/// Deepest level of any node; root fields are level 0
pub fn nesting_depth(fields: &[FieldNode]) -> usize {
    fields
        .iter()
        .filter(|f| !f.child_fields.is_empty())
        .map(|f| 1 + nesting_depth(&f.child_fields))
        .max()
        .unwrap_or(0)
}

/// GROUPs that sit inside another GROUP
pub fn nested_groups(fields: &[FieldNode]) -> Vec<&FieldNode> {
    fields
        .iter()
        .filter(|f| f.is_group())
        .flat_map(|group| flatten(&group.child_fields))
        .filter(|f| f.is_group())
        .collect()
}
