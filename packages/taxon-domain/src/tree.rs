//! Tree shaping for a hydrated category set.
//!
//! Every function here consumes its input and hands back freshly built nodes, so records
//! shared with a store layer are never mutated in place.

use std::collections::{HashMap, HashSet};

use crate::{CategoryId, CategoryNode};

/// Attaches every node under its parent when the parent is part of the set.
///
/// The flat collection is returned in input order and each entry carries its full subtree.
/// Nodes whose parent is `root_parent_id`, or whose parent is absent, stay unattached.
/// Siblings are ordered by `(display_order, cid)`.
pub fn build_tree(nodes: Vec<CategoryNode>, root_parent_id: CategoryId) -> Vec<CategoryNode> {
	let mut present = HashSet::with_capacity(nodes.len());

	for node in &nodes {
		present.insert(node.cid);
	}

	let mut child_slots: HashMap<CategoryId, Vec<usize>> = HashMap::new();

	for (slot, node) in nodes.iter().enumerate() {
		if node.parent_id == root_parent_id || node.parent_id == node.cid {
			continue;
		}
		if present.contains(&node.parent_id) {
			child_slots.entry(node.parent_id).or_default().push(slot);
		}
	}

	for slots in child_slots.values_mut() {
		slots.sort_by_key(|&slot| (nodes[slot].display_order, nodes[slot].cid));
	}

	let mut path = Vec::new();

	(0..nodes.len()).map(|slot| subtree(&nodes, &child_slots, slot, &mut path)).collect()
}

/// Caps each node's children at its own `children_per_page_limit`, then strips the
/// children of every kept child so only one level of nesting remains.
pub fn trim_children(nodes: Vec<CategoryNode>) -> Vec<CategoryNode> {
	nodes
		.into_iter()
		.map(|mut node| {
			if !node.children.is_empty() {
				node.children.truncate(node.children_per_page_limit);

				for child in &mut node.children {
					child.children.clear();
				}
			}

			node
		})
		.collect()
}

/// Stable ordering by `(parent_id, display_order)`.
pub fn sort_for_display(nodes: &mut [CategoryNode]) {
	nodes.sort_by_key(|node| (node.parent_id, node.display_order));
}

/// Keeps the nodes listed in `page_ids`, preserving their current relative order.
pub fn select_page(nodes: Vec<CategoryNode>, page_ids: &[CategoryId]) -> Vec<CategoryNode> {
	let wanted: HashSet<CategoryId> = page_ids.iter().copied().collect();

	nodes.into_iter().filter(|node| wanted.contains(&node.cid)).collect()
}

fn subtree(
	nodes: &[CategoryNode],
	child_slots: &HashMap<CategoryId, Vec<usize>>,
	slot: usize,
	path: &mut Vec<CategoryId>,
) -> CategoryNode {
	let mut node = nodes[slot].clone();

	node.children.clear();
	path.push(node.cid);

	if let Some(slots) = child_slots.get(&node.cid) {
		for &child in slots {
			// Cycle in the parent links.
			if path.contains(&nodes[child].cid) {
				continue;
			}

			node.children.push(subtree(nodes, child_slots, child, path));
		}
	}

	path.pop();

	node
}
