//! Forest assembly from flat page records.
//!
//! Records are registered in input order, then each one is placed either as a
//! root or under its parent. Order is fully determined by the input: roots and
//! every parent's children appear in the order their records were first seen.
//!
//! Placement rules:
//! - no parent (or an empty parent id) makes a root
//! - a parent id naming no record in the input also makes a root
//! - otherwise the record is appended to its parent's children
//!
//! Duplicate ids collapse to a single node: the last record wins, at the
//! position where the id first appeared.

use crate::models::{PageId, PageNode, PageRecord};
use std::collections::HashMap;

/// Builds an ordered forest from flat records. Never fails.
///
/// Input must be acyclic. Records caught in a parent cycle are never reachable
/// from a root and are left out of the result.
#[must_use]
pub fn build_tree<I>(pages: I) -> Vec<PageNode>
where
    I: IntoIterator<Item = PageRecord>,
{
    let (records, index) = register(pages);
    let (roots, children) = place(&records, &index);
    assemble(records, &roots, &children)
}

/// First pass: id -> slot, slots kept in first-insertion order.
fn register<I>(pages: I) -> (Vec<PageRecord>, HashMap<PageId, usize>)
where
    I: IntoIterator<Item = PageRecord>,
{
    let mut records: Vec<PageRecord> = Vec::new();
    let mut index: HashMap<PageId, usize> = HashMap::new();

    for page in pages {
        if let Some(&slot) = index.get(&page.id) {
            tracing::debug!(page_id = %page.id, "Duplicate page id, last record wins");
            records[slot] = page;
        } else {
            index.insert(page.id.clone(), records.len());
            records.push(page);
        }
    }

    (records, index)
}

/// Second pass: walk slots in order, attaching each to its parent or the roots.
fn place(records: &[PageRecord], index: &HashMap<PageId, usize>) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];

    for (slot, page) in records.iter().enumerate() {
        let Some(parent_id) = page.parent() else {
            roots.push(slot);
            continue;
        };

        if let Some(&parent) = index.get(parent_id) {
            children[parent].push(slot);
        } else {
            tracing::debug!(
                page_id = %page.id,
                parent_id = %parent_id,
                "Parent not found, placing page at root"
            );
            roots.push(slot);
        }
    }

    (roots, children)
}

/// Moves records into nodes, deepest first, so every child is finished
/// before its parent claims it.
fn assemble(records: Vec<PageRecord>, roots: &[usize], children: &[Vec<usize>]) -> Vec<PageNode> {
    let total = records.len();

    let mut order = Vec::with_capacity(total);
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(slot) = stack.pop() {
        order.push(slot);
        stack.extend(children[slot].iter().rev());
    }

    if order.len() < total {
        tracing::debug!(
            unreachable = total - order.len(),
            "Pages in a parent cycle were left out of the tree"
        );
    }

    let mut pending: Vec<Option<PageRecord>> = records.into_iter().map(Some).collect();
    let mut built: Vec<Option<PageNode>> = std::iter::repeat_with(|| None).take(total).collect();

    for &slot in order.iter().rev() {
        let Some(page) = pending[slot].take() else {
            continue;
        };
        let kids = children[slot]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[slot] = Some(PageNode {
            page,
            children: kids,
        });
    }

    roots.iter().filter_map(|&slot| built[slot].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(nodes: &[PageNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id().as_str()).collect()
    }

    #[test]
    fn test_builds_nested_tree_from_parent_child_relations() {
        let pages = vec![
            PageRecord::new("1", "Root"),
            PageRecord::new("2", "Child").with_parent("1"),
            PageRecord::new("3", "Grandchild").with_parent("2"),
        ];

        let tree = build_tree(pages);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id(), "1");
        assert_eq!(tree[0].children[0].id(), "2");
        assert_eq!(tree[0].children[0].children[0].id(), "3");
    }

    #[test]
    fn test_missing_parent_becomes_root() {
        let pages = vec![PageRecord::new("1", "Orphan").with_parent("missing")];

        let tree = build_tree(pages);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id(), "1");
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(Vec::<PageRecord>::new()).is_empty());
    }

    #[test]
    fn test_empty_parent_id_is_root() {
        let pages = vec![
            PageRecord::new("", "Unnamed"),
            PageRecord::new("1", "Blank parent").with_parent(""),
        ];

        let tree = build_tree(pages);

        assert_eq!(ids(&tree), vec!["", "1"]);
    }

    #[test]
    fn test_child_listed_before_parent() {
        let pages = vec![
            PageRecord::new("c", "Child").with_parent("p"),
            PageRecord::new("p", "Parent"),
        ];

        let tree = build_tree(pages);

        assert_eq!(ids(&tree), vec!["p"]);
        assert_eq!(ids(&tree[0].children), vec!["c"]);
    }

    #[test]
    fn test_root_and_sibling_order_follow_input() {
        let pages = vec![
            PageRecord::new("b", "B"),
            PageRecord::new("b2", "B2").with_parent("b"),
            PageRecord::new("a", "A"),
            PageRecord::new("b1", "B1").with_parent("b"),
            PageRecord::new("orphan", "O").with_parent("gone"),
            PageRecord::new("b3", "B3").with_parent("b"),
        ];

        let tree = build_tree(pages);

        assert_eq!(ids(&tree), vec!["b", "a", "orphan"]);
        assert_eq!(ids(&tree[0].children), vec!["b2", "b1", "b3"]);
    }

    #[test]
    fn test_duplicate_id_last_write_wins_at_first_position() {
        let pages = vec![
            PageRecord::new("x", "First"),
            PageRecord::new("y", "Other"),
            PageRecord::new("x", "Second").with_parent("y"),
        ];

        let tree = build_tree(pages);

        assert_eq!(ids(&tree), vec!["y"]);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].title(), "Second");
    }

    #[test]
    fn test_self_parent_is_dropped_without_looping() {
        let pages = vec![
            PageRecord::new("root", "Root"),
            PageRecord::new("loop", "Loop").with_parent("loop"),
        ];

        let tree = build_tree(pages);

        assert_eq!(ids(&tree), vec!["root"]);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_record_fields_survive() {
        let pages = vec![
            PageRecord::new("1", "Alice")
                .with_summary("engineer")
                .with_keywords(["robotics"])
                .with_vividness("vivid")
                .with_flags(true, true),
        ];

        let tree = build_tree(pages);

        let page = &tree[0].page;
        assert_eq!(page.summary, "engineer");
        assert_eq!(page.keywords, vec!["robotics".to_string()]);
        assert_eq!(page.vividness, "vivid");
        assert!(page.is_trunk && page.is_important);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let depth = 50_000;
        let pages = (0..depth).map(|i| {
            let record = PageRecord::new(i.to_string(), format!("Level {i}"));
            if i == 0 {
                record
            } else {
                record.with_parent((i - 1).to_string())
            }
        });

        let tree = build_tree(pages);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].descendants().count(), depth);
        // Nested Vec drops recurse; unwind the chain by hand.
        let mut stack = tree;
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}
