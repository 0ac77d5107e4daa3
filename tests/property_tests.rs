//! Property-based tests for tree assembly and search.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Every page of an acyclic input appears exactly once
//! - Roots and siblings keep their input order
//! - Nesting and flat parent references assemble the same forest
//! - Blank queries never match
//! - Matching is case-insensitive substring containment

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use memopedia::models::{Category, MemopediaForest, PageNode, PageRecord, RawPage};
use memopedia::services::{build_tree, normalize_category, search_forest};
use proptest::prelude::*;
use std::collections::HashMap;

/// Parent choice for the page at index `i`.
#[derive(Debug, Clone)]
enum ParentChoice {
    Root,
    Earlier(usize),
    Dangling,
}

fn parent_choice() -> impl Strategy<Value = ParentChoice> {
    prop_oneof![
        2 => Just(ParentChoice::Root),
        5 => any::<usize>().prop_map(ParentChoice::Earlier),
        1 => Just(ParentChoice::Dangling),
    ]
}

/// Acyclic records with unique ids, in shuffled order.
///
/// Parents always point at a lower index, so cycles are impossible whatever
/// order the records are presented in.
fn records() -> impl Strategy<Value = Vec<PageRecord>> {
    prop::collection::vec((parent_choice(), "[a-z ]{0,12}"), 0..40)
        .prop_map(|choices| {
            choices
                .into_iter()
                .enumerate()
                .map(|(i, (choice, summary))| {
                    let record = PageRecord::new(format!("p{i}"), format!("Page {i}"))
                        .with_summary(summary);
                    match choice {
                        ParentChoice::Root => record,
                        ParentChoice::Earlier(_) if i == 0 => record,
                        ParentChoice::Earlier(n) => record.with_parent(format!("p{}", n % i)),
                        ParentChoice::Dangling => record.with_parent(format!("missing{i}")),
                    }
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn pre_order(nodes: &[PageNode]) -> Vec<(String, usize)> {
    let mut out = Vec::new();
    let mut stack: Vec<(&PageNode, usize)> = nodes.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        out.push((node.id().to_string(), depth));
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
    out
}

fn to_raw(node: &PageNode) -> RawPage {
    RawPage {
        id: node.page.id.clone(),
        title: node.page.title.clone(),
        summary: node.page.summary.clone(),
        keywords: node.page.keywords.clone(),
        vividness: node.page.vividness.clone(),
        is_trunk: node.page.is_trunk,
        is_important: node.page.is_important,
        children: node.children.iter().map(to_raw).collect(),
    }
}

proptest! {
    /// Property: each input id occurs exactly once in the output.
    #[test]
    fn prop_every_page_appears_once(records in records()) {
        let forest = build_tree(records.clone());
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (id, _) in pre_order(&forest) {
            *seen.entry(id).or_default() += 1;
        }

        prop_assert_eq!(seen.len(), records.len());
        prop_assert!(seen.values().all(|count| *count == 1));
    }

    /// Property: a node sits under its declared parent when that parent exists.
    #[test]
    fn prop_children_sit_under_their_parent(records in records()) {
        let ids: Vec<String> = records.iter().map(|r| r.id.to_string()).collect();
        let forest = build_tree(records.clone());

        let mut actual_parent: HashMap<String, Option<String>> = HashMap::new();
        let mut stack: Vec<(&PageNode, Option<String>)> = forest.iter().map(|n| (n, None)).collect();
        while let Some((node, parent)) = stack.pop() {
            actual_parent.insert(node.id().to_string(), parent);
            stack.extend(node.children.iter().map(|c| (c, Some(node.id().to_string()))));
        }

        for record in &records {
            let expected = record
                .parent_id
                .as_ref()
                .map(ToString::to_string)
                .filter(|p| ids.contains(p));
            prop_assert_eq!(&actual_parent[record.id.as_str()], &expected);
        }
    }

    /// Property: roots and every sibling group follow input order.
    #[test]
    fn prop_input_order_is_preserved(records in records()) {
        let position: HashMap<String, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.to_string(), i))
            .collect();
        let forest = build_tree(records);

        let mut groups: Vec<&[PageNode]> = vec![&forest];
        while let Some(group) = groups.pop() {
            let order: Vec<usize> = group.iter().map(|n| position[n.id().as_str()]).collect();
            prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
            groups.extend(group.iter().map(|n| n.children.as_slice()));
        }
    }

    /// Property: nesting a forest and normalizing it reproduces its shape.
    #[test]
    fn prop_nested_round_trip(records in records()) {
        let forest = build_tree(records);
        let raw: Vec<RawPage> = forest.iter().map(to_raw).collect();

        let normalized = normalize_category(&raw);

        prop_assert_eq!(pre_order(&normalized), pre_order(&forest));
    }

    /// Property: whitespace-only queries match nothing.
    #[test]
    fn prop_blank_query_matches_nothing(records in records(), query in "[ \t\n]{0,5}") {
        let mut forest = MemopediaForest::default();
        forest.set(Category::Terms, build_tree(records));
        prop_assert!(search_forest(&forest, &query).is_empty());
    }

    /// Property: any case variant of a title substring finds the page.
    #[test]
    fn prop_case_insensitive_substring(
        title in "[a-zA-Z]{3,12}",
        start in 0usize..3,
        upper in any::<bool>(),
    ) {
        let mut forest = MemopediaForest::default();
        forest.set(Category::People, build_tree(vec![PageRecord::new("x", title.clone())]));

        let fragment = &title[start..];
        let query = if upper { fragment.to_uppercase() } else { fragment.to_lowercase() };

        let results = search_forest(&forest, &query);
        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(results[0].page.id().as_str(), "x");
    }
}
