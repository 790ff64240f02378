//! End-to-end tree state behavior through the controller.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;
use treenav::nav::{Command, Controller, NavSession, NavTree, Node, TreeBuilder};

fn scenario() -> Vec<Node> {
    vec![
        Node::new("A", "Alpha").with_children(vec![Node::new("A1", "Apple")]),
        Node::new("B", "Beta").with_children(vec![Node::new("B1", "Ball")]),
    ]
}

fn initialized(nodes: &[Node]) -> Controller {
    let mut controller = Controller::default();
    controller.initialize(nodes);
    controller
}

fn session(controller: &Controller) -> &NavSession {
    controller.session().expect("controller initialized")
}

fn hidden(tree: &NavTree, id: &str) -> bool {
    tree.by_id(id).expect("known id").is_hidden()
}

fn displayed_ids(tree: &NavTree) -> Vec<String> {
    tree.displayed()
        .into_iter()
        .map(|k| tree.node(k).id().to_string())
        .collect()
}

fn visible_roots(tree: &NavTree) -> Vec<&str> {
    tree.roots()
        .iter()
        .map(|&k| tree.node(k))
        .filter(|n| !n.is_hidden())
        .map(|n| n.id())
        .collect()
}

#[test]
fn registry_holds_exactly_the_input_ids() {
    let nodes = scenario();
    let tree = TreeBuilder::build(&nodes);
    let ids: HashSet<&str> = tree.ids().collect();
    assert_eq!(ids, HashSet::from(["A", "A1", "B", "B1"]));
    assert_eq!(tree.len(), 4);
}

#[test]
fn search_then_clear_returns_to_selected_tab() {
    let mut controller = initialized(&scenario());

    controller.dispatch(Command::SelectTab("B".into()));
    {
        let tree = &session(&controller).tree;
        assert!(!hidden(tree, "B"));
        assert!(!hidden(tree, "B1"));
        assert!(hidden(tree, "A"));
    }

    controller.dispatch(Command::Search("app".into()));
    {
        let tree = &session(&controller).tree;
        assert!(!hidden(tree, "A1"));
        assert_eq!(tree.by_id("A1").unwrap().highlights(), &[0..3]);
        assert!(!hidden(tree, "A"));
        assert!(hidden(tree, "B"));
        assert!(hidden(tree, "B1"));
    }

    controller.dispatch(Command::Search(String::new()));
    let s = session(&controller);
    assert_eq!(s.tabs.selected_id(), Some("B"));
    assert_eq!(visible_roots(&s.tree), vec!["B"]);
    assert!(s.tree.by_id("A1").unwrap().highlights().is_empty());
    assert!(!s.search.is_active());
}

#[test]
fn sort_alpha_then_default_round_trips() {
    let nodes = vec![Node::new("P", "Parent")
        .with_children(vec![Node::new("Z", "Zeta"), Node::new("A", "Alpha")])];
    let mut controller = initialized(&nodes);

    controller.dispatch(Command::SortAlpha);
    assert_eq!(session(&controller).tree.child_labels("P"), vec!["Alpha", "Zeta"]);

    controller.dispatch(Command::SortDefault);
    assert_eq!(session(&controller).tree.child_labels("P"), vec!["Zeta", "Alpha"]);
}

#[test]
fn sort_default_ends_search_and_restores_tab() {
    let mut controller = initialized(&scenario());
    controller.dispatch(Command::SelectTab("B".into()));
    controller.dispatch(Command::Search("app".into()));
    controller.dispatch(Command::SortDefault);

    let s = session(&controller);
    assert!(!s.search.is_active());
    assert_eq!(visible_roots(&s.tree), vec!["B"]);
    assert!(s.tree.by_id("A1").unwrap().highlights().is_empty());
}

#[test]
fn expand_all_then_collapse_all_keeps_only_second_tier_open() {
    let nodes = vec![Node::new("A", "Alpha").with_children(vec![Node::new("A1", "One")
        .with_children(vec![Node::new("A1a", "Deep")
            .with_children(vec![Node::new("A1a1", "Deeper")])])])];
    let mut controller = initialized(&nodes);

    controller.dispatch(Command::ExpandAll);
    assert!(session(&controller).expansion.is_expanded());
    assert_eq!(session(&controller).tree.by_id("A1a").unwrap().is_collapsed(), Some(false));

    controller.dispatch(Command::CollapseAll);
    let s = session(&controller);
    assert!(!s.expansion.is_expanded());
    assert_eq!(s.tree.by_id("A").unwrap().is_collapsed(), Some(false));
    assert_eq!(s.tree.by_id("A1").unwrap().is_collapsed(), Some(true));
    assert_eq!(s.tree.by_id("A1a").unwrap().is_collapsed(), Some(true));
    assert_eq!(displayed_ids(&s.tree), vec!["A", "A1"]);
}

#[test]
fn toggle_state_survives_sorting() {
    let nodes = vec![Node::new("A", "Alpha").with_children(vec![
        Node::new("A2", "Zed").with_children(vec![Node::new("A2a", "Leaf")]),
        Node::new("A1", "Ace"),
    ])];
    let mut controller = initialized(&nodes);
    controller.dispatch(Command::Toggle("A2".into()));
    assert_eq!(session(&controller).expansion.visibility_of("A2"), Some(false));

    controller.dispatch(Command::SortAlpha);
    controller.dispatch(Command::SortDefault);
    assert_eq!(session(&controller).expansion.visibility_of("A2"), Some(false));
}

#[test]
fn clearing_search_restores_toggled_submenus() {
    let nodes = vec![Node::new("A", "Alpha").with_children(vec![
        Node::new("A1", "One").with_children(vec![Node::new("A1a", "Deep")]),
        Node::new("A2", "Two"),
    ])];
    let mut controller = initialized(&nodes);
    controller.dispatch(Command::Toggle("A1".into()));
    assert_eq!(session(&controller).tree.by_id("A1").unwrap().is_collapsed(), Some(false));

    controller.dispatch(Command::Search("two".into()));
    assert!(hidden(&session(&controller).tree, "A1"));

    controller.dispatch(Command::Search(String::new()));
    let tree = &session(&controller).tree;
    assert_eq!(tree.by_id("A1").unwrap().is_collapsed(), Some(false));
    assert_eq!(displayed_ids(tree), vec!["A", "A1", "A1a", "A2"]);
}

#[test]
fn sort_alpha_collates_accented_labels() {
    let nodes = vec![Node::new("P", "Parent").with_children(vec![
        Node::new("z", "Zebra"),
        Node::new("e", "Éclair"),
        Node::new("a", "apple"),
    ])];
    let mut controller = initialized(&nodes);
    controller.dispatch(Command::SortAlpha);
    assert_eq!(
        session(&controller).tree.child_labels("P"),
        vec!["apple", "Éclair", "Zebra"]
    );
}

#[test]
fn commands_before_load_are_noops() {
    let mut controller = Controller::default();
    assert!(controller.dispatch(Command::SortDefault).is_empty());
    assert!(controller.dispatch(Command::Toggle("A".into())).is_empty());
    assert!(controller.session().is_none());
}

#[test]
fn stale_ids_are_ignored() {
    let mut controller = initialized(&scenario());
    assert!(controller.dispatch(Command::SelectTab("gone".into())).is_empty());
    assert!(controller.dispatch(Command::Toggle("gone".into())).is_empty());
    assert_eq!(session(&controller).tabs.selected_id(), Some("A"));
}

// ============================================================================
// Properties
// ============================================================================

#[derive(Debug, Clone)]
struct Shape {
    label: String,
    children: Vec<Shape>,
}

const PLAIN_LABEL: &str = "[a-cA-C]{1,4}";
const ACCENTED_LABEL: &str = "[abceABCEàáâÀÁçÇéèÉÈ]{1,4}";

fn arb_shape(label: &'static str) -> impl Strategy<Value = Shape> {
    let leaf = label.prop_map(|label| Shape {
        label,
        children: Vec::new(),
    });
    leaf.prop_recursive(3, 32, 4, move |inner| {
        (label, prop::collection::vec(inner, 0..4))
            .prop_map(|(label, children)| Shape { label, children })
    })
}

fn arb_forest() -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(arb_shape(PLAIN_LABEL), 1..5)
}

fn arb_accented_forest() -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(arb_shape(ACCENTED_LABEL), 1..5)
}

/// Label with case and accents folded away: the collation's primary level
/// for the letters `ACCENTED_LABEL` draws from.
fn base_letters(label: &str) -> String {
    label
        .chars()
        .map(|c| match c.to_lowercase().next().unwrap_or(c) {
            'à' | 'á' | 'â' => 'a',
            'ç' => 'c',
            'é' | 'è' => 'e',
            other => other,
        })
        .collect()
}

fn to_nodes(shapes: &[Shape], next_id: &mut usize) -> Vec<Node> {
    shapes
        .iter()
        .map(|shape| {
            let id = format!("n{next_id}");
            *next_id += 1;
            let children = to_nodes(&shape.children, next_id);
            Node::new(id, shape.label.clone()).with_children(children)
        })
        .collect()
}

/// Ids that must be visible for `query`: own or descendant match.
fn expected_visible(nodes: &[Node], query: &str, out: &mut HashSet<String>) -> bool {
    let mut any = false;
    for node in nodes {
        let below = expected_visible(&node.children, query, out);
        if below || node.label.to_lowercase().contains(query) {
            out.insert(node.id.clone());
            any = true;
        }
    }
    any
}

fn sibling_labels(nodes: &[Node], out: &mut Vec<(Option<String>, Vec<String>)>, parent: Option<&str>) {
    out.push((
        parent.map(str::to_owned),
        nodes.iter().map(|n| n.label.clone()).collect(),
    ));
    for node in nodes {
        if !node.children.is_empty() {
            sibling_labels(&node.children, out, Some(node.id.as_str()));
        }
    }
}

fn tree_sibling_labels(tree: &NavTree, nodes: &[Node]) -> Vec<(Option<String>, Vec<String>)> {
    let mut groups = vec![(
        None,
        tree.roots()
            .iter()
            .map(|&k| tree.node(k).label().to_string())
            .collect(),
    )];
    fn walk(tree: &NavTree, nodes: &[Node], out: &mut Vec<(Option<String>, Vec<String>)>) {
        for node in nodes {
            if !node.children.is_empty() {
                out.push((
                    Some(node.id.clone()),
                    tree.child_labels(&node.id).into_iter().map(str::to_owned).collect(),
                ));
                walk(tree, &node.children, out);
            }
        }
    }
    walk(tree, nodes, &mut groups);
    groups
}

proptest! {
    #[test]
    fn search_visibility_is_own_or_descendant_match(
        forest in arb_forest(),
        query in "[a-cA-C]{1,2}",
    ) {
        let nodes = to_nodes(&forest, &mut 0);
        let mut controller = initialized(&nodes);
        controller.dispatch(Command::Search(query.clone()));

        let mut expected = HashSet::new();
        expected_visible(&nodes, &query.to_lowercase(), &mut expected);

        let tree = &session(&controller).tree;
        let visible: HashSet<String> = tree
            .keys()
            .map(|k| tree.node(k))
            .filter(|n| !n.is_hidden())
            .map(|n| n.id().to_string())
            .collect();
        prop_assert_eq!(visible, expected);
    }

    #[test]
    fn empty_query_matches_clear_search(
        forest in arb_forest(),
        query in "[a-cA-C]{1,2}",
    ) {
        let nodes = to_nodes(&forest, &mut 0);

        let mut via_apply = initialized(&nodes);
        via_apply.dispatch(Command::Search(query.clone()));
        via_apply.dispatch(Command::Search(String::new()));

        let mut via_clear = initialized(&nodes);
        via_clear.dispatch(Command::Search(query));
        via_clear.dispatch(Command::ClearSearch);

        prop_assert_eq!(
            displayed_ids(&session(&via_apply).tree),
            displayed_ids(&session(&via_clear).tree)
        );
    }

    #[test]
    fn sort_default_restores_original_order(
        forest in arb_forest(),
        rounds in 1usize..4,
    ) {
        let nodes = to_nodes(&forest, &mut 0);
        let mut controller = initialized(&nodes);
        for _ in 0..rounds {
            controller.dispatch(Command::SortAlpha);
        }
        controller.dispatch(Command::SortDefault);

        let mut expected = Vec::new();
        sibling_labels(&nodes, &mut expected, None);
        prop_assert_eq!(tree_sibling_labels(&session(&controller).tree, &nodes), expected);
    }

    #[test]
    fn sort_alpha_orders_by_base_letters(forest in arb_accented_forest()) {
        let nodes = to_nodes(&forest, &mut 0);
        let mut controller = initialized(&nodes);
        controller.dispatch(Command::SortAlpha);

        let tree = &session(&controller).tree;
        for (parent, _) in tree_sibling_labels(tree, &nodes).into_iter().skip(1) {
            let Some(parent) = parent else { continue };
            let keys: Vec<String> = tree
                .child_labels(&parent)
                .into_iter()
                .map(base_letters)
                .collect();
            prop_assert!(
                keys.windows(2).all(|w| w[0] <= w[1]),
                "children of {} out of order: {:?}",
                parent,
                keys
            );
        }
    }

    #[test]
    fn exactly_one_tab_after_any_selection_sequence(
        forest in arb_forest(),
        picks in prop::collection::vec(0usize..6, 1..10),
    ) {
        let nodes = to_nodes(&forest, &mut 0);
        let mut controller = initialized(&nodes);
        let tab_ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();

        for pick in picks {
            // Out-of-range picks name a tab that does not exist
            let id = tab_ids.get(pick).cloned().unwrap_or_else(|| "missing".into());
            controller.dispatch(Command::SelectTab(id));
        }

        let s = session(&controller);
        prop_assert_eq!(visible_roots(&s.tree).len(), 1);
        let selected = tab_ids.iter().filter(|id| s.tabs.is_selected(id)).count();
        prop_assert_eq!(selected, 1);
    }
}
