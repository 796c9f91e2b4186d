//! Exploring self-referential and branching schemas.

use inspection::{Node, TypeGraphExplorer};
use model::{AttributeDescriptor, AttributeName, StaticSchema, TypeName};

fn ty(name: &str) -> TypeName {
    TypeName::new(name).expect("non-empty")
}

fn attr(name: &str, declared: &str, composite: bool) -> AttributeDescriptor {
    AttributeDescriptor::new(AttributeName::new(name).expect("non-empty"), ty(declared), composite)
}

fn paths(schema: &StaticSchema, root: &str) -> Vec<String> {
    TypeGraphExplorer::new(schema)
        .explore(&ty(root))
        .map(|node| node.trail().full_path())
        .collect()
}

#[test]
fn direct_self_reference_terminates_one_step_past_the_cycle() {
    let schema = StaticSchema::new()
        .with_attribute(&ty("Node"), attr("label", "string", false))
        .with_attribute(&ty("Node"), attr("next", "Node", true));

    let nodes: Vec<_> = TypeGraphExplorer::new(&schema).explore(&ty("Node")).collect();

    let rendered: Vec<_> = nodes.iter().map(|n| n.trail().full_path()).collect();
    assert_eq!(rendered, ["Node", "Node.label", "Node.next"]);
    assert!(nodes[2].is_guarded());
    assert_eq!(nodes.iter().map(|n| n.depth()).max(), Some(2));
}

#[test]
fn indirect_cycle_is_guarded_at_the_repeated_type() {
    let schema = StaticSchema::new()
        .with_attribute(&ty("A"), attr("b", "B", true))
        .with_attribute(&ty("B"), attr("a", "A", true));

    let nodes: Vec<_> = TypeGraphExplorer::new(&schema).explore(&ty("A")).collect();

    let rendered: Vec<_> = nodes.iter().map(|n| n.trail().full_path()).collect();
    assert_eq!(rendered, ["A", "A.b", "A.b.a"]);
    let guarded: Vec<_> = nodes.iter().map(|n| n.is_guarded()).collect();
    assert_eq!(guarded, [false, false, true]);
    assert_eq!(nodes.iter().map(|n| n.depth()).max(), Some(3));
}

#[test]
fn sibling_repeats_are_not_guarded() {
    let schema = StaticSchema::new()
        .with_attribute(&ty("Trade"), attr("buyer", "Party", true))
        .with_attribute(&ty("Trade"), attr("seller", "Party", true))
        .with_attribute(&ty("Party"), attr("name", "string", false));

    let nodes: Vec<_> = TypeGraphExplorer::new(&schema).explore(&ty("Trade")).collect();

    assert!(nodes.iter().all(|n| !n.is_guarded()));
    let rendered: Vec<_> = nodes.iter().map(|n| n.trail().full_path()).collect();
    assert_eq!(
        rendered,
        ["Trade", "Trade.buyer", "Trade.buyer.name", "Trade.seller", "Trade.seller.name"]
    );
}

#[test]
fn exploration_is_restartable() {
    let schema = StaticSchema::new()
        .with_attribute(&ty("A"), attr("b", "B", true))
        .with_attribute(&ty("B"), attr("a", "A", true))
        .with_attribute(&ty("B"), attr("c", "C", true));

    assert_eq!(paths(&schema, "A"), paths(&schema, "A"));
}

#[test]
fn reachable_types_collects_composites_once() {
    let schema = StaticSchema::new()
        .with_attribute(&ty("Trade"), attr("buyer", "Party", true))
        .with_attribute(&ty("Trade"), attr("seller", "Party", true))
        .with_attribute(&ty("Trade"), attr("tradeDate", "date", false))
        .with_attribute(&ty("Party"), attr("trade", "Trade", true));

    let reachable: Vec<_> = TypeGraphExplorer::new(&schema)
        .reachable_types(&ty("Trade"))
        .into_iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(reachable, ["Party", "Trade"]);
}

#[test]
fn relative_path_omits_root_type() {
    let schema = StaticSchema::new().with_attribute(&ty("Trade"), attr("party", "Party", true));
    let last = TypeGraphExplorer::new(&schema)
        .explore(&ty("Trade"))
        .last()
        .expect("at least the root");
    assert_eq!(last.trail().relative_path(), "party");
    assert_eq!(last.get().full_path(), "Trade.party");
}
