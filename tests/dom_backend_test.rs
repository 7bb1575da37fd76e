//! Tests for building DOM nodes through the TreeBuilder

use markup_builder::backends::dom::{DomBackend, NodeData, NodeId, TreeDisplay};
use markup_builder::backends::BackendError;
use markup_builder::builder::{Content, Embedded, Scalar, TreeBuilder};
use markup_builder::config::DomSettings;
use markup_builder::content;
use markup_builder::util::testing::init_test_setup;

type C = Content<'static, NodeId>;

fn builder() -> TreeBuilder<DomBackend> {
    init_test_setup();
    TreeBuilder::dom()
}

#[test]
fn given_nested_elements_when_building_then_children_linked_in_order() {
    // Arrange
    let b = builder();
    let li = b.make("li");

    // Act
    let first = li.call(content!["one"]).unwrap();
    let second = li.call(content!["two"]).unwrap();
    let list = b
        .make("ul")
        .build(content![C::node(first), C::node(second)], [("class", "menu")])
        .unwrap();

    // Assert
    let document = b.backend().document();
    assert_eq!(document.children(list), &[first, second]);
    assert_eq!(document.parent(first), Some(list));
    assert_eq!(document.text_content(list), "onetwo");
    match &document.node(list).unwrap().data {
        NodeData::Element { name, attributes } => {
            assert_eq!(name, "ul");
            assert_eq!(attributes.get("class"), Some(&Scalar::from("menu")));
        }
        other => panic!("expected element, got {:?}", other),
    }
}

#[test]
fn given_built_tree_when_serializing_then_matches_markup() {
    // Arrange
    let b = builder();
    let br = b.make("br").empty().unwrap();

    // Act
    let p = b
        .make("p")
        .call(content![C::attrs([("id", "x")]), "a & b", C::node(br), 3])
        .unwrap();

    // Assert
    assert_eq!(
        b.backend().serialize(p).unwrap(),
        r#"<p id="x">a &amp; b<br/>3</p>"#
    );
}

#[test]
fn given_open_close_setting_when_serializing_then_no_self_closing() {
    // Arrange
    let settings = DomSettings {
        self_close_empty: false,
        ..DomSettings::default()
    };
    let b = TreeBuilder::new(DomBackend::from_settings(&settings));

    // Act
    let div = b.make("div").empty().unwrap();

    // Assert
    assert_eq!(b.backend().serialize(div).unwrap(), "<div></div>");
}

#[test]
fn given_attached_node_when_reused_then_moved_to_new_parent() {
    // Arrange
    let b = builder();
    let shared = b.make("span").call(content!["s"]).unwrap();
    let first = b.make("p").call(content![C::node(shared)]).unwrap();

    // Act
    let second = b.make("div").call(content![C::node(shared)]).unwrap();

    // Assert
    let document = b.backend().document();
    assert!(document.children(first).is_empty());
    assert_eq!(document.children(second), &[shared]);
}

#[test]
fn given_text_and_node_when_embedding_then_nodes_stay_detached() {
    // Arrange
    let b = builder();
    let em = b.make("em").empty().unwrap();

    // Act
    let embedded = b.embed(content!["loose", C::node(em)]).unwrap();

    // Assert
    let nodes = embedded.into_vec();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1], em);
    let document = b.backend().document();
    assert_eq!(document.parent(nodes[0]), None);
    assert_eq!(
        document.node(nodes[0]).unwrap().data,
        NodeData::Text("loose".into())
    );
}

#[test]
fn given_single_text_when_embedding_then_single_text_node() {
    // Act
    let b = builder();
    let embedded = b.embed(content![C::None, "only"]).unwrap();

    // Assert
    match embedded {
        Embedded::Single(id) => assert_eq!(b.backend().document().text_content(id), "only"),
        other => panic!("expected single node, got {:?}", other),
    }
}

#[test]
fn given_node_from_other_backend_when_building_then_unknown_node_error() {
    // Arrange
    let other = builder();
    let foreign = other.make("a").empty().unwrap();
    let local = builder();
    let mine = local.make("b").empty().unwrap();
    let before = local.backend().document().len();

    // Act
    let result = local.make("p").call(content![C::node(foreign)]);

    // Assert
    assert_eq!(result, Err(BackendError::UnknownNode(foreign)));
    assert_ne!(foreign, mine);
    assert_eq!(local.backend().document().len(), before);
    assert_eq!(local.backend().document().parent(mine), None);
}

#[test]
fn given_document_held_when_building_then_borrow_error_instead_of_panic() {
    // Arrange
    let b = builder();
    let existing = b.make("p").empty().unwrap();
    let document = b.backend().document();

    // Act
    let result = b.make("div").call(content![C::node(existing)]);

    // Assert
    assert_eq!(result, Err(BackendError::DocumentBorrowed));
    assert_eq!(document.len(), 1);
    drop(document);
    assert!(b.make("div").call(content![C::node(existing)]).is_ok());
}

#[test]
fn given_tree_when_rendering_tree_string_then_shows_hierarchy() {
    // Arrange
    let b = builder();
    let item = b.make("li").call(content!["entry"]).unwrap();
    let list = b.make("ol").call(content![C::node(item)]).unwrap();

    // Act
    let rendered = b.backend().document().to_tree_string(list).to_string();

    // Assert
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "<ol>");
    assert!(lines[1].ends_with("<li>"));
    assert!(lines[2].ends_with("\"entry\""));
}

#[test]
fn given_built_tree_when_traversing_then_preorder_and_depth() {
    // Arrange
    let b = builder();
    let inner = b.make("b").call(content!["x"]).unwrap();
    let outer = b.make("p").call(content![C::node(inner), "y"]).unwrap();

    // Act
    let document = b.backend().document();
    let names: Vec<String> = document
        .traverse(outer)
        .map(|(_, node)| node.data.to_string())
        .collect();

    // Assert
    assert_eq!(names, vec!["<p>", "<b>", "\"x\"", "\"y\""]);
    assert_eq!(document.depth(outer), 3);
}
