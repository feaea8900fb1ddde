use std::sync::Arc;

use super::*;
use crate::query::Query;
use crate::serialize::CodeStyle;
use crate::syntax::Syntax;
use crate::{Error, Result};

/// A brace-and-semicolon grammar just large enough to round-trip the
/// canonical text form.
pub(crate) struct TestSyntax;

impl Syntax for TestSyntax {
    fn parse(&self, text: &str) -> Result<Vec<NodeSpec>> {
        let mut pos = 0;
        let items = parse_items(text, &mut pos)?;
        if pos < text.len() {
            return Err(Error::parse("unexpected '}'", 1, pos as u32 + 1));
        }
        Ok(items)
    }
}

fn parse_items(src: &str, pos: &mut usize) -> Result<Vec<NodeSpec>> {
    let bytes = src.as_bytes();
    let mut items = Vec::new();
    loop {
        let start = *pos;
        while *pos < bytes.len() && !matches!(bytes[*pos], b';' | b'{' | b'}') {
            *pos += 1;
        }
        let head = src[start..*pos].trim();
        match bytes.get(*pos) {
            Some(b';') => {
                *pos += 1;
                if !head.is_empty() {
                    items.push(parse_item(head, None)?);
                }
            }
            Some(b'{') => {
                *pos += 1;
                let body = parse_items(src, pos)?;
                if bytes.get(*pos) != Some(&b'}') {
                    return Err(Error::parse("unclosed block", 1, *pos as u32 + 1));
                }
                *pos += 1;
                items.push(parse_item(head, Some(body))?);
            }
            _ => {
                if !head.is_empty() {
                    items.push(parse_item(head, None)?);
                }
                return Ok(items);
            }
        }
    }
}

fn parse_item(head: &str, body: Option<Vec<NodeSpec>>) -> Result<NodeSpec> {
    if let Some(rest) = head.strip_prefix('@') {
        let (name, prelude) = rest.split_once(' ').unwrap_or((rest, ""));
        return Ok(NodeSpec::at_rule(name, prelude.trim(), body));
    }
    match body {
        Some(children) => Ok(NodeSpec::rule(head, children)),
        None => head
            .split_once(':')
            .map(|(name, value)| NodeSpec::declaration(name.trim(), value.trim()))
            .ok_or_else(|| Error::parse(format!("expected declaration, found '{head}'"), 1, 1)),
    }
}

/// An empty tree using [`TestSyntax`].
pub(crate) fn declarations_tree() -> Tree {
    Tree::new(Arc::new(TestSyntax))
}

pub(crate) fn parse(text: &str) -> Tree {
    Tree::parse(text, Arc::new(TestSyntax)).unwrap()
}

/// Check that every parent/child link in the arena is mirrored.
pub(crate) fn assert_consistent(tree: &Tree, id: NodeId) {
    let node = tree.node(id).unwrap();
    for &child in node.children() {
        assert_eq!(tree.node(child).unwrap().parent(), Some(id));
        assert_eq!(
            node.children().iter().filter(|&&c| c == child).count(),
            1,
            "child listed twice"
        );
        assert_consistent(tree, child);
    }
}

fn names(tree: &Tree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| tree.node(id).unwrap().name().unwrap_or_default().to_owned())
        .collect()
}

const KEYFRAMES: &str = "@keyframes spin {\nfrom {\ntransform: rotate(0deg);\n}\nto {\ntransform: rotate(360deg);\n}\n}";

// =============================================================================
// Ownership & mutation
// =============================================================================

#[test]
fn add_appends_by_default() {
    let mut tree = parse("a: 1; b: 2;");
    let root = tree.root();
    let c = tree.append(root, "c: 3;").unwrap();

    assert_eq!(tree.index(c), Some(2));
    assert_eq!(tree.node(c).unwrap().parent(), Some(root));
    assert_consistent(&tree, root);
}

#[test]
fn add_with_index_and_after() {
    let mut tree = parse("a: 1; b: 2;");
    let root = tree.root();

    let x = tree.add(root, "x: 0;", Some(1), false).unwrap();
    assert_eq!(tree.to_string(root).unwrap(), "a: 1;\nx: 0;\nb: 2;");

    let y = tree.add(root, "y: 0;", Some(0), true).unwrap();
    assert_eq!(tree.index(y), Some(1));
    assert_eq!(tree.index(x), Some(2));

    let len = tree.node(root).unwrap().children().len();
    let z = tree.add(root, "z: 0;", Some(len), true).unwrap();
    assert_eq!(tree.index(z), Some(len));
    assert_consistent(&tree, root);
}

#[test]
fn add_past_end_is_clamped() {
    let mut tree = parse("a: 1;");
    let root = tree.root();
    let b = tree.add(root, "b: 2;", Some(10), false).unwrap();
    assert_eq!(tree.index(b), Some(1));
}

#[test]
fn prepend_inserts_first() {
    let mut tree = parse("a: 1; b: 2;");
    let root = tree.root();
    tree.prepend(root, "z: 0;").unwrap();
    assert_eq!(tree.content(root).unwrap(), vec!["z: 0;", "a: 1;", "b: 2;"]);
}

#[test]
fn add_detaches_from_previous_parent() {
    let mut tree = parse("a { x: 1; y: 2; } b { z: 3; }");
    let root = tree.root();
    let rules = tree.node(root).unwrap().children().to_vec();
    let (a, b) = (rules[0], rules[1]);
    let x = tree.node(a).unwrap().children()[0];

    tree.append(b, x).unwrap();

    assert_eq!(tree.node(a).unwrap().children().len(), 1);
    assert_eq!(tree.node(b).unwrap().children().len(), 2);
    assert_eq!(tree.node(x).unwrap().parent(), Some(b));
    assert_consistent(&tree, root);
}

#[test]
fn add_rejects_cycles() {
    let mut tree = parse("a { b { c: 1; } }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    let b = tree.node(a).unwrap().children()[0];

    assert!(matches!(tree.append(b, a), Err(Error::CircularParentage)));
    assert!(matches!(tree.append(a, a), Err(Error::CircularParentage)));
    assert_consistent(&tree, root);
}

#[test]
fn insert_before_and_after_siblings() {
    let mut tree = parse("b: 2;");
    let root = tree.root();
    let b = tree.node(root).unwrap().children()[0];

    tree.insert_before(b, "a: 1;").unwrap().unwrap();
    tree.insert_after(b, "c: 3;").unwrap().unwrap();

    assert_eq!(tree.to_string(root).unwrap(), "a: 1;\nb: 2;\nc: 3;");
}

#[test]
fn orphan_operations_are_no_ops() {
    let mut tree = declarations_tree();
    let orphan = tree.create_node(NodeKind::Declaration);
    let other = tree.create_node(NodeKind::Declaration);

    assert_eq!(tree.index(orphan), None);
    assert_eq!(tree.insert_before(orphan, other).unwrap(), None);
    assert_eq!(tree.insert_after(orphan, other).unwrap(), None);
    assert_eq!(tree.replace_with(orphan, other).unwrap(), None);
    assert_eq!(tree.node(other).unwrap().parent(), None);
}

#[test]
fn replace_with_takes_the_vacated_index() {
    let mut tree = parse("a: 1; b: 2; c: 3;");
    let root = tree.root();
    let b = tree.node(root).unwrap().children()[1];

    let new = tree.replace_with(b, "x: 9;").unwrap().unwrap();

    assert_eq!(tree.index(new), Some(1));
    assert_eq!(tree.node(b).unwrap().parent(), None);
    assert_eq!(tree.to_string(root).unwrap(), "a: 1;\nx: 9;\nc: 3;");
}

#[test]
fn remove_empties_whole_subtree() {
    let mut tree = parse("a { b { c: 1; d: 2; } e: 3; } f: 4;");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    let subtree = tree.search(a, &Query::any());
    assert_eq!(subtree.len(), 5);

    tree.remove(a).unwrap();

    for id in subtree {
        let node = tree.node(id).unwrap();
        assert_eq!(node.parent(), None);
        assert!(node.children().is_empty());
    }
    assert_eq!(tree.node(root).unwrap().children().len(), 1);
    assert_consistent(&tree, root);
}

#[test]
fn remove_is_idempotent() {
    let mut tree = parse("a: 1; b: 2;");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];

    tree.remove(a).unwrap();
    tree.remove(a).unwrap();

    assert_eq!(tree.node(root).unwrap().children().len(), 1);
}

#[test]
fn detach_keeps_children() {
    let mut tree = parse("a { x: 1; }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];

    tree.detach(a).unwrap();

    assert!(tree.node(root).unwrap().children().is_empty());
    assert_eq!(tree.node(a).unwrap().children().len(), 1);
    assert_eq!(tree.to_string(a).unwrap(), "a {\nx: 1;\n}");
}

#[test]
fn stale_handle_is_an_error() {
    let mut tree = parse("a: 1;");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    tree.remove(a).unwrap();

    assert_eq!(tree.compact(), 1);
    assert!(!tree.contains(a));
    assert!(matches!(tree.remove(a), Err(Error::InvalidNode)));
    assert!(matches!(tree.append(root, a), Err(Error::InvalidNode)));
}

// =============================================================================
// Cloning
// =============================================================================

#[test]
fn clone_round_trips_text() {
    let mut tree = parse(KEYFRAMES);
    let root = tree.root();
    let keyframes = tree.node(root).unwrap().children()[0];

    let clone = tree.clone_node(keyframes).unwrap();

    assert_eq!(tree.to_string(clone).unwrap(), tree.to_string(keyframes).unwrap());
    assert_eq!(tree.node(clone).unwrap().parent(), None);
}

#[test]
fn clone_shares_no_nodes() {
    let mut tree = parse("a { color: red; }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];

    let clone = tree.clone_node(a).unwrap();
    let original_ids = tree.search(a, &Query::any());
    let clone_ids = tree.search(clone, &Query::any());
    assert!(clone_ids.iter().all(|id| !original_ids.contains(id)));

    let declaration = tree.node(clone).unwrap().children()[0];
    tree.set_value(declaration, "blue").unwrap();
    assert_eq!(tree.to_string(a).unwrap(), "a {\ncolor: red;\n}");
    assert_eq!(tree.to_string(clone).unwrap(), "a {\ncolor: blue;\n}");
}

#[test]
fn clone_drops_scoped_data() {
    let mut tree = parse("a { color: red; }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    tree.set_data(a, "seen", true).unwrap();

    let clone = tree.clone_node(a).unwrap();
    assert_eq!(tree.get_data::<bool>(clone, "seen"), None);
}

#[test]
fn clone_before_and_after() {
    let mut tree = parse("a: 1;");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];

    let before = tree.clone_before(a).unwrap().unwrap();
    let after = tree.clone_after(a).unwrap().unwrap();

    assert_eq!(tree.index(before), Some(0));
    assert_eq!(tree.index(a), Some(1));
    assert_eq!(tree.index(after), Some(2));
    assert_eq!(tree.to_string(root).unwrap(), "a: 1;\na: 1;\na: 1;");
}

#[test]
fn clone_of_empty_rule_is_empty_copy() {
    let mut tree = parse("a { } @media screen { }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    let media = tree.node(root).unwrap().children()[1];

    let rule = tree.clone_node(a).unwrap();
    let node = tree.node(rule).unwrap();
    assert_eq!(node.kind(), NodeKind::Rule);
    assert_eq!(node.value(), Some("a"));
    assert!(node.has_block());
    assert!(node.children().is_empty());
    assert_eq!(node.parent(), None);

    let at_rule = tree.clone_after(media).unwrap().unwrap();
    let node = tree.node(at_rule).unwrap();
    assert_eq!(node.kind(), NodeKind::AtRule);
    assert_eq!(node.name(), Some("media"));
    assert_eq!(node.value(), Some("screen"));
    assert_eq!(tree.to_string(at_rule).unwrap(), "");
    assert_eq!(tree.index(at_rule), Some(2));
    assert_consistent(&tree, root);
}

#[test]
fn clone_root() {
    let mut tree = parse("a: 1; b { c: 2; }");
    let root = tree.root();
    let clone = tree.clone_node(root).unwrap();

    assert_eq!(tree.node(clone).unwrap().kind(), NodeKind::Root);
    assert_eq!(tree.to_string(clone).unwrap(), tree.to_string(root).unwrap());
}

// =============================================================================
// At-rules
// =============================================================================

#[test]
fn add_vendor_prefix_inserts_clone_before() {
    let mut tree = parse(KEYFRAMES);
    let root = tree.root();
    let keyframes = tree.node(root).unwrap().children()[0];

    let prefixed = tree.add_vendor_prefix(keyframes, "-webkit-").unwrap().unwrap();

    let children = tree.node(root).unwrap().children().to_vec();
    assert_eq!(children, vec![prefixed, keyframes]);

    let node = tree.node(prefixed).unwrap();
    assert_eq!(node.name(), Some("-webkit-keyframes"));
    assert_eq!(node.vendor(), Some("webkit"));
    assert_eq!(node.value(), Some("spin"));
    assert_eq!(tree.node(keyframes).unwrap().name(), Some("keyframes"));
    assert_eq!(tree.content(prefixed).unwrap(), tree.content(keyframes).unwrap());
    assert!(tree.to_string(root).unwrap().starts_with("@-webkit-keyframes spin {\nfrom {"));
}

#[test]
fn set_name_derives_vendor() {
    let mut tree = parse("@-moz-document url(a) { a { b: c; } }");
    let root = tree.root();
    let at_rule = tree.node(root).unwrap().children()[0];
    assert_eq!(tree.node(at_rule).unwrap().vendor(), Some("moz"));

    tree.set_name(at_rule, "document").unwrap();
    assert_eq!(tree.node(at_rule).unwrap().vendor(), None);
}

#[test]
fn at_rule_serialization() {
    let tree = parse("@import url(a.css); @font-face { font-family: x; } @media print { }");
    let root = tree.root();
    assert_eq!(
        tree.content(root).unwrap(),
        vec!["@import url(a.css);", "@font-face {\nfont-family: x;\n}", ""]
    );
    assert_eq!(
        tree.to_string(root).unwrap(),
        "@import url(a.css);\n@font-face {\nfont-family: x;\n}"
    );
}

#[test]
fn to_code_uses_linebreak() {
    let tree = parse("a { b: 1; c: 2; } d: 3;");
    let root = tree.root();
    assert_eq!(
        tree.to_code(root, &CodeStyle::minified()).unwrap(),
        "a { b: 1; c: 2; } d: 3;"
    );
    assert_eq!(
        tree.to_code(root, &CodeStyle::with_linebreak("\r\n")).unwrap(),
        "a {\r\nb: 1;\r\nc: 2;\r\n}\r\nd: 3;"
    );
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn search_finds_keyframes_in_document_order() {
    let tree = parse(
        "@keyframes a { from { top: 0; } } @font-face { font-family: x; } @keyframes b { to { top: 1px; } }",
    );
    let root = tree.root();

    let found = tree.search(root, &Query::kind(NodeKind::AtRule).name("keyframes"));

    assert_eq!(found.len(), 2);
    let preludes: Vec<_> = found
        .iter()
        .map(|&id| tree.node(id).unwrap().value().unwrap())
        .collect();
    assert_eq!(preludes, vec!["a", "b"]);
}

#[test]
fn search_includes_self_preorder() {
    let tree = parse("a { b: 1; c { d: 2; } }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];

    let all = tree.search(a, &Query::any());
    assert_eq!(all[0], a);
    assert_eq!(names(&tree, &all), vec!["", "b", "", "d"]);
}

#[test]
fn children_and_has_child() {
    let tree = parse("a: 1; -webkit-b: 2; c { d: 3; }");
    let root = tree.root();

    let declarations = tree.children(root, &Query::kind(NodeKind::Declaration));
    assert_eq!(names(&tree, &declarations), vec!["a", "-webkit-b"]);

    assert!(tree.has_child(root, &Query::any().vendor("webkit")));
    assert!(!tree.has_child(root, &Query::any().name("d")));
}

#[test]
fn has_searches_descendants() {
    let tree = parse("a { b { -moz-c: 1; } }");
    let root = tree.root();

    assert!(tree.has(root, &Query::any().vendor("moz")));
    assert!(tree.has(root, &Query::kind(NodeKind::Root)));
    assert!(!tree.has(root, &Query::kind(NodeKind::AtRule)));
}

#[test]
fn ancestor_is_inclusive() {
    let tree = parse("@media print { a { b: 1; } }");
    let root = tree.root();
    let media = tree.node(root).unwrap().children()[0];
    let rule = tree.node(media).unwrap().children()[0];
    let declaration = tree.node(rule).unwrap().children()[0];

    assert_eq!(
        tree.ancestor(declaration, &Query::kind(NodeKind::AtRule)),
        Some(media)
    );
    assert_eq!(
        tree.ancestor(declaration, &Query::kind(NodeKind::Declaration)),
        Some(declaration)
    );
    assert_eq!(tree.ancestor(declaration, &Query::any().vendor(true)), None);
}

// =============================================================================
// Scoped data
// =============================================================================

#[test]
fn data_is_inherited_by_descendants() {
    let mut tree = parse("a { b: 1; }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    let b = tree.node(a).unwrap().children()[0];

    tree.set_data(root, "prefix", "-webkit-".to_string())
        .unwrap()
        .set_data(a, "depth", 1u32)
        .unwrap();

    assert_eq!(tree.get_data::<String>(b, "prefix").map(String::as_str), Some("-webkit-"));
    assert_eq!(tree.get_data::<u32>(b, "depth"), Some(&1));
    assert_eq!(tree.get_data::<u32>(root, "depth"), None);
    assert_eq!(tree.get_data::<u32>(b, "missing"), None);
}

#[test]
fn set_data_shadows_without_touching_ancestor() {
    let mut tree = parse("a { b: 1; }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];

    tree.set_data(root, "mode", "outer").unwrap();
    tree.set_data(a, "mode", "inner").unwrap();

    assert_eq!(tree.get_data::<&str>(a, "mode"), Some(&"inner"));
    assert_eq!(tree.get_data::<&str>(root, "mode"), Some(&"outer"));

    let removed = tree.remove_data(a, "mode").unwrap();
    assert!(removed.is_some());
    assert_eq!(tree.get_data::<&str>(a, "mode"), Some(&"outer"));
}

#[test]
fn detached_node_loses_inherited_data() {
    let mut tree = parse("a: 1;");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    tree.set_data(root, "flag", true).unwrap();

    assert_eq!(tree.get_data::<bool>(a, "flag"), Some(&true));
    tree.detach(a).unwrap();
    assert_eq!(tree.get_data::<bool>(a, "flag"), None);
}

// =============================================================================
// Content
// =============================================================================

#[test]
fn set_content_replaces_children() {
    let mut tree = parse("a { b: 1; c: 2; }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    let old = tree.node(a).unwrap().children().to_vec();

    tree.set_content(a, ["x: 1;", "y: 2;"]).unwrap();

    assert_eq!(tree.content(a).unwrap(), vec!["x: 1;", "y: 2;"]);
    for id in old {
        assert_eq!(tree.node(id).unwrap().parent(), None);
    }
    assert_consistent(&tree, root);
}

#[test]
fn set_content_parse_error_keeps_children() {
    let mut tree = parse("a { b: 1; c: 2; }");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    let old = tree.node(a).unwrap().children().to_vec();

    let err = tree.set_content(a, ["x: 1;", "broken", "y: 2;"]).unwrap_err();

    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(tree.node(a).unwrap().children(), old.as_slice());
    assert_eq!(tree.content(a).unwrap(), vec!["b: 1;", "c: 2;"]);
    assert_consistent(&tree, root);
}

#[test]
fn text_child_parse_error_surfaces() {
    let mut tree = parse("a: 1;");
    let root = tree.root();
    assert!(matches!(tree.append(root, "not a declaration"), Err(Error::Parse { .. })));
    assert!(matches!(tree.append(root, ""), Err(Error::Create { .. })));
    assert_eq!(tree.node(root).unwrap().children().len(), 1);
}

#[test]
fn compact_frees_only_unreachable_nodes() {
    let mut tree = parse("a { b: 1; } c: 2;");
    let root = tree.root();
    let a = tree.node(root).unwrap().children()[0];
    let before = tree.len();

    tree.remove(a).unwrap();
    assert_eq!(tree.len(), before);

    assert_eq!(tree.compact(), 2);
    assert_eq!(tree.len(), before - 2);
    assert_eq!(tree.to_string(root).unwrap(), "c: 2;");
}
