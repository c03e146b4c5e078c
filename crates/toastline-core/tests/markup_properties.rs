//! End-to-end markup parsing scenarios with the default tag set.

use toastline_core::markup::{parse, MarkupNode, TagRegistry};

fn texts(nodes: &[MarkupNode]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| match n {
            MarkupNode::Text(t) => format!("text:{}", t),
            MarkupNode::Element(el) => format!("el:{}", el.tag),
        })
        .collect()
}

#[test]
fn mixed_body_resolves_in_declaration_order() {
    let reg = TagRegistry::with_defaults();
    let nodes = parse(
        "Build **failed** on *main*: {{log|https://ci.example.com/run/42}}",
        &reg,
    );

    assert_eq!(
        texts(&nodes),
        vec![
            "text:Build ",
            "el:bold",
            "text: on ",
            "el:italic",
            "text:: ",
            "el:link",
        ]
    );
}

#[test]
fn multiline_body_with_header_and_separator() {
    let reg = TagRegistry::with_defaults();
    let nodes = parse("## Update\nInstalled 12 packages\n---\nReboot required", &reg);

    assert_eq!(
        texts(&nodes),
        vec![
            "el:header2",
            "text:Installed 12 packages",
            "el:separator",
            "text:Reboot required",
        ]
    );
}

#[test]
fn literal_body_with_no_tags_survives_untouched() {
    let reg = TagRegistry::with_defaults();
    let nodes = parse("nothing fancy here", &reg);
    assert_eq!(nodes, vec![MarkupNode::Text("nothing fancy here".into())]);
}

#[test]
fn broken_markup_degrades_to_literal_text() {
    let reg = TagRegistry::with_defaults();
    // Unmatched bold open and unmatched link close: everything stays text.
    let nodes = parse("half **open and }} stray", &reg);
    assert_eq!(
        nodes,
        vec![MarkupNode::Text("half **open and }} stray".into())]
    );
}

#[test]
fn deep_nesting_across_different_tags() {
    let reg = TagRegistry::with_defaults();
    let nodes = parse("**bold with *italic* inside**", &reg);

    assert_eq!(nodes.len(), 1);
    let MarkupNode::Element(bold) = &nodes[0] else {
        panic!("expected element");
    };
    assert_eq!(bold.tag, "bold");
    assert!(bold
        .children
        .iter()
        .any(|n| matches!(n, MarkupNode::Element(el) if el.tag == "italic")));
}
