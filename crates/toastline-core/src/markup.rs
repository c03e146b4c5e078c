//! Inline markup parsing for toast body text.
//!
//! Toast bodies support a small inline markup language: bold, italic, code,
//! headers, links, images, separators and line breaks. Each construct is
//! described by a [`TagDef`] (a pair of delimiter strings plus rendering
//! rules), and [`parse`] turns raw text into a tree of [`MarkupNode`]s that
//! the rendering crate maps onto widgets.
//!
//! Tags are resolved tag-by-tag in registry declaration order, not by
//! leftmost match: all occurrences of one tag are found before the next tag
//! is considered. This ordering is a caller-visible contract: when two tags
//! share delimiter characters (`**` vs `*`, or the separator rule vs a bare
//! line break), the earlier registration wins. Nesting is representable
//! between two different tag kinds only.

use indexmap::IndexMap;

/// Escape marker recognized in front of delimiters and title separators.
const ESCAPE: char = '\\';

/// Separator between title and content inside a title-capable span.
const TITLE_SEPARATOR: char = '|';

/// Marker that makes the whole span the title (`{{!content}}`).
const TITLE_DEFAULT_MARKER: char = '!';

/// The element a tag renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Inline styled run (bold, italic, ...). Styling comes from CSS classes.
    Span,
    /// Inline monospace run.
    Code,
    /// Block-level heading, largest.
    Header1,
    /// Block-level heading, medium.
    Header2,
    /// Block-level heading, smallest.
    Header3,
    /// Inline hyperlink; target comes from attribute templates.
    Link,
    /// Block-level image; source comes from attribute templates.
    Image,
    /// Explicit line break.
    LineBreak,
    /// Horizontal rule.
    Separator,
}

/// Declarative rule mapping a pair of delimiters to a rendered element.
#[derive(Debug, Clone)]
pub struct TagDef {
    /// Target element kind.
    pub element: ElementKind,
    /// Opening delimiter. Must be non-empty.
    pub open: String,
    /// Closing delimiter. An empty close turns the tag into a marker: every
    /// occurrence of `open` becomes an element with empty content (used for
    /// line breaks and separators).
    pub close: String,
    /// CSS classes applied to the rendered element.
    pub css_classes: Vec<String>,
    /// Fixed or templated text content (`$content` / `$title` substituted).
    /// `None` means the span content is parsed recursively into children.
    pub text_content: Option<String>,
    /// Attribute templates, each value templated on `$content` / `$title`.
    pub attributes: Vec<(String, String)>,
    /// Whether the span supports `title|content` syntax and delimiter
    /// escaping with `\`.
    pub title_support: bool,
}

impl TagDef {
    /// Expand the attribute templates for a parsed span.
    pub fn expand_attributes(&self, title: Option<&str>, content: &str) -> Vec<(String, String)> {
        self.attributes
            .iter()
            .map(|(name, template)| (name.clone(), expand_template(template, title, content)))
            .collect()
    }

    /// Expand the text content template for a parsed span, if any.
    pub fn expand_text(&self, title: Option<&str>, content: &str) -> Option<String> {
        self.text_content
            .as_deref()
            .map(|template| expand_template(template, title, content))
    }

    /// Whether span content is parsed recursively (no fixed text content).
    fn has_children(&self) -> bool {
        self.text_content.is_none()
    }
}

/// Substitute `$title` / `$content` placeholders in a template.
fn expand_template(template: &str, title: Option<&str>, content: &str) -> String {
    template
        .replace("$title", title.unwrap_or(content))
        .replace("$content", content)
}

/// A node in the parsed markup tree: either a literal text fragment or an
/// element with children. Children are owned by their parent.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    /// Literal text.
    Text(String),
    /// A matched tag span.
    Element(ElementNode),
}

/// A matched tag span.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    /// Registry name of the tag that produced this element.
    pub tag: String,
    /// Parsed title for title-capable tags (always present for those).
    pub title: Option<String>,
    /// Raw span content, used for attribute/text templates.
    pub content: String,
    /// Recursively parsed children (empty for tags with fixed text content).
    pub children: Vec<MarkupNode>,
}

/// Insertion-ordered registry of tag definitions.
///
/// Declaration order is observable: tags registered earlier are resolved
/// first. Re-registering a name replaces the definition but keeps its
/// original position.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: IndexMap<String, TagDef>,
}

impl TagRegistry {
    /// An empty registry with no tags.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the builtin tag set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        register_default_tags(&mut registry);
        registry
    }

    /// Register (or replace) a tag definition.
    pub fn register(&mut self, name: impl Into<String>, def: TagDef) {
        self.tags.insert(name.into(), def);
    }

    /// Look up a tag definition by name.
    pub fn get(&self, name: &str) -> Option<&TagDef> {
        self.tags.get(name)
    }

    /// Iterate tags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagDef)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the registry has no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Install the builtin tag set in its canonical order.
///
/// Order matters: `**` before `*`, `###` before `##` before `#`, and the
/// separator rule before the bare line break it shares `\n` with.
fn register_default_tags(registry: &mut TagRegistry) {
    registry.register(
        "code",
        TagDef {
            element: ElementKind::Code,
            open: "``".into(),
            close: "``".into(),
            css_classes: vec!["tl-code".into()],
            text_content: Some("$content".into()),
            attributes: Vec::new(),
            title_support: false,
        },
    );
    registry.register(
        "header3",
        TagDef {
            element: ElementKind::Header3,
            open: "###".into(),
            close: "\n".into(),
            css_classes: vec!["tl-header".into()],
            text_content: None,
            attributes: Vec::new(),
            title_support: false,
        },
    );
    registry.register(
        "header2",
        TagDef {
            element: ElementKind::Header2,
            open: "##".into(),
            close: "\n".into(),
            css_classes: vec!["tl-header".into()],
            text_content: None,
            attributes: Vec::new(),
            title_support: false,
        },
    );
    registry.register(
        "header1",
        TagDef {
            element: ElementKind::Header1,
            open: "#".into(),
            close: "\n".into(),
            css_classes: vec!["tl-header".into()],
            text_content: None,
            attributes: Vec::new(),
            title_support: false,
        },
    );
    registry.register(
        "image",
        TagDef {
            element: ElementKind::Image,
            open: "![".into(),
            close: "]".into(),
            css_classes: vec!["tl-image".into()],
            text_content: Some(String::new()),
            attributes: vec![
                ("src".into(), "$content".into()),
                ("alt".into(), "$title".into()),
            ],
            title_support: true,
        },
    );
    registry.register(
        "link",
        TagDef {
            element: ElementKind::Link,
            open: "{{".into(),
            close: "}}".into(),
            css_classes: vec!["tl-link".into()],
            text_content: Some("$title".into()),
            attributes: vec![("href".into(), "$content".into())],
            title_support: true,
        },
    );
    registry.register(
        "bold",
        TagDef {
            element: ElementKind::Span,
            open: "**".into(),
            close: "**".into(),
            css_classes: vec!["tl-bold".into()],
            text_content: None,
            attributes: Vec::new(),
            title_support: false,
        },
    );
    registry.register(
        "italic",
        TagDef {
            element: ElementKind::Span,
            open: "*".into(),
            close: "*".into(),
            css_classes: vec!["tl-italic".into()],
            text_content: None,
            attributes: Vec::new(),
            title_support: false,
        },
    );
    registry.register(
        "separator",
        TagDef {
            element: ElementKind::Separator,
            open: "\n---\n".into(),
            close: String::new(),
            css_classes: vec!["tl-separator".into()],
            text_content: Some(String::new()),
            attributes: Vec::new(),
            title_support: false,
        },
    );
    registry.register(
        "linejump",
        TagDef {
            element: ElementKind::LineBreak,
            open: "\n".into(),
            close: String::new(),
            css_classes: Vec::new(),
            text_content: Some(String::new()),
            attributes: Vec::new(),
            title_support: false,
        },
    );
}

/// Parse raw text into a markup tree.
///
/// Empty input yields no nodes; input without any tag delimiters yields a
/// single text node equal to the line-break-normalized input. Malformed
/// markup (unmatched delimiters) degrades to literal text, never an error.
pub fn parse(text: &str, registry: &TagRegistry) -> Vec<MarkupNode> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut nodes = vec![MarkupNode::Text(normalize_line_breaks(text))];
    for (name, def) in registry.iter() {
        if def.open.is_empty() {
            continue;
        }
        apply_tag(&mut nodes, name, def);
    }
    nodes
}

/// Normalize all line-break variants to `\n`.
fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Resolve every occurrence of one tag across the current tree.
///
/// Text leaves are split around matched spans; element children are
/// descended into, except for elements produced by the same tag (same-kind
/// nesting is not representable).
fn apply_tag(nodes: &mut Vec<MarkupNode>, name: &str, def: &TagDef) {
    let mut i = 0;
    while i < nodes.len() {
        match &mut nodes[i] {
            MarkupNode::Element(el) => {
                if el.tag != name {
                    apply_tag(&mut el.children, name, def);
                }
                i += 1;
            }
            MarkupNode::Text(t) => {
                if !t.contains(&def.open) {
                    i += 1;
                    continue;
                }
                let text = std::mem::take(t);
                let replacement = split_text(text, name, def);
                let advance = replacement.len();
                nodes.splice(i..=i, replacement);
                // Skip past everything we just produced: elements of this
                // tag must not be rescanned by the same pass.
                i += advance;
            }
        }
    }
}

/// Split one text fragment around all matches of a tag.
fn split_text(text: String, name: &str, def: &TagDef) -> Vec<MarkupNode> {
    let mut out = Vec::new();
    // Accumulates literal output (escape markers already consumed).
    let mut lit = String::new();
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find(&def.open) {
        let open_pos = cursor + rel;

        // An escaped delimiter is emitted literally, without the marker.
        if def.title_support && text[..open_pos].ends_with(ESCAPE) {
            lit.push_str(&text[cursor..open_pos - ESCAPE.len_utf8()]);
            lit.push_str(&def.open);
            cursor = open_pos + def.open.len();
            continue;
        }

        let content_start = open_pos + def.open.len();

        // Marker tags (empty close): the delimiter itself is the element.
        if def.close.is_empty() {
            lit.push_str(&text[cursor..open_pos]);
            flush_literal(&mut lit, &mut out);
            out.push(MarkupNode::Element(ElementNode {
                tag: name.to_string(),
                title: None,
                content: String::new(),
                children: Vec::new(),
            }));
            cursor = content_start;
            continue;
        }

        match find_close(&text, content_start, def) {
            // Empty spans do not match, same as unmatched opens.
            Some(close_pos) if close_pos > content_start => {
                lit.push_str(&text[cursor..open_pos]);
                flush_literal(&mut lit, &mut out);

                let raw = unescape_delimiter(&text[content_start..close_pos], &def.close);
                let (title, content) = if def.title_support {
                    let (t, c) = split_title(&raw);
                    (Some(t), c)
                } else {
                    (None, raw)
                };
                let children = if def.has_children() {
                    vec![MarkupNode::Text(content.clone())]
                } else {
                    Vec::new()
                };
                out.push(MarkupNode::Element(ElementNode {
                    tag: name.to_string(),
                    title,
                    content,
                    children,
                }));
                cursor = close_pos + def.close.len();
            }
            // Unmatched open delimiter: leave the text unmodified.
            _ => {
                lit.push_str(&text[cursor..content_start]);
                cursor = content_start;
            }
        }
    }

    lit.push_str(&text[cursor..]);
    flush_literal(&mut lit, &mut out);
    out
}

fn flush_literal(lit: &mut String, out: &mut Vec<MarkupNode>) {
    if !lit.is_empty() {
        out.push(MarkupNode::Text(std::mem::take(lit)));
    }
}

/// Find the closing delimiter at or after `from`, skipping escaped ones for
/// title-capable tags.
fn find_close(text: &str, from: usize, def: &TagDef) -> Option<usize> {
    let mut search = from;
    loop {
        let pos = search + text[search..].find(&def.close)?;
        if def.title_support && text[..pos].ends_with(ESCAPE) {
            search = pos + def.close.len();
            continue;
        }
        return Some(pos);
    }
}

/// Remove escape markers in front of the closing delimiter inside span
/// content (`\}}` becomes `}}`).
fn unescape_delimiter(content: &str, close: &str) -> String {
    if close.is_empty() || !content.contains(close) {
        return content.to_string();
    }
    content.replace(&format!("{}{}", ESCAPE, close), close)
}

/// Split a title-capable span into `(title, content)`.
///
/// A leading `!` strips the marker and makes title equal to the remaining
/// content. Otherwise the first unescaped `|` splits the span; escaped `\|`
/// is unescaped afterward. Without a separator, title equals content.
fn split_title(raw: &str) -> (String, String) {
    if let Some(rest) = raw.strip_prefix(TITLE_DEFAULT_MARKER) {
        return (rest.to_string(), rest.to_string());
    }

    let mut prev_escape = false;
    for (i, c) in raw.char_indices() {
        if c == TITLE_SEPARATOR && !prev_escape {
            let title = unescape_separator(&raw[..i]);
            let content = unescape_separator(&raw[i + TITLE_SEPARATOR.len_utf8()..]);
            return (title, content);
        }
        prev_escape = c == ESCAPE;
    }

    let whole = unescape_separator(raw);
    (whole.clone(), whole)
}

fn unescape_separator(s: &str) -> String {
    s.replace(&format!("{}{}", ESCAPE, TITLE_SEPARATOR), &TITLE_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> TagRegistry {
        TagRegistry::with_defaults()
    }

    fn element(node: &MarkupNode) -> &ElementNode {
        match node {
            MarkupNode::Element(el) => el,
            MarkupNode::Text(t) => panic!("expected element, got text {:?}", t),
        }
    }

    #[test]
    fn empty_input_yields_no_nodes() {
        assert_eq!(parse("", &registry()), Vec::new());
    }

    #[test]
    fn plain_text_yields_single_text_node() {
        let nodes = parse("just some text", &registry());
        assert_eq!(nodes, vec![MarkupNode::Text("just some text".into())]);
    }

    #[test]
    fn line_breaks_are_normalized() {
        // With an empty registry nothing consumes the newlines, so the
        // normalized input comes back as one text node.
        let nodes = parse("a\r\nb\rc", &TagRegistry::empty());
        assert_eq!(nodes, vec![MarkupNode::Text("a\nb\nc".into())]);
    }

    #[test]
    fn bold_span() {
        let nodes = parse("**bold**", &registry());
        assert_eq!(nodes.len(), 1);
        let el = element(&nodes[0]);
        assert_eq!(el.tag, "bold");
        assert_eq!(el.content, "bold");
        assert_eq!(el.children, vec![MarkupNode::Text("bold".into())]);
    }

    #[test]
    fn bold_inside_surrounding_text() {
        let nodes = parse("a **b** c", &registry());
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], MarkupNode::Text("a ".into()));
        assert_eq!(element(&nodes[1]).content, "b");
        assert_eq!(nodes[2], MarkupNode::Text(" c".into()));
    }

    #[test]
    fn unmatched_open_left_unmodified() {
        let nodes = parse("a **b", &registry());
        // The italic pass also sees no matching pair, so the text survives.
        assert_eq!(nodes, vec![MarkupNode::Text("a **b".into())]);
    }

    #[test]
    fn empty_span_does_not_match() {
        let nodes = parse("a ****", &registry());
        assert_eq!(nodes, vec![MarkupNode::Text("a ****".into())]);
    }

    #[test]
    fn nested_italic_inside_bold() {
        let nodes = parse("**a *b* c**", &registry());
        assert_eq!(nodes.len(), 1);
        let bold = element(&nodes[0]);
        assert_eq!(bold.tag, "bold");
        assert_eq!(bold.children.len(), 3);
        assert_eq!(bold.children[0], MarkupNode::Text("a ".into()));
        let italic = element(&bold.children[1]);
        assert_eq!(italic.tag, "italic");
        assert_eq!(italic.children, vec![MarkupNode::Text("b".into())]);
        assert_eq!(bold.children[2], MarkupNode::Text(" c".into()));
    }

    #[test]
    fn declaration_order_resolves_shared_delimiters() {
        // `**` is registered before `*`, so double asterisks always bind as
        // bold rather than two italics.
        let nodes = parse("**x**", &registry());
        assert_eq!(element(&nodes[0]).tag, "bold");
    }

    #[test]
    fn code_content_is_not_reparsed() {
        let nodes = parse("``**not bold**``", &registry());
        assert_eq!(nodes.len(), 1);
        let code = element(&nodes[0]);
        assert_eq!(code.tag, "code");
        assert_eq!(code.content, "**not bold**");
        assert!(code.children.is_empty());
        let def = registry().get("code").unwrap().clone();
        assert_eq!(
            def.expand_text(code.title.as_deref(), &code.content),
            Some("**not bold**".into())
        );
    }

    #[test]
    fn link_title_and_content_split() {
        let nodes = parse("{{title|https://example.com}}", &registry());
        let link = element(&nodes[0]);
        assert_eq!(link.tag, "link");
        assert_eq!(link.title.as_deref(), Some("title"));
        assert_eq!(link.content, "https://example.com");
    }

    #[test]
    fn link_without_separator_title_equals_content() {
        let nodes = parse("{{https://example.com}}", &registry());
        let link = element(&nodes[0]);
        assert_eq!(link.title.as_deref(), Some("https://example.com"));
        assert_eq!(link.content, "https://example.com");
    }

    #[test]
    fn link_bang_marker_strips_and_defaults_title() {
        let nodes = parse("{{!body}}", &registry());
        let link = element(&nodes[0]);
        assert_eq!(link.title.as_deref(), Some("body"));
        assert_eq!(link.content, "body");
    }

    #[test]
    fn escaped_separator_is_not_a_split_point() {
        let nodes = parse(r"{{a\|b|https://example.com}}", &registry());
        let link = element(&nodes[0]);
        assert_eq!(link.title.as_deref(), Some("a|b"));
        assert_eq!(link.content, "https://example.com");
    }

    #[test]
    fn escape_marker_absent_from_content() {
        let nodes = parse(r"{{https://example.com/a\|b}}", &registry());
        let link = element(&nodes[0]);
        assert_eq!(link.content, "https://example.com/a|b");
        assert!(!link.content.contains('\\'));
    }

    #[test]
    fn escaped_open_delimiter_is_literal() {
        let nodes = parse(r"a \{{not a link}} b", &registry());
        assert_eq!(nodes, vec![MarkupNode::Text("a {{not a link}} b".into())]);
    }

    #[test]
    fn attribute_templates_expand() {
        let reg = registry();
        let nodes = parse("{{Docs|https://example.com}}", &reg);
        let link = element(&nodes[0]);
        let def = reg.get("link").unwrap();
        let attrs = def.expand_attributes(link.title.as_deref(), &link.content);
        assert_eq!(attrs, vec![("href".into(), "https://example.com".into())]);
        let text = def.expand_text(link.title.as_deref(), &link.content);
        assert_eq!(text, Some("Docs".into()));
    }

    #[test]
    fn image_attributes_expand() {
        let reg = registry();
        let nodes = parse("![avatar|/tmp/a.png]", &reg);
        let img = element(&nodes[0]);
        let def = reg.get("image").unwrap();
        let attrs = def.expand_attributes(img.title.as_deref(), &img.content);
        assert_eq!(
            attrs,
            vec![
                ("src".into(), "/tmp/a.png".into()),
                ("alt".into(), "avatar".into()),
            ]
        );
        // Images render no text of their own.
        assert_eq!(def.expand_text(img.title.as_deref(), &img.content), Some(String::new()));
    }

    #[test]
    fn header_closes_at_line_break() {
        let nodes = parse("## Title\nbody", &registry());
        let header = element(&nodes[0]);
        assert_eq!(header.tag, "header2");
        assert_eq!(header.content, " Title");
        assert_eq!(nodes[1], MarkupNode::Text("body".into()));
    }

    #[test]
    fn header_without_line_break_stays_literal() {
        let nodes = parse("## Title", &registry());
        assert_eq!(nodes, vec![MarkupNode::Text("## Title".into())]);
    }

    #[test]
    fn separator_wins_over_linejump() {
        let nodes = parse("a\n---\nb", &registry());
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], MarkupNode::Text("a".into()));
        assert_eq!(element(&nodes[1]).tag, "separator");
        assert_eq!(nodes[2], MarkupNode::Text("b".into()));
    }

    #[test]
    fn linejump_consumes_bare_newlines() {
        let nodes = parse("a\nb", &registry());
        assert_eq!(nodes.len(), 3);
        assert_eq!(element(&nodes[1]).tag, "linejump");
    }

    #[test]
    fn registered_tag_replaces_but_keeps_position() {
        let mut reg = registry();
        let first_name = reg.iter().next().unwrap().0.to_string();
        reg.register(
            "code",
            TagDef {
                element: ElementKind::Code,
                open: "%%".into(),
                close: "%%".into(),
                css_classes: Vec::new(),
                text_content: Some("$content".into()),
                attributes: Vec::new(),
                title_support: false,
            },
        );
        assert_eq!(reg.iter().next().unwrap().0, first_name);
        let nodes = parse("%%x%%", &reg);
        assert_eq!(element(&nodes[0]).tag, "code");
    }

    #[test]
    fn custom_tag_in_empty_registry() {
        let mut reg = TagRegistry::empty();
        reg.register(
            "kbd",
            TagDef {
                element: ElementKind::Code,
                open: "[[".into(),
                close: "]]".into(),
                css_classes: vec!["tl-kbd".into()],
                text_content: Some("$content".into()),
                attributes: Vec::new(),
                title_support: false,
            },
        );
        let nodes = parse("press [[Ctrl+C]] to copy", &reg);
        assert_eq!(nodes.len(), 3);
        assert_eq!(element(&nodes[1]).content, "Ctrl+C");
    }
}
