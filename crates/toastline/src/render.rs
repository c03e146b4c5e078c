//! Rendering of parsed markup trees into GTK widgets.
//!
//! Inline constructs (bold, italic, code, links) are collapsed into Pango
//! markup on a single wrapping label; block constructs (headers, separators,
//! images) break the inline run and get their own widget. The Pango markup
//! builders are pure string functions so the mapping is testable without a
//! display server.

use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Label, Orientation};
use std::path::Path;
use tracing::debug;

use toastline_core::markup::{ElementKind, ElementNode, MarkupNode, TagRegistry};

use crate::styles::{markup, toast};

/// Escape text for use inside Pango markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build Pango markup for a run of inline nodes.
///
/// Block-level elements never reach this function; `render_body` routes
/// them to their own widgets first.
pub fn inline_markup(nodes: &[MarkupNode], registry: &TagRegistry) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            MarkupNode::Text(t) => out.push_str(&escape_markup(t)),
            MarkupNode::Element(el) => out.push_str(&inline_element_markup(el, registry)),
        }
    }
    out
}

fn inline_element_markup(el: &ElementNode, registry: &TagRegistry) -> String {
    let Some(def) = registry.get(&el.tag) else {
        return escape_markup(&el.content);
    };

    match def.element {
        ElementKind::Span => {
            let inner = inline_markup(&el.children, registry);
            // Pango has no CSS classes; the builtin span classes map onto
            // font attributes.
            let bold = def.css_classes.iter().any(|c| c == markup::BOLD);
            let italic = def.css_classes.iter().any(|c| c == markup::ITALIC);
            match (bold, italic) {
                (true, true) => format!("<b><i>{inner}</i></b>"),
                (true, false) => format!("<b>{inner}</b>"),
                (false, true) => format!("<i>{inner}</i>"),
                (false, false) => inner,
            }
        }
        ElementKind::Code => {
            let text = def
                .expand_text(el.title.as_deref(), &el.content)
                .unwrap_or_else(|| el.content.clone());
            format!("<tt>{}</tt>", escape_markup(&text))
        }
        ElementKind::Link => {
            let href = def
                .expand_attributes(el.title.as_deref(), &el.content)
                .into_iter()
                .find(|(name, _)| name == "href")
                .map(|(_, value)| value)
                .unwrap_or_else(|| el.content.clone());
            let label = def
                .expand_text(el.title.as_deref(), &el.content)
                .unwrap_or_else(|| el.content.clone());
            format!(
                "<a href=\"{}\">{}</a>",
                escape_markup(&href),
                escape_markup(&label)
            )
        }
        // Block kinds are handled by render_body; if one slips through
        // (custom registry misuse), degrade to its literal content.
        _ => escape_markup(&el.content),
    }
}

fn is_block(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Header1
            | ElementKind::Header2
            | ElementKind::Header3
            | ElementKind::Image
            | ElementKind::Separator
    )
}

/// Render a parsed markup tree into `container`.
pub fn render_body(container: &GtkBox, nodes: &[MarkupNode], registry: &TagRegistry) {
    let mut inline_buf = String::new();

    for node in nodes {
        match node {
            MarkupNode::Text(t) => inline_buf.push_str(&escape_markup(t)),
            MarkupNode::Element(el) => {
                let kind = registry.get(&el.tag).map(|d| d.element);
                match kind {
                    Some(ElementKind::LineBreak) => inline_buf.push('\n'),
                    Some(k) if is_block(k) => {
                        flush_inline(container, &mut inline_buf);
                        append_block(container, el, k, registry);
                    }
                    _ => inline_buf.push_str(&inline_markup(std::slice::from_ref(node), registry)),
                }
            }
        }
    }

    flush_inline(container, &mut inline_buf);
}

fn flush_inline(container: &GtkBox, buf: &mut String) {
    if buf.trim().is_empty() {
        buf.clear();
        return;
    }
    let label = Label::new(None);
    label.set_markup(buf);
    label.add_css_class(toast::TEXT);
    label.set_xalign(0.0);
    label.set_wrap(true);
    label.set_wrap_mode(gtk4::pango::WrapMode::WordChar);
    label.set_halign(Align::Fill);
    container.append(&label);
    buf.clear();
}

fn append_block(container: &GtkBox, el: &ElementNode, kind: ElementKind, registry: &TagRegistry) {
    match kind {
        ElementKind::Separator => {
            let sep = gtk4::Separator::new(Orientation::Horizontal);
            apply_tag_classes(&sep, el, registry);
            container.append(&sep);
        }
        ElementKind::Image => {
            container.append(&build_image(el, registry));
        }
        ElementKind::Header1 | ElementKind::Header2 | ElementKind::Header3 => {
            let label = Label::new(None);
            label.set_markup(inline_markup(&el.children, registry).trim());
            apply_tag_classes(&label, el, registry);
            label.add_css_class(match kind {
                ElementKind::Header1 => markup::HEADER1,
                ElementKind::Header2 => markup::HEADER2,
                _ => markup::HEADER3,
            });
            label.set_xalign(0.0);
            label.set_wrap(true);
            label.set_wrap_mode(gtk4::pango::WrapMode::WordChar);
            container.append(&label);
        }
        _ => {}
    }
}

fn build_image(el: &ElementNode, registry: &TagRegistry) -> gtk4::Image {
    let attrs = registry
        .get(&el.tag)
        .map(|def| def.expand_attributes(el.title.as_deref(), &el.content))
        .unwrap_or_default();
    let src = attrs
        .iter()
        .find(|(name, _)| name == "src")
        .map(|(_, value)| value.as_str())
        .unwrap_or(el.content.as_str());
    let alt = attrs
        .iter()
        .find(|(name, _)| name == "alt")
        .map(|(_, value)| value.as_str());

    let image = if Path::new(src).exists() {
        gtk4::Image::from_file(src)
    } else {
        debug!("image source not found, using placeholder: {}", src);
        gtk4::Image::from_icon_name("image-missing-symbolic")
    };
    image.set_pixel_size(96);
    image.set_halign(Align::Start);
    apply_tag_classes(&image, el, registry);
    if let Some(alt) = alt.filter(|a| !a.is_empty()) {
        image.set_tooltip_text(Some(alt));
    }
    image
}

fn apply_tag_classes(widget: &impl IsA<gtk4::Widget>, el: &ElementNode, registry: &TagRegistry) {
    if let Some(def) = registry.get(&el.tag) {
        for class in &def.css_classes {
            widget.add_css_class(class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use toastline_core::markup::parse;

    fn registry() -> TagRegistry {
        TagRegistry::with_defaults()
    }

    #[test]
    fn escapes_pango_metacharacters() {
        assert_eq!(escape_markup("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_markup("\"x\""), "&quot;x&quot;");
    }

    #[test]
    fn bold_and_italic_map_to_pango_tags() {
        let reg = registry();
        let nodes = parse("**a** and *b*", &reg);
        assert_eq!(inline_markup(&nodes, &reg), "<b>a</b> and <i>b</i>");
    }

    #[test]
    fn nested_spans_nest_pango_tags() {
        let reg = registry();
        let nodes = parse("**a *b* c**", &reg);
        assert_eq!(inline_markup(&nodes, &reg), "<b>a <i>b</i> c</b>");
    }

    #[test]
    fn code_is_escaped_not_reinterpreted() {
        let reg = registry();
        let nodes = parse("``<script>``", &reg);
        assert_eq!(
            inline_markup(&nodes, &reg),
            "<tt>&lt;script&gt;</tt>"
        );
    }

    #[test]
    fn link_expands_href_and_label() {
        let reg = registry();
        let nodes = parse("{{Docs|https://example.com?a=1&b=2}}", &reg);
        assert_eq!(
            inline_markup(&nodes, &reg),
            "<a href=\"https://example.com?a=1&amp;b=2\">Docs</a>"
        );
    }

    #[test]
    fn text_content_is_escaped() {
        let reg = registry();
        let nodes = parse("1 < 2 && 3 > 2", &reg);
        assert_eq!(inline_markup(&nodes, &reg), "1 &lt; 2 &amp;&amp; 3 &gt; 2");
    }
}
