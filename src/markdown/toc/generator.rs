use crate::markdown::pipeline::InlineRenderer;

use super::tree::{NodeId, Outline};
use super::TocOptions;

/// Render an outline as nested lists.
///
/// Only the outermost list carries `options.list_attrs`. Nodes with an anchor
/// become links; synthetic nodes produce an empty item that only wraps their
/// nested list.
pub fn render_outline(outline: &Outline, options: &TocOptions, inline: &InlineRenderer<'_>) -> String {
    let mut html = String::new();
    render_list(outline, Outline::ROOT, options, inline, true, &mut html);
    html
}

fn render_list(
    outline: &Outline,
    id: NodeId,
    options: &TocOptions,
    inline: &InlineRenderer<'_>,
    outermost: bool,
    html: &mut String,
) {
    let tag = options.list_type.tag();

    html.push('<');
    html.push_str(tag);
    if outermost && !options.list_attrs.trim().is_empty() {
        if !options.list_attrs.starts_with(char::is_whitespace) {
            html.push(' ');
        }
        html.push_str(&options.list_attrs);
    }
    html.push('>');

    for (child, node) in outline.children(id) {
        html.push_str("<li>");

        let anchor = node.anchor.as_deref().map(|anchor| match &options.transform_link {
            Some(transform) => transform(anchor),
            None => anchor.to_string(),
        });
        let text = node
            .text
            .as_deref()
            .map(|text| (options.format)(text, inline, anchor.as_deref()));

        match (&anchor, text) {
            (Some(anchor), text) => {
                html.push_str(&format!(
                    "<a href=\"#{}\">{}</a>",
                    html_escape::encode_double_quoted_attribute(anchor),
                    text.unwrap_or_default()
                ));
            }
            (None, Some(text)) => html.push_str(&text),
            (None, None) => {}
        }

        if !node.children().is_empty() {
            render_list(outline, child, options, inline, false, html);
        }
        html.push_str("</li>");
    }

    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::markdown::engine::ComrakEngine;
    use crate::markdown::toc::headlines::Headline;
    use crate::markdown::toc::ListType;

    fn render(headlines: &[Headline], options: &TocOptions) -> String {
        let engine = ComrakEngine::new();
        let inline = InlineRenderer::new(&engine);
        render_outline(&Outline::build(headlines), options, &inline)
    }

    #[test]
    fn test_nested_lists() {
        let html = render(
            &[
                Headline::new(1, Some("a"), Some("A")),
                Headline::new(2, Some("b"), Some("B")),
                Headline::new(1, Some("c"), Some("C")),
            ],
            &TocOptions::default(),
        );

        assert_eq!(
            html,
            "<ul><li><a href=\"#a\">A</a><ul><li><a href=\"#b\">B</a></li></ul></li><li><a href=\"#c\">C</a></li></ul>"
        );
    }

    #[test]
    fn test_synthetic_node_renders_unlabeled_wrapper() {
        let html = render(
            &[Headline::new(1, Some("a"), Some("A")), Headline::new(3, Some("b"), Some("B"))],
            &TocOptions::default(),
        );

        assert_eq!(
            html,
            "<ul><li><a href=\"#a\">A</a><ul><li><ul><li><a href=\"#b\">B</a></li></ul></li></ul></li></ul>"
        );
    }

    #[test]
    fn test_empty_outline() {
        assert_eq!(render(&[], &TocOptions::default()), "<ul></ul>");
    }

    #[test]
    fn test_list_attrs_only_on_outermost_list() {
        let options = TocOptions::default()
            .with_list_type(ListType::Ol)
            .with_list_attrs("class=\"toc\"");
        let html = render(
            &[Headline::new(1, Some("a"), Some("A")), Headline::new(2, Some("b"), Some("B"))],
            &options,
        );

        assert!(html.starts_with("<ol class=\"toc\"><li>"));
        assert_eq!(html.matches("class=\"toc\"").count(), 1);
        assert!(html.contains("<ol><li><a href=\"#b\">B</a></li></ol>"));
    }

    #[test]
    fn test_transform_link_and_format() {
        let options = TocOptions::default()
            .with_transform_link(Arc::new(|anchor: &str| format!("page-{}", anchor)))
            .with_format(Arc::new(|text: &str, _inline: &InlineRenderer<'_>, anchor: Option<&str>| {
                format!("{} ({})", text.to_uppercase(), anchor.unwrap_or("-"))
            }));
        let html = render(&[Headline::new(1, Some("intro"), Some("Intro"))], &options);

        assert_eq!(html, "<ul><li><a href=\"#page-intro\">INTRO (page-intro)</a></li></ul>");
    }

    #[test]
    fn test_default_format_renders_inline_markdown() {
        let html = render(
            &[Headline::new(1, Some("x"), Some("a *b* & <c>"))],
            &TocOptions::default(),
        );

        assert!(html.contains("<a href=\"#x\">a <em>b</em> &amp; <c></a>"));
    }

    #[test]
    fn test_text_without_anchor_and_anchor_without_text() {
        let html = render(
            &[Headline::new(1, None, Some("Plain")), Headline::new(1, Some("bare"), None)],
            &TocOptions::default(),
        );

        assert_eq!(html, "<ul><li>Plain</li><li><a href=\"#bare\"></a></li></ul>");
    }
}
