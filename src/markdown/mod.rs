//! Markdown to sanitized HTML rendering for the preview and print export
//!
//! Rendering policy is fixed: GFM extensions, highlighted fenced code,
//! read-only task checkboxes, wrapped tables, and an allow-list pass over the
//! final markup so embedded raw HTML can never run script.

pub mod highlight;
pub mod sanitize;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::core::theme::ResolvedTheme;
use highlight::Highlighter;

/// Markdown renderer
pub struct Renderer {
    highlighter: Highlighter,
    sanitizer: ammonia::Builder<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            highlighter: Highlighter::new(),
            sanitizer: sanitize::sanitizer(),
        }
    }

    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options
    }

    /// Render markdown to sanitized HTML
    pub fn render(&self, markdown: &str) -> String {
        let events = self.decorate(Parser::new_ext(markdown, Self::options()));

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        self.sanitizer.clean(&html_output).to_string()
    }

    /// Syntax highlighting stylesheet matching the rendered code classes
    pub fn code_css(&self, theme: ResolvedTheme) -> String {
        self.highlighter.css(theme)
    }

    /// Rewrite parser events into the preview's markup conventions
    fn decorate<'a>(&self, parser: Parser<'a>) -> Vec<Event<'a>> {
        let events: Vec<Event<'a>> = parser.collect();
        let mut out = Vec::with_capacity(events.len());

        // Per open list item: whether a task label span is still open
        let mut label_open: Vec<bool> = Vec::new();
        // Language and text of the fenced block being collected
        let mut code: Option<(String, String)> = None;

        for (i, event) in events.iter().enumerate() {
            if let Some((_, text)) = code.as_mut() {
                match event {
                    Event::Text(t) => {
                        text.push_str(t);
                        continue;
                    }
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, text)) = code.take() {
                            let block = self.highlighter.highlight_block(&text, &lang);
                            out.push(Event::Html(CowStr::from(block)));
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            // A task label holds inline content only
            if starts_block(event) {
                close_label(&mut label_open, &mut out);
            }

            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    match self.highlighter.language(info) {
                        Some(lang) => code = Some((lang.to_string(), String::new())),
                        None => out.push(event.clone()),
                    }
                }
                Event::Start(Tag::Item) => {
                    label_open.push(false);
                    if is_task_item(&events[i + 1..]) {
                        out.push(Event::Html(r#"<li class="task-list-item">"#.into()));
                    } else {
                        out.push(event.clone());
                    }
                }
                Event::TaskListMarker(checked) => {
                    let input = if *checked {
                        r#"<input type="checkbox" checked=""><span>"#
                    } else {
                        r#"<input type="checkbox"><span>"#
                    };
                    out.push(Event::Html(input.into()));
                    if let Some(open) = label_open.last_mut() {
                        *open = true;
                    }
                }
                Event::End(TagEnd::Paragraph) => {
                    close_label(&mut label_open, &mut out);
                    out.push(event.clone());
                }
                Event::End(TagEnd::Item) => {
                    close_label(&mut label_open, &mut out);
                    label_open.pop();
                    out.push(event.clone());
                }
                Event::Start(Tag::Table(_)) => {
                    out.push(Event::Html(r#"<div class="table-wrapper">"#.into()));
                    out.push(event.clone());
                }
                Event::End(TagEnd::Table) => {
                    out.push(event.clone());
                    out.push(Event::Html("</div>\n".into()));
                }
                _ => out.push(event.clone()),
            }
        }

        out
    }
}

/// An item is a task item when its first content is a task marker,
/// possibly inside the paragraph of a loose list.
fn is_task_item(rest: &[Event<'_>]) -> bool {
    match rest {
        [Event::TaskListMarker(_), ..] => true,
        [Event::Start(Tag::Paragraph), Event::TaskListMarker(_), ..] => true,
        _ => false,
    }
}

fn starts_block(event: &Event<'_>) -> bool {
    match event {
        Event::Start(tag) => !matches!(
            tag,
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
        ),
        Event::Rule => true,
        _ => false,
    }
}

fn close_label(label_open: &mut [bool], out: &mut Vec<Event<'_>>) {
    if let Some(open) = label_open.last_mut() {
        if *open {
            out.push(Event::Html("</span>".into()));
            *open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::SAMPLE_MARKDOWN;

    /// Markup of each `<li class="task-list-item">` element, in order
    fn task_items(html: &str) -> Vec<&str> {
        html.split(r#"<li class="task-list-item">"#)
            .skip(1)
            .map(|rest| rest.split("</li>").next().unwrap_or(rest))
            .collect()
    }

    #[test]
    fn test_task_list_checkboxes() {
        let renderer = Renderer::new();
        let html = renderer.render("- [x] Completed task\n- [ ] Incomplete task\n");

        let items = task_items(&html);
        assert_eq!(items.len(), 2, "{html}");

        assert!(items[0].contains(r#"type="checkbox""#));
        assert!(items[0].contains(r#"checked="""#));
        assert!(items[0].contains(r#"disabled="""#));
        assert!(items[0].contains("<span>Completed task</span>"));

        assert!(!items[1].contains("checked"));
        assert!(items[1].contains(r#"disabled="""#));
        assert!(items[1].contains("<span>Incomplete task</span>"));
    }

    #[test]
    fn test_task_labels_match_marker_text() {
        let renderer = Renderer::new();
        for (marker, checked) in [("[ ]", false), ("[x]", true), ("[X]", true)] {
            for label in ["text", "buy milk", "ship v2.0 release"] {
                let html = renderer.render(&format!("- {marker} {label}\n"));
                let items = task_items(&html);
                assert_eq!(items.len(), 1, "{html}");
                assert_eq!(items[0].contains("checked"), checked, "{html}");
                assert!(items[0].contains(&format!("<span>{label}</span>")), "{html}");
            }
        }
    }

    #[test]
    fn test_loose_and_nested_task_items() {
        let renderer = Renderer::new();
        let html = renderer.render("- [x] parent\n  - [ ] child\n\n- [ ] loose\n");

        let items = task_items(&html);
        assert_eq!(items.len(), 3, "{html}");
        // The nested list sits outside the parent's label
        assert!(html.contains("<span>parent</span>"), "{html}");
        assert!(html.contains("<span>child</span>"), "{html}");
        assert!(html.contains("<span>loose</span>"), "{html}");
    }

    #[test]
    fn test_task_label_stops_at_block_content() {
        let renderer = Renderer::new();
        let cases = [
            "- [ ] todo\n  ```rust\n  let x = 1;\n  ```\n",
            "- [ ] todo\n  > quoted\n",
            "- [ ] todo\n  # heading\n",
            "- [ ] todo\n  ***\n",
        ];
        for markdown in cases {
            let html = renderer.render(markdown);
            let items = task_items(&html);
            assert_eq!(items.len(), 1, "{html}");
            assert!(items[0].contains("<span>todo</span>"), "{html}");
        }

        let html = renderer.render(cases[0]);
        let label = html.find("<span>todo</span>").unwrap();
        let code = html.find(r#"<pre class="code-block">"#).unwrap();
        assert!(label < code, "{html}");
    }

    #[test]
    fn test_task_label_keeps_inline_markup() {
        let renderer = Renderer::new();
        let html = renderer.render("- [x] ship **now** via [docs](https://a.example)\n");
        let items = task_items(&html);
        assert_eq!(items.len(), 1, "{html}");
        assert!(items[0].contains("<span>ship <strong>now</strong> via <a "), "{html}");
        assert!(items[0].contains("docs</a></span>"), "{html}");
    }

    #[test]
    fn test_plain_items_unchanged() {
        let renderer = Renderer::new();
        let html = renderer.render("- one\n- [link](https://a.example)\n");
        assert!(!html.contains("task-list-item"));
        assert!(!html.contains("<input"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let renderer = Renderer::new();
        assert_eq!(renderer.render(SAMPLE_MARKDOWN), renderer.render(SAMPLE_MARKDOWN));
        assert_eq!(
            renderer.render(SAMPLE_MARKDOWN),
            Renderer::new().render(SAMPLE_MARKDOWN)
        );
    }

    #[test]
    fn test_fenced_code_highlighted() {
        let renderer = Renderer::new();
        let html = renderer.render("```javascript\nfunction hello() {}\n```\n");
        assert!(html.contains(r#"<pre class="code-block"><code class="language-javascript">"#));
        assert!(html.contains("hl-"));
    }

    #[test]
    fn test_unlabelled_code_is_plain() {
        let renderer = Renderer::new();
        let html = renderer.render("```\n<b>raw</b>\n```\n");
        assert!(html.contains("<pre><code>&lt;b&gt;raw&lt;/b&gt;"), "{html}");
        assert!(!html.contains("code-block"));
    }

    #[test]
    fn test_raw_html_sanitized() {
        let renderer = Renderer::new();
        let html = renderer.render(
            "<div onclick=\"x()\">kept <em>inline</em></div>\n\n<script>alert(1)</script>\n\nafter <img src=\"a.png\" onerror=\"x()\">\n",
        );
        assert!(html.contains("kept"));
        assert!(html.contains("<em>inline</em>"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert"));
        assert!(!html.contains("onclick"));
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn test_tables_wrapped() {
        let renderer = Renderer::new();
        let html = renderer.render("| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains(r#"<div class="table-wrapper"><table>"#), "{html}");
        assert!(html.contains("<th>A</th>"), "{html}");
        assert!(html.contains("<td>2</td>"), "{html}");
    }

    #[test]
    fn test_links_open_in_new_window() {
        let renderer = Renderer::new();
        let html = renderer.render("[Visit GitHub](https://github.com)\n");
        assert!(html.contains(r#"href="https://github.com""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
    }

    #[test]
    fn test_images_keep_alt() {
        let renderer = Renderer::new();
        let html = renderer.render("![](/placeholder.svg)\n");
        assert!(html.contains(r#"src="/placeholder.svg""#), "{html}");
        assert!(html.contains(r#"alt="""#), "{html}");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(Renderer::new().render(""), "");
    }
}
