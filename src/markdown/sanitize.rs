//! Allow-list sanitization of rendered markup

use std::borrow::Cow;

/// Build the sanitizer applied to every rendered document.
///
/// Starts from ammonia's defaults and additionally allows the markup the
/// renderer itself produces: CSS classes, footnote ids and read-only task
/// checkboxes. Links always open in a new window without a referrer.
pub fn sanitizer() -> ammonia::Builder<'static> {
    let mut builder = ammonia::Builder::default();
    builder
        .add_tags(&["input"])
        .add_generic_attributes(&["class", "id"])
        .add_tag_attributes("input", &["type", "checked"])
        .set_tag_attribute_value("input", "disabled", "")
        .set_tag_attribute_value("a", "target", "_blank")
        .link_rel(Some("noopener noreferrer"))
        .attribute_filter(|element, attribute, value| {
            match (element, attribute) {
                ("input", "type") if value != "checkbox" => Some(Cow::Borrowed("checkbox")),
                _ => Some(Cow::Borrowed(value)),
            }
        });
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(html: &str) -> String {
        sanitizer().clean(html).to_string()
    }

    #[test]
    fn test_strips_scripts_and_handlers() {
        let html = clean(r#"<p onclick="steal()">hi</p><script>alert(1)</script>"#);
        assert_eq!(html, "<p>hi</p>");
    }

    #[test]
    fn test_strips_javascript_urls() {
        let html = clean(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_links_open_without_referrer() {
        let html = clean(r#"<a href="https://example.com">x</a>"#);
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn test_inputs_become_disabled_checkboxes() {
        let html = clean(r#"<input type="text" value="x" checked="">"#);
        assert!(html.contains(r#"type="checkbox""#));
        assert!(html.contains(r#"disabled="""#));
        assert!(!html.contains("value="));
    }

    #[test]
    fn test_keeps_classes() {
        let html = clean(r#"<span class="hl-keyword">fn</span>"#);
        assert_eq!(html, r#"<span class="hl-keyword">fn</span>"#);
    }
}
