//! Fenced code block highlighting with syntect CSS classes

use regex_lite::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::core::theme::ResolvedTheme;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

const LIGHT_THEME: &str = "InspiredGitHub";
const DARK_THEME: &str = "base16-ocean.dark";

/// Highlights code into class-annotated spans
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    lang_token: Regex,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            // Leading word of a fence info string, e.g. "rust" in "rust,ignore"
            lang_token: Regex::new(r"^[\w+#-]+").expect("static regex"),
        }
    }

    /// Language named by a fence info string, if any
    pub fn language<'a>(&self, info: &'a str) -> Option<&'a str> {
        self.lang_token.find(info.trim()).map(|m| m.as_str())
    }

    /// Render a code block. Unknown languages are treated as plain text.
    pub fn highlight_block(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::warn!("Highlighting {} block failed: {}", lang, e);
                return format!(
                    "<pre class=\"code-block\"><code class=\"language-{lang}\">{}</code></pre>\n",
                    escape_html(code)
                );
            }
        }

        format!(
            "<pre class=\"code-block\"><code class=\"language-{lang}\">{}</code></pre>\n",
            generator.finalize()
        )
    }

    /// Stylesheet for the highlight classes in the given theme
    pub fn css(&self, theme: ResolvedTheme) -> String {
        let name = if theme.is_dark() { DARK_THEME } else { LIGHT_THEME };
        let Some(theme) = self.theme_set.themes.get(name) else {
            tracing::warn!("Missing code theme: {}", name);
            return String::new();
        };

        css_for_theme_with_class_style(theme, CLASS_STYLE).unwrap_or_else(|e| {
            tracing::warn!("Failed to build code theme CSS: {}", e);
            String::new()
        })
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_token() {
        let highlighter = Highlighter::new();
        assert_eq!(highlighter.language("rust"), Some("rust"));
        assert_eq!(highlighter.language(" rust,ignore"), Some("rust"));
        assert_eq!(highlighter.language("c++ {.numbered}"), Some("c++"));
        assert_eq!(highlighter.language(""), None);
        assert_eq!(highlighter.language("\"quoted\""), None);
    }

    #[test]
    fn test_highlight_emits_classes() {
        let highlighter = Highlighter::new();
        let html = highlighter.highlight_block("fn main() {}\n", "rust");
        assert!(html.starts_with("<pre class=\"code-block\"><code class=\"language-rust\">"));
        assert!(html.contains("hl-"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_escapes_text() {
        let highlighter = Highlighter::new();
        let html = highlighter.highlight_block("<b>&</b>\n", "nosuchlang");
        assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_css_differs_per_theme() {
        let highlighter = Highlighter::new();
        let light = highlighter.css(ResolvedTheme::Light);
        let dark = highlighter.css(ResolvedTheme::Dark);
        assert!(light.contains(".hl-"));
        assert_ne!(light, dark);
    }
}
