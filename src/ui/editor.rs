//! Markdown editor panel

use eframe::egui;
use egui_extras::syntax_highlighting::{self, CodeTheme};

use crate::core::config::EditorConfig;

/// Markdown editor panel.
///
/// Owns the text being edited. The document is pushed in with [`sync`] and
/// edits come back out of [`show`].
///
/// [`sync`]: EditorPanel::sync
/// [`show`]: EditorPanel::show
pub struct EditorPanel {
    buffer: String,
}

impl EditorPanel {
    pub fn new(content: &str) -> Self {
        Self {
            buffer: content.to_string(),
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Take an externally changed document, only if it differs from the buffer
    pub fn sync(&mut self, document: &str) -> bool {
        if self.buffer == document {
            return false;
        }
        self.buffer.clear();
        self.buffer.push_str(document);
        true
    }

    /// Show the editor. Returns the full text after an edit.
    pub fn show(&mut self, ui: &mut egui::Ui, config: &EditorConfig) -> Option<String> {
        ui.style_mut().text_styles.insert(
            egui::TextStyle::Monospace,
            egui::FontId::monospace(config.font_size),
        );

        let theme = CodeTheme::from_memory(ui.ctx(), ui.style());
        let word_wrap = config.word_wrap;
        let mut layouter = |ui: &egui::Ui, buf: &dyn egui::TextBuffer, wrap_width: f32| {
            let mut job =
                syntax_highlighting::highlight(ui.ctx(), ui.style(), &theme, buf.as_str(), "md");
            job.wrap.max_width = if word_wrap { wrap_width } else { f32::INFINITY };
            ui.fonts(|f| f.layout_job(job))
        };

        let scroll = if word_wrap {
            egui::ScrollArea::vertical()
        } else {
            egui::ScrollArea::both()
        };

        let mut changed = false;
        scroll.id_salt("editor_scroll").show(ui, |ui| {
            ui.horizontal_top(|ui| {
                if config.show_line_numbers {
                    Self::show_gutter(ui, &self.buffer);
                }

                let response = egui::TextEdit::multiline(&mut self.buffer)
                    .font(egui::TextStyle::Monospace)
                    .code_editor()
                    .desired_width(f32::INFINITY)
                    .desired_rows(30)
                    .frame(false)
                    .layouter(&mut layouter)
                    .show(ui);

                changed = response.response.changed();
            });
        });

        changed.then(|| self.buffer.clone())
    }

    fn show_gutter(ui: &mut egui::Ui, text: &str) {
        let numbers = line_numbers(text);
        let color = ui.visuals().weak_text_color();
        ui.add(
            egui::Label::new(
                egui::RichText::new(numbers)
                    .text_style(egui::TextStyle::Monospace)
                    .color(color),
            )
            .selectable(false),
        );
    }
}

/// Gutter text: one number per line, counting a trailing empty line
fn line_numbers(text: &str) -> String {
    let count = text.split('\n').count();
    let width = count.to_string().len();
    (1..=count)
        .map(|n| format!("{n:>width$}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_only_when_different() {
        let mut editor = EditorPanel::new("# Draft");
        assert!(!editor.sync("# Draft"));
        assert!(editor.sync("# Loaded from file"));
        assert_eq!(editor.text(), "# Loaded from file");
        assert!(!editor.sync("# Loaded from file"));
    }

    #[test]
    fn test_line_numbers() {
        assert_eq!(line_numbers(""), "1");
        assert_eq!(line_numbers("a\nb"), "1\n2");
        assert_eq!(line_numbers("a\n"), "1\n2");
        let padded = line_numbers(&"x\n".repeat(10));
        assert!(padded.starts_with(" 1\n 2\n"));
        assert!(padded.ends_with("\n10\n11"));
    }
}
