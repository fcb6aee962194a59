//! Markdown preview panel using egui_commonmark

use eframe::egui;
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};

use crate::core::document::Document;
use crate::markdown::Renderer;

/// Rendered markup for one document revision
#[derive(Debug, Clone)]
pub struct RenderedPreview {
    pub revision: u64,
    pub html: String,
}

/// Markdown preview panel
#[derive(Default)]
pub struct PreviewPanel {
    rendered: Option<RenderedPreview>,
    cache: CommonMarkCache,
}

impl PreviewPanel {
    /// Markup rendered from the current revision of `document`.
    ///
    /// `None` until the preview has been shown for that revision.
    pub fn markup_for(&self, document: &Document) -> Option<&str> {
        self.rendered
            .as_ref()
            .filter(|r| r.revision == document.revision())
            .map(|r| r.html.as_str())
    }

    /// Re-render when the document moved past the cached revision
    pub fn refresh(&mut self, renderer: &Renderer, document: &Document) -> &RenderedPreview {
        let stale = self
            .rendered
            .as_ref()
            .map_or(true, |r| r.revision != document.revision());
        if stale {
            self.rendered = None;
        }

        self.rendered.get_or_insert_with(|| RenderedPreview {
            revision: document.revision(),
            html: renderer.render(document.content()),
        })
    }

    /// Show the preview panel
    pub fn show(&mut self, ui: &mut egui::Ui, renderer: &Renderer, document: &Document) {
        self.refresh(renderer, document);

        egui::ScrollArea::vertical()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                ui.add_space(8.0);
                if document.content().trim().is_empty() {
                    Self::show_empty(ui);
                } else {
                    CommonMarkViewer::new().show(ui, &mut self.cache, document.content());
                }
            });
    }

    /// Show empty state
    fn show_empty(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(50.0);
            ui.weak("Nothing to preview");
        });
    }
}
