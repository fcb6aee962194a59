//! Main application state and UI coordination

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::export::{BrowserPrintSurface, DownloadDir};
use crate::core::storage::FileStorage;
use crate::core::theme::{ResolvedTheme, ThemePreference};
use crate::core::workspace::{is_markdown_file, ViewMode, Workspace};
use crate::markdown::Renderer;
use crate::ui::{editor::EditorPanel, layout, preview::PreviewPanel, toast};

/// Actions requested from the header or keyboard in one frame
#[derive(Debug, Default)]
struct Requests {
    save: bool,
    open: bool,
    export: bool,
}

/// Register the image loaders the preview needs for markdown images
fn install_loaders(ctx: &egui::Context) {
    egui_extras::install_image_loaders(ctx);
}

/// Main application state
pub struct CerberusApp {
    /// Application configuration
    config: AppConfig,
    /// Document, view mode and theme
    workspace: Workspace,
    renderer: Renderer,
    editor: EditorPanel,
    preview: PreviewPanel,
    downloads: DownloadDir,
    print_surface: BrowserPrintSurface,
    /// Theme applied to the context; `None` until resolved
    resolved_theme: Option<ResolvedTheme>,
}

impl CerberusApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        install_loaders(&cc.egui_ctx);

        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {:#}", e);
            AppConfig::default()
        });

        let storage = FileStorage::open(config.storage_path());
        let workspace = Workspace::load(Box::new(storage), &config);
        let editor = EditorPanel::new(workspace.content());

        Self {
            config,
            workspace,
            renderer: Renderer::new(),
            editor,
            preview: PreviewPanel::default(),
            downloads: DownloadDir::user_default(),
            print_surface: BrowserPrintSurface::default(),
            resolved_theme: None,
        }
    }

    /// Resolve the theme preference against the platform and apply it
    fn apply_theme(&mut self, ctx: &egui::Context) {
        let system = ctx.system_theme().map(ResolvedTheme::from_egui);
        let resolved = self.workspace.theme().resolve(system);
        ctx.set_theme(resolved.to_egui());
        self.resolved_theme = Some(resolved);
        tracing::debug!("Applied {:?} theme ({})", resolved, self.workspace.theme());
    }

    fn set_theme(&mut self, theme: ThemePreference) {
        self.workspace.set_theme(theme);
        self.resolved_theme = None;
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Markdown", &["md", "markdown"])
            .pick_file()
        {
            self.open_path(&path);
        }
    }

    fn open_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        match std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
        {
            Ok(content) => {
                if self.workspace.open_document(&name, content) {
                    self.editor.sync(self.workspace.content());
                }
            }
            Err(e) => self.workspace.open_failed(&name, &e),
        }
    }

    /// Open markdown files dropped onto the window
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });

        for path in dropped {
            if is_markdown_file(&path) {
                self.open_path(&path);
            } else {
                tracing::warn!("Ignoring dropped file: {}", path.display());
                self.workspace.notifications.error(
                    "Unsupported file",
                    "Only .md and .markdown files can be opened.",
                );
            }
        }
    }

    /// Keep the divider position for the next launch
    fn remember_split_ratio(&mut self) {
        self.config.layout.split_ratio = self.workspace.split_ratio();
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save split ratio: {:#}", e);
        }
    }

    /// Fire a pending export once its delay has passed
    fn poll_export(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        match self.workspace.export_remaining(now) {
            Some(remaining) if remaining.is_zero() => {
                let code_css = self.renderer.code_css(ResolvedTheme::Light);
                self.workspace.poll_export(
                    now,
                    self.preview.markup_for(self.workspace.document()),
                    &code_css,
                    &self.print_surface,
                );
            }
            Some(remaining) => ctx.request_repaint_after(remaining + Duration::from_millis(10)),
            None => {}
        }
    }

    /// Render the header with title, view tabs and actions
    fn render_header(&mut self, ctx: &egui::Context, requests: &mut Requests) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Cerberus");
                ui.separator();

                for mode in ViewMode::ALL {
                    if ui
                        .selectable_label(self.workspace.view_mode() == mode, mode.label())
                        .clicked()
                    {
                        self.workspace.set_view_mode(mode);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let is_dark = self.resolved_theme.is_some_and(ResolvedTheme::is_dark);
                    let icon = if is_dark { "☀" } else { "🌙" };
                    if ui.button(icon).on_hover_text("Toggle theme").clicked() {
                        self.workspace.toggle_theme();
                        self.resolved_theme = None;
                    }

                    ui.menu_button("Theme", |ui| {
                        for theme in ThemePreference::ALL {
                            if ui
                                .selectable_label(self.workspace.theme() == theme, theme.label())
                                .clicked()
                            {
                                self.set_theme(theme);
                                ui.close();
                            }
                        }
                    });

                    ui.separator();

                    if ui.button("Export PDF").on_hover_text("Ctrl+P").clicked() {
                        requests.export = true;
                    }
                    if ui.button("Open").on_hover_text("Ctrl+O").clicked() {
                        requests.open = true;
                    }
                    if ui.button("Save").on_hover_text("Ctrl+S").clicked() {
                        requests.save = true;
                    }
                });
            });
            ui.add_space(4.0);
        });
    }
}

impl eframe::App for CerberusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.resolved_theme.is_none() {
            self.apply_theme(ctx);
        }

        // Handle keyboard shortcuts
        let mut requests = ctx.input(|i| Requests {
            save: i.modifiers.ctrl && i.key_pressed(egui::Key::S),
            open: i.modifiers.ctrl && i.key_pressed(egui::Key::O),
            export: i.modifiers.ctrl && i.key_pressed(egui::Key::P),
        });

        self.render_header(ctx, &mut requests);

        if requests.save {
            self.workspace.save_document(&self.downloads);
        }
        if requests.open {
            self.open_file_dialog();
        }
        if requests.export {
            self.workspace.request_export(Instant::now());
        }
        self.handle_dropped_files(ctx);

        self.editor.sync(self.workspace.content());

        // Render main content area
        let mut edited = None;
        egui::CentralPanel::default().show(ctx, |ui| match self.workspace.view_mode() {
            ViewMode::Edit => {
                edited = self.editor.show(ui, &self.config.editor);
            }
            ViewMode::Preview => {
                self.preview
                    .show(ui, &self.renderer, self.workspace.document());
            }
            ViewMode::Split => {
                let split = layout::split(
                    ui,
                    self.workspace.split_ratio(),
                    |ui| edited = self.editor.show(ui, &self.config.editor),
                    |ui| {
                        self.preview
                            .show(ui, &self.renderer, self.workspace.document())
                    },
                );
                self.workspace.set_split_ratio(split.ratio);
                if split.drag_stopped {
                    self.remember_split_ratio();
                }
            }
        });

        if let Some(content) = edited {
            self.workspace.update_content(content);
        }

        self.poll_export(ctx);
        toast::show(ctx, &mut self.workspace.notifications);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_loaders_installed() {
        let ctx = egui::Context::default();
        let before = ctx.loaders().image.lock().len();

        install_loaders(&ctx);

        assert!(ctx.loaders().image.lock().len() > before);
    }
}
