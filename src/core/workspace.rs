//! Editing session state: the document, view mode, theme and pending actions

use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::config::AppConfig;
use super::document::Document;
use super::export::{
    printable_document, Downloader, ExportError, PrintSurface, DOCUMENT_FILE_NAME, DOCUMENT_MIME,
};
use super::notification::Notifications;
use super::storage::Storage;
use super::theme::ThemePreference;

/// View mode for the editor area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Split,
    Edit,
    Preview,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [Self::Split, Self::Edit, Self::Preview];

    pub fn label(self) -> &'static str {
        match self {
            Self::Split => "Split View",
            Self::Edit => "Edit",
            Self::Preview => "Preview",
        }
    }
}

/// Smallest share of the split view either pane may take
pub const MIN_PANE_RATIO: f32 = 0.3;

/// Check if a file path points to a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

/// The single-document editing session
pub struct Workspace {
    storage: Box<dyn Storage>,
    document: Document,
    view_mode: ViewMode,
    theme: ThemePreference,
    split_ratio: f32,
    pub notifications: Notifications,
    /// Deadline of a requested print export
    pending_export: Option<Instant>,
    export_delay: Duration,
}

impl Workspace {
    /// Restore the session from the store
    pub fn load(storage: Box<dyn Storage>, config: &AppConfig) -> Self {
        let document = Document::load(storage.as_ref());
        let theme = ThemePreference::load(storage.as_ref());

        let mut workspace = Self {
            storage,
            document,
            view_mode: config.layout.default_view,
            theme,
            split_ratio: 0.5,
            notifications: Notifications::default(),
            pending_export: None,
            export_delay: Duration::from_millis(config.export.render_delay_ms),
        };
        workspace.set_split_ratio(config.layout.split_ratio);
        // Mirror the stored state back, as a fresh session does on mount
        workspace.document.persist(workspace.storage.as_mut());
        workspace.theme.persist(workspace.storage.as_mut());
        workspace
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn content(&self) -> &str {
        self.document.content()
    }

    /// Apply an edit. The store is written whenever the text changed.
    pub fn update_content(&mut self, content: String) -> bool {
        let changed = self.document.set_content(content);
        if changed {
            self.document.persist(self.storage.as_mut());
        }
        changed
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            tracing::debug!("View mode: {:?} -> {:?}", self.view_mode, mode);
            self.view_mode = mode;
        }
    }

    pub fn split_ratio(&self) -> f32 {
        self.split_ratio
    }

    /// Set the editor share of the split view, keeping both panes at 30% or more
    pub fn set_split_ratio(&mut self, ratio: f32) {
        let ratio = if ratio.is_finite() { ratio } else { 0.5 };
        self.split_ratio = ratio.clamp(MIN_PANE_RATIO, 1.0 - MIN_PANE_RATIO);
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn set_theme(&mut self, theme: ThemePreference) {
        self.theme = theme;
        self.theme.persist(self.storage.as_mut());
        tracing::info!("Theme set to {}", theme);
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    /// Save the document as a download
    pub fn save_document(&mut self, downloader: &dyn Downloader) {
        match downloader.download_file(DOCUMENT_FILE_NAME, DOCUMENT_MIME, self.content()) {
            Ok(_) => {
                self.notifications
                    .success("Document saved", "Your markdown file has been downloaded.");
            }
            Err(e) => {
                tracing::error!("Failed to save document: {}", e);
                self.notifications
                    .error("Save failed", format!("Could not save the document: {e}"));
            }
        }
    }

    /// Replace the document with the contents of an opened file.
    ///
    /// Empty files are ignored. Returns whether the document was replaced.
    pub fn open_document(&mut self, file_name: &str, content: String) -> bool {
        if content.is_empty() {
            tracing::warn!("Ignoring empty file: {}", file_name);
            return false;
        }

        tracing::info!("Loaded {} ({} bytes)", file_name, content.len());
        self.update_content(content);
        self.notifications.success(
            "File loaded",
            format!("{file_name} has been loaded successfully."),
        );
        true
    }

    /// Report a file that could not be read
    pub fn open_failed(&mut self, file_name: &str, error: &anyhow::Error) {
        tracing::error!("Failed to open {}: {:#}", file_name, error);
        self.notifications
            .error("Open failed", format!("{file_name} could not be read."));
    }

    /// Start a print export: switch to the preview and arm the delay
    pub fn request_export(&mut self, now: Instant) {
        self.set_view_mode(ViewMode::Preview);
        self.notifications.info("Preparing PDF", "Opening print dialog...");
        self.pending_export = Some(now + self.export_delay);
    }

    /// Time left before a pending export fires
    pub fn export_remaining(&self, now: Instant) -> Option<Duration> {
        self.pending_export
            .map(|due| due.saturating_duration_since(now))
    }

    /// Run the pending export once its delay has passed.
    ///
    /// `preview` is the current rendered preview markup, if the preview has
    /// been rendered at all. Returns `None` while nothing is due.
    pub fn poll_export(
        &mut self,
        now: Instant,
        preview: Option<&str>,
        code_css: &str,
        surface: &dyn PrintSurface,
    ) -> Option<Result<(), ExportError>> {
        let due = self.pending_export?;
        if now < due {
            return None;
        }
        self.pending_export = None;

        let result = preview
            .ok_or(ExportError::PreviewUnavailable)
            .and_then(|markup| surface.open_printable(&printable_document(markup, code_css)));

        if let Err(e) = &result {
            tracing::error!("Export failed: {}", e);
            self.notifications.error("Export failed", e.user_message());
        }
        Some(result)
    }
}
