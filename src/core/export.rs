//! Save-to-file and print export side effects

use std::path::PathBuf;

use thiserror::Error;

/// File name used when saving the document
pub const DOCUMENT_FILE_NAME: &str = "cerberus-document.md";

/// Content type recorded for saved documents
pub const DOCUMENT_MIME: &str = "text/markdown";

/// Errors raised by print export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no rendered preview is available")]
    PreviewUnavailable,
    #[error("could not open print window: {0}")]
    WindowUnavailable(#[source] std::io::Error),
    #[error("failed to write printable document: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Text shown in the failure toast
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PreviewUnavailable => "Could not find content to export.",
            Self::WindowUnavailable(_) => {
                "Could not open print window. Please check your popup blocker settings."
            }
            Self::Io(_) => "There was an error generating your PDF. Please try again later.",
        }
    }
}

/// Destination for saved documents
pub trait Downloader {
    /// Write `content` as a file called `name`, returning where it landed
    fn download_file(&self, name: &str, mime: &str, content: &str) -> std::io::Result<PathBuf>;
}

/// Somewhere a printable HTML document can be opened
pub trait PrintSurface {
    fn open_printable(&self, html: &str) -> Result<(), ExportError>;
}

/// Saves into the user's download directory
#[derive(Debug, Clone)]
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform download directory, falling back to home then cwd
    pub fn user_default() -> Self {
        let dir = directories::UserDirs::new()
            .and_then(|dirs| {
                dirs.download_dir()
                    .map(|p| p.to_path_buf())
                    .or_else(|| Some(dirs.home_dir().to_path_buf()))
            })
            .unwrap_or_else(|| PathBuf::from("."));
        Self { dir }
    }
}

impl Downloader for DownloadDir {
    fn download_file(&self, name: &str, mime: &str, content: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, content)?;
        tracing::info!("Downloaded {} ({}) to {}", name, mime, path.display());
        Ok(path)
    }
}

/// Opens printable documents in the system browser through a temp file
#[derive(Debug, Clone)]
pub struct BrowserPrintSurface {
    path: PathBuf,
}

impl Default for BrowserPrintSurface {
    fn default() -> Self {
        Self {
            path: std::env::temp_dir().join("cerberus-export.html"),
        }
    }
}

impl PrintSurface for BrowserPrintSurface {
    fn open_printable(&self, html: &str) -> Result<(), ExportError> {
        std::fs::write(&self.path, html)?;
        open::that(&self.path).map_err(ExportError::WindowUnavailable)?;
        tracing::info!("Opened print document: {}", self.path.display());
        Ok(())
    }
}

const PRINT_CSS: &str = r#"
body {
  font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  line-height: 1.5;
  padding: 2rem;
  max-width: 210mm;
  margin: 0 auto;
}

h1, h2, h3, h4, h5, h6 {
  margin-top: 1.5em;
  margin-bottom: 0.5em;
  font-weight: 600;
}

h1 { font-size: 2em; }
h2 { font-size: 1.5em; }
h3 { font-size: 1.25em; }

p { margin: 1em 0; }

pre {
  background-color: #f5f5f5;
  padding: 1em;
  border-radius: 0.25em;
  overflow-x: auto;
}

code {
  font-family: monospace;
  background-color: #f5f5f5;
  padding: 0.2em 0.4em;
  border-radius: 0.25em;
}

pre code { padding: 0; }

blockquote {
  border-left: 4px solid #e5e7eb;
  padding-left: 1em;
  margin: 1em 0;
  font-style: italic;
}

table {
  border-collapse: collapse;
  width: 100%;
  margin: 1em 0;
}

th, td {
  border: 1px solid #e5e7eb;
  padding: 0.5em;
  text-align: left;
}

th { background-color: #f3f4f6; }

ul, ol {
  margin: 1em 0;
  padding-left: 2em;
}

li.task-list-item { list-style: none; }
li.task-list-item input { margin-right: 0.5em; }

img {
  max-width: 100%;
  height: auto;
}

@media print {
  @page {
    size: A4;
    margin: 20mm;
  }

  body { padding: 0; }

  pre, code, blockquote, table, ul, ol {
    page-break-inside: avoid;
  }

  h1, h2, h3, h4, h5, h6 {
    page-break-after: avoid;
  }
}
"#;

/// Wrap rendered preview markup in a self-contained, self-printing document.
///
/// `code_css` carries the syntax highlighting classes; nothing is fetched
/// from outside the document.
pub fn printable_document(content: &str, code_css: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Cerberus - Document Export</title>
<style>
{PRINT_CSS}
{code_css}
</style>
</head>
<body>
<div class="markdown-content">
{content}
</div>
<script>
window.onload = function() {{
  setTimeout(function() {{
    window.print();
    window.close();
  }}, 250);
}};
</script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_document_wraps_content() {
        let html = printable_document("<h1>Title</h1>", ".hl-keyword { color: red; }");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Cerberus - Document Export</title>"));
        assert!(html.contains("<div class=\"markdown-content\">\n<h1>Title</h1>\n</div>"));
        assert!(html.contains(".hl-keyword { color: red; }"));
        assert!(html.contains("size: A4;"));
        assert!(html.contains("window.print();"));
        assert!(!html.contains("<link"));
    }

    #[test]
    fn test_download_dir_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let downloads = DownloadDir::new(dir.path());
        let path = downloads
            .download_file(DOCUMENT_FILE_NAME, DOCUMENT_MIME, "# Saved")
            .unwrap();
        assert_eq!(path, dir.path().join("cerberus-document.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Saved");
    }
}
