//! The markdown document being edited

use super::storage::{Storage, CONTENT_KEY};

/// Document shown when nothing has been stored yet
pub const SAMPLE_MARKDOWN: &str = r#"# Welcome to Cerberus

## Features

- **Live Preview**: See your changes in real-time
- **Syntax Highlighting**: For code blocks
- **Split Pane Layout**: Resize as needed
- **Light/Dark Mode**: Toggle with the button in the header
- **Local Storage**: Your content is saved automatically

## Markdown Examples

### Lists

- Item 1
- Item 2
  - Nested item
  - Another nested item
- Item 3

### Code Blocks

```javascript
function hello() {
  console.log("Hello, world!");
}
```

### Tables

| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |
| Cell 3   | Cell 4   |

### Task Lists

- [x] Completed task
- [ ] Incomplete task

### Blockquotes

> This is a blockquote.
> It can span multiple lines.

### Links and Images

[Visit GitHub](https://github.com)

![Placeholder Image](/placeholder.svg?height=200&width=400)
"#;

/// A markdown document
#[derive(Debug, Clone)]
pub struct Document {
    content: String,
    /// Bumped on every content change
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(SAMPLE_MARKDOWN.to_string())
    }
}

impl Document {
    pub fn new(content: String) -> Self {
        Self {
            content,
            revision: 0,
        }
    }

    /// Load the stored document, or the sample if nothing was stored
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.load_text(CONTENT_KEY) {
            Some(content) => {
                tracing::info!("Restored document from store ({} bytes)", content.len());
                Self::new(content)
            }
            None => {
                tracing::info!("No stored document, starting from sample");
                Self::default()
            }
        }
    }

    /// Write the document to the store. Failures are logged only.
    pub fn persist(&self, storage: &mut dyn Storage) {
        if let Err(e) = storage.save_text(CONTENT_KEY, &self.content) {
            tracing::error!("Failed to persist document: {}", e);
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the content. Returns whether anything changed.
    pub fn set_content(&mut self, content: String) -> bool {
        if self.content == content {
            return false;
        }
        self.content = content;
        self.revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStorage;

    #[test]
    fn test_empty_store_yields_sample() {
        let storage = MemoryStorage::new();
        let doc = Document::load(&storage);
        assert_eq!(doc.content(), SAMPLE_MARKDOWN);
        assert!(doc.content().starts_with("# Welcome to Cerberus"));
    }

    #[test]
    fn test_stored_empty_string_wins_over_sample() {
        let mut storage = MemoryStorage::new();
        storage.save_text(CONTENT_KEY, "").unwrap();
        assert_eq!(Document::load(&storage).content(), "");
    }

    #[test]
    fn test_set_content_tracks_revision() {
        let mut doc = Document::new("a".to_string());
        assert!(!doc.set_content("a".to_string()));
        assert_eq!(doc.revision(), 0);
        assert!(doc.set_content("ab".to_string()));
        assert_eq!(doc.revision(), 1);
    }
}
