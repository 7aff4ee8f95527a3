//! Read-only clipboard access for paste-replace.

/// Why clipboard text could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("无法访问剪贴板：{0}")]
    Unavailable(String),
    #[error("剪贴板为空，请先复制内容。")]
    Empty,
}

/// A source of clipboard text.
pub trait Clipboard {
    /// Read the current clipboard text.
    ///
    /// # Errors
    /// [`ClipboardError::Unavailable`] when the clipboard cannot be opened,
    /// [`ClipboardError::Empty`] when it holds no text or only blank text.
    fn read_text(&self) -> Result<String, ClipboardError>;
}

/// The desktop clipboard via arboard. Opened per read, since a handle held
/// for the whole session can go stale on some platforms.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn read_text(&self) -> Result<String, ClipboardError> {
        let _span = tracing::debug_span!("clipboard.read").entered();
        let text = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.get_text())
            .map_err(read_error)?;
        non_blank(text)
    }
}

fn read_error(err: arboard::Error) -> ClipboardError {
    match err {
        arboard::Error::ContentNotAvailable => ClipboardError::Empty,
        other => {
            tracing::warn!(error = %other, "clipboard unavailable");
            ClipboardError::Unavailable(other.to_string())
        }
    }
}

/// Fixed clipboard contents, for tests and headless runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticClipboard(pub Result<String, ClipboardError>);

impl Clipboard for StaticClipboard {
    fn read_text(&self) -> Result<String, ClipboardError> {
        non_blank(self.0.clone()?)
    }
}

fn non_blank(text: String) -> Result<String, ClipboardError> {
    if text.trim().is_empty() {
        Err(ClipboardError::Empty)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_only_is_empty() {
        let clipboard = StaticClipboard(Ok(" \n\t ".to_string()));
        assert_eq!(clipboard.read_text(), Err(ClipboardError::Empty));
    }

    #[test]
    fn test_text_is_returned_untrimmed() {
        let clipboard = StaticClipboard(Ok("  # Title\n".to_string()));
        assert_eq!(clipboard.read_text().unwrap(), "  # Title\n");
    }

    #[test]
    fn test_unavailable_passes_through() {
        let clipboard = StaticClipboard(Err(ClipboardError::Unavailable("denied".into())));
        assert!(matches!(
            clipboard.read_text(),
            Err(ClipboardError::Unavailable(reason)) if reason == "denied"
        ));
    }

    #[test]
    fn test_read_errors_map_to_empty_or_unavailable() {
        assert_eq!(read_error(arboard::Error::ContentNotAvailable), ClipboardError::Empty);
        assert!(matches!(
            read_error(arboard::Error::ClipboardNotSupported),
            ClipboardError::Unavailable(_)
        ));
    }

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(ClipboardError::Empty.to_string(), "剪贴板为空，请先复制内容。");
    }
}
