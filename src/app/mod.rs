//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Clipboard reads and exports are side effects: they run after `update`
//! and report back as messages.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{DEFAULT_TITLE, Focus, Model, Pane, ToastLevel, WELCOME, WIDE_BREAKPOINT};
pub use update::{EXPORT_FAILED, Message, update};

use std::path::PathBuf;
use std::sync::Arc;

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::export::Exporter;
use crate::theme::ThemeId;

/// Main application struct that owns the session settings and runs the
/// event loop.
pub struct App {
    source: String,
    theme: ThemeId,
    brand: String,
    title: String,
    author: String,
    out_dir: PathBuf,
    exporter: Arc<Exporter>,
    clipboard: Box<dyn Clipboard>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application that starts with `source` in the editor.
    pub fn new(source: impl Into<String>, exporter: Arc<Exporter>) -> Self {
        Self {
            source: source.into(),
            theme: ThemeId::Light,
            brand: crate::brand::NONE_ID.to_string(),
            title: DEFAULT_TITLE.to_string(),
            author: String::new(),
            out_dir: PathBuf::from("."),
            exporter,
            clipboard: Box::new(SystemClipboard),
            config_global_path: None,
            config_local_path: None,
        }
    }

    #[must_use]
    pub const fn with_theme(mut self, theme: ThemeId) -> Self {
        self.theme = theme;
        self
    }

    /// Select the starting brand; unknown ids fall back to `none`.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Directory exported images are written to.
    #[must_use]
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    /// Replace the system clipboard, e.g. for headless runs.
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
