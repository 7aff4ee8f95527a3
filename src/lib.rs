// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. export::ExportJob)
    clippy::module_name_repetitions
)]

//! # ai-share
//!
//! Turn Markdown snippets and AI chat transcripts into themed, shareable
//! PNG images.
//!
//! ai-share pairs a terminal editor with a live preview:
//! - Five themes with gradient canvases and paper cards
//! - Optional title, author and brand watermark band
//! - Syntax-highlighted code blocks, tables, task lists and quotes
//! - One keystroke exports a 3x PNG in the background
//!
//! ## Architecture
//!
//! ai-share uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! Export runs off the UI thread: the document is laid out into a
//! [`layout::Scene`], serialized to SVG, rasterized by resvg and written
//! atomically by an [`export::ImageSink`].
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Markdown parsing into styled blocks
//! - [`layout`]: Pixel layout and SVG scene building
//! - [`export`]: Rasterization, PNG encoding and file output
//! - [`ui`]: Terminal UI components
//! - [`editor`]: Text buffers for the source and header fields
//! - [`theme`] / [`brand`]: Appearance registries
//! - [`highlight`]: Syntax highlighting
//! - [`clipboard`]: Paste-replace support
//! - [`reformat`]: Optional AI tidy-up before export
//! - [`config`]: Saved defaults

pub mod app;
pub mod brand;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod editor;
pub mod export;
pub mod highlight;
pub mod layout;
pub mod reformat;
pub mod theme;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Document, RenderDescriptor};
    pub use crate::export::Exporter;
    pub use crate::theme::ThemeId;
    pub use crate::ui::viewport::Viewport;
}
