//! Markdown document rendering.
//!
//! This module handles:
//! - Parsing markdown with comrak
//! - Mapping every node kind to a theme-styled block or inline span
//! - Line wrapping shared by the image layout and the terminal preview

mod markdown;
mod style;
mod types;
pub mod wrap;

pub use markdown::{HARD_BREAK, RenderDescriptor, WATERMARK, render};
pub use style::{ElementKind, ElementStyle, FontFamily, fade, style_for};
pub use types::{
    Alignment, Badge, Block, CodeBlock, Document, Footer, Header, HeadingRef, InlineColor,
    InlineSpan, InlineStyle, List, ListItem, Table, TableCell, spans_to_string,
};

/// Prepare file content for rendering based on its extension.
///
/// If the file has a recognized code extension, wrap content in a fenced code
/// block so it renders as a highlighted snippet. Markdown and unrecognized
/// files pass through unchanged. The fence is longer than any backtick run in
/// the content.
pub fn prepare_content(file_path: &std::path::Path, content: String) -> String {
    let Some(language) = crate::highlight::language_for_file(file_path) else {
        return content;
    };
    let longest_run = content
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            trimmed.len() - trimmed.trim_start_matches('`').len()
        })
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    let body = content.strip_suffix('\n').unwrap_or(&content);
    format!("{fence}{language}\n{body}\n{fence}\n")
}
