//! Core document types.

use crate::theme::{Palette, ThemeId};

use super::style::ElementStyle;

/// A rendered, fully styled share document.
///
/// This is the output of the markdown renderer: a header band (optional),
/// the content blocks, and a footer band. Every node carries the style
/// resolved from the active theme, so layout never consults the theme
/// registry again.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    theme: ThemeId,
    palette: Palette,
    header: Option<Header>,
    blocks: Vec<Block>,
    footer: Footer,
}

impl Document {
    pub(crate) const fn new(
        theme: ThemeId,
        palette: Palette,
        header: Option<Header>,
        blocks: Vec<Block>,
        footer: Footer,
    ) -> Self {
        Self {
            theme,
            palette,
            header,
            blocks,
            footer,
        }
    }

    pub const fn theme(&self) -> ThemeId {
        self.theme
    }

    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// The header band, present only when a title or author was given.
    pub const fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub const fn footer(&self) -> &Footer {
        &self.footer
    }

    /// True when the content area has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All headings in document order, including ones nested in quotes and lists.
    pub fn headings(&self) -> Vec<HeadingRef> {
        let mut out = Vec::new();
        collect_headings(&self.blocks, &mut out);
        out
    }

    /// Number of code blocks that received syntax highlighting.
    pub fn highlighted_code_blocks(&self) -> usize {
        fn count(blocks: &[Block]) -> usize {
            blocks
                .iter()
                .map(|block| match block {
                    Block::Code(code) => usize::from(code.highlighted),
                    Block::BlockQuote { blocks, .. } => count(blocks),
                    Block::List(list) => list.items.iter().map(|item| count(&item.blocks)).sum(),
                    _ => 0,
                })
                .sum()
        }
        count(&self.blocks)
    }
}

fn collect_headings(blocks: &[Block], out: &mut Vec<HeadingRef>) {
    for block in blocks {
        match block {
            Block::Heading { level, spans, .. } => out.push(HeadingRef {
                level: *level,
                text: spans_to_string(spans),
            }),
            Block::BlockQuote { blocks, .. } => collect_headings(blocks, out),
            Block::List(list) => {
                for item in &list.items {
                    collect_headings(&item.blocks, out);
                }
            }
            _ => {}
        }
    }
}

/// Title/author band at the top of the paper.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub title: Option<String>,
    /// Author as displayed, including the leading `@`.
    pub author: Option<String>,
    pub title_style: ElementStyle,
    pub author_style: ElementStyle,
    pub band_style: ElementStyle,
}

/// Brand badge and product watermark at the bottom of the paper.
#[derive(Debug, Clone, PartialEq)]
pub struct Footer {
    pub badge: Option<Badge>,
    pub watermark: &'static str,
    pub badge_style: ElementStyle,
    pub watermark_style: ElementStyle,
    pub band_style: ElementStyle,
}

/// The brand pill shown on the left of the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub brand_id: &'static str,
    pub glyph: Option<&'static str>,
    pub label: String,
}

/// A content block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
        style: ElementStyle,
    },
    Paragraph {
        spans: Vec<InlineSpan>,
        style: ElementStyle,
    },
    List(List),
    BlockQuote {
        blocks: Vec<Block>,
        style: ElementStyle,
    },
    Rule {
        style: ElementStyle,
    },
    Code(CodeBlock),
    Table(Table),
    /// Image placeholder; images are never fetched.
    Image {
        alt: String,
        src: String,
        style: ElementStyle,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    /// Start number for ordered lists, `None` for bullets.
    pub start: Option<usize>,
    pub items: Vec<ListItem>,
    pub style: ElementStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// `Some(checked)` for task list items.
    pub task: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub language: Option<String>,
    /// One span list per source line.
    pub lines: Vec<Vec<InlineSpan>>,
    /// True when a grammar matched the language tag.
    pub highlighted: bool,
    pub style: ElementStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

pub type TableCell = Vec<InlineSpan>;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub alignments: Vec<Alignment>,
    pub header: Vec<TableCell>,
    pub rows: Vec<Vec<TableCell>>,
    pub style: ElementStyle,
    pub header_style: ElementStyle,
    pub cell_style: ElementStyle,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
    pub fg: Option<InlineColor>,
    pub bg: Option<InlineColor>,
}

/// RGB color for inline styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text.into(), InlineStyle::default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Reference to a heading in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text (plain, no formatting)
    pub text: String,
}

pub fn spans_to_string(spans: &[InlineSpan]) -> String {
    let mut content = String::new();
    for span in spans {
        content.push_str(span.text());
    }
    content
}
