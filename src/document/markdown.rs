//! Markdown rendering with comrak.
//!
//! Walks the comrak AST once and maps every node kind to a styled block or
//! inline span. Rendering is a pure function of the [`RenderDescriptor`].

use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};

use crate::brand::Brand;
use crate::highlight;
use crate::theme::Theme;

use super::style::{ElementKind, style_for};
use super::types::{
    Alignment, Badge, Block, CodeBlock, Document, Footer, Header, InlineSpan, InlineStyle, List,
    ListItem, Table, TableCell,
};

/// Product watermark shown on the right of every footer.
pub const WATERMARK: &str = "由 AI分享助手 生成";

/// Text of the span emitted for a hard line break. Wrapping always ends
/// the line there.
pub const HARD_BREAK: &str = "\n";

/// Inputs for one render pass. Derived from controller state, never stored.
#[derive(Debug, Clone, Copy)]
pub struct RenderDescriptor<'a> {
    pub source: &'a str,
    pub theme: &'a Theme,
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub brand: &'a Brand,
}

impl<'a> RenderDescriptor<'a> {
    pub fn new(source: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            theme,
            title: None,
            author: None,
            brand: crate::brand::none(),
        }
    }

    #[must_use]
    pub const fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub const fn with_author(mut self, author: &'a str) -> Self {
        self.author = Some(author);
        self
    }

    #[must_use]
    pub const fn with_brand(mut self, brand: &'a Brand) -> Self {
        self.brand = brand;
        self
    }
}

impl Document {
    /// Render markdown into a styled document.
    ///
    /// # Example
    ///
    /// ```
    /// use ai_share::document::{Document, RenderDescriptor};
    /// use ai_share::theme;
    ///
    /// let doc = Document::render(&RenderDescriptor::new("# Hello", theme::default_theme()));
    /// assert_eq!(doc.headings()[0].text, "Hello");
    /// assert!(doc.header().is_none());
    /// ```
    pub fn render(descriptor: &RenderDescriptor<'_>) -> Self {
        render(descriptor)
    }
}

/// Render markdown into a styled document.
pub fn render(descriptor: &RenderDescriptor<'_>) -> Document {
    let _span = tracing::debug_span!(
        "document.render",
        theme = descriptor.theme.id.as_str(),
        brand = descriptor.brand.id,
        bytes = descriptor.source.len()
    )
    .entered();

    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, descriptor.source, &options);

    let renderer = Renderer {
        theme: descriptor.theme,
    };
    let blocks = renderer.children(root);

    Document::new(
        descriptor.theme.id,
        descriptor.theme.palette(),
        header(descriptor),
        blocks,
        footer(descriptor),
    )
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.shortcodes = true;

    options
}

fn header(descriptor: &RenderDescriptor<'_>) -> Option<Header> {
    // Presence follows the raw fields; blank text still opens the band.
    let present = |field: Option<&str>| field.is_some_and(|text| !text.is_empty());
    if !present(descriptor.title) && !present(descriptor.author) {
        return None;
    }

    let title = descriptor
        .title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(ToString::to_string);
    let author = descriptor
        .author
        .map(|author| author.trim().trim_start_matches('@').trim())
        .filter(|author| !author.is_empty())
        .map(|author| format!("@{author}"));

    let theme = descriptor.theme;
    Some(Header {
        title,
        author,
        title_style: style_for(theme, ElementKind::HeaderTitle),
        author_style: style_for(theme, ElementKind::HeaderAuthor),
        band_style: style_for(theme, ElementKind::HeaderBand),
    })
}

fn footer(descriptor: &RenderDescriptor<'_>) -> Footer {
    let brand = descriptor.brand;
    let badge = (!brand.is_none()).then(|| Badge {
        brand_id: brand.id,
        glyph: brand.glyph,
        label: brand.name.to_string(),
    });

    let theme = descriptor.theme;
    Footer {
        badge,
        watermark: WATERMARK,
        badge_style: style_for(theme, ElementKind::BrandBadge),
        watermark_style: style_for(theme, ElementKind::Watermark),
        band_style: style_for(theme, ElementKind::FooterBand),
    }
}

struct Renderer<'t> {
    theme: &'t Theme,
}

impl Renderer<'_> {
    fn children<'a>(&self, node: &'a AstNode<'a>) -> Vec<Block> {
        let mut blocks = Vec::new();
        for child in node.children() {
            self.block(child, &mut blocks);
        }
        blocks
    }

    fn block<'a>(&self, node: &'a AstNode<'a>, out: &mut Vec<Block>) {
        let theme = self.theme;
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                let level = heading.level.clamp(1, 6);
                out.push(Block::Heading {
                    level,
                    spans: collect_inline_spans(node),
                    style: style_for(theme, ElementKind::Heading(level)),
                });
            }

            NodeValue::Paragraph => {
                if let Some(images) = standalone_images(node) {
                    for (alt, src) in images {
                        out.push(Block::Image {
                            alt,
                            src,
                            style: style_for(theme, ElementKind::Image),
                        });
                    }
                    return;
                }
                let spans = collect_inline_spans(node);
                if spans.iter().all(|span| span.text().trim().is_empty()) {
                    return;
                }
                out.push(Block::Paragraph {
                    spans,
                    style: style_for(theme, ElementKind::Paragraph),
                });
            }

            NodeValue::CodeBlock(code_block) => {
                let language = code_block
                    .info
                    .split_whitespace()
                    .next()
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string);
                let palette = theme.palette();
                let highlighted = language
                    .as_deref()
                    .is_some_and(highlight::supports_language);
                let lines = highlight::highlight_code(
                    language.as_deref().filter(|_| highlighted),
                    &code_block.literal,
                    palette,
                );
                out.push(Block::Code(CodeBlock {
                    language,
                    lines,
                    highlighted,
                    style: style_for(theme, ElementKind::CodeBlock),
                }));
            }

            NodeValue::List(list) => {
                let start = match list.list_type {
                    ListType::Bullet => None,
                    ListType::Ordered => Some(list.start),
                };
                let items = node
                    .children()
                    .filter_map(|child| {
                        let task = match &child.data.borrow().value {
                            NodeValue::Item(_) => None,
                            NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
                            _ => return None,
                        };
                        Some(ListItem {
                            task,
                            blocks: self.children(child),
                        })
                    })
                    .collect();
                out.push(Block::List(List {
                    start,
                    items,
                    style: style_for(theme, ElementKind::List),
                }));
            }

            NodeValue::BlockQuote => {
                out.push(Block::BlockQuote {
                    blocks: self.children(node),
                    style: style_for(theme, ElementKind::BlockQuote),
                });
            }

            NodeValue::ThematicBreak => {
                out.push(Block::Rule {
                    style: style_for(theme, ElementKind::Rule),
                });
            }

            NodeValue::Table(table) => {
                let alignments = table.alignments.iter().map(|a| alignment(*a)).collect();
                out.push(Block::Table(self.table(node, alignments)));
            }

            NodeValue::FootnoteDefinition(def) => {
                let mut spans = vec![InlineSpan::new(
                    format!("[^{}]: ", def.name),
                    InlineStyle::default(),
                )];
                spans.extend(collect_inline_spans(node));
                out.push(Block::Paragraph {
                    spans,
                    style: style_for(theme, ElementKind::Paragraph),
                });
            }

            // Raw HTML never reaches the image.
            NodeValue::HtmlBlock(_) => {}

            _ => {
                for child in node.children() {
                    self.block(child, out);
                }
            }
        }
    }

    fn table<'a>(&self, node: &'a AstNode<'a>, alignments: Vec<Alignment>) -> Table {
        let mut header: Vec<TableCell> = Vec::new();
        let mut rows: Vec<Vec<TableCell>> = Vec::new();

        for row_node in node.children() {
            let is_header = match row_node.data.borrow().value {
                NodeValue::TableRow(is_header) => is_header,
                _ => continue,
            };
            let cells: Vec<TableCell> = row_node
                .children()
                .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
                .map(collect_inline_spans)
                .collect();
            if is_header {
                header = cells;
            } else {
                rows.push(cells);
            }
        }

        Table {
            alignments,
            header,
            rows,
            style: style_for(self.theme, ElementKind::Table),
            header_style: style_for(self.theme, ElementKind::TableHeader),
            cell_style: style_for(self.theme, ElementKind::TableCell),
        }
    }
}

const fn alignment(value: TableAlignment) -> Alignment {
    match value {
        TableAlignment::None => Alignment::None,
        TableAlignment::Left => Alignment::Left,
        TableAlignment::Center => Alignment::Center,
        TableAlignment::Right => Alignment::Right,
    }
}

/// Images of a paragraph that holds nothing but images and whitespace.
fn standalone_images<'a>(node: &'a AstNode<'a>) -> Option<Vec<(String, String)>> {
    let mut images = Vec::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Image(image) => images.push((extract_text(child), image.url.clone())),
            NodeValue::Text(text) if text.trim().is_empty() => {}
            NodeValue::SoftBreak | NodeValue::LineBreak => {}
            _ => return None,
        }
    }
    (!images.is_empty()).then_some(images)
}

fn image_placeholder(alt: &str, src: &str) -> String {
    format!("[Image: {}]", if alt.is_empty() { src } else { alt })
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(c) => text.push_str(&c.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_spans_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) | NodeValue::TaskItem(_) => {}
        NodeValue::Text(t) => {
            spans.push(InlineSpan::new(t.clone(), style));
        }
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                emphasis: false,
                strong: false,
                strikethrough: false,
                ..style
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::Emph => {
            let next = InlineStyle {
                emphasis: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strong => {
            let next = InlineStyle {
                strong: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strikethrough => {
            let next = InlineStyle {
                strikethrough: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Link(_) => {
            let next = InlineStyle { link: true, ..style };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Image(image) => {
            let next = InlineStyle {
                emphasis: true,
                ..style
            };
            let alt = extract_text(node);
            spans.push(InlineSpan::new(image_placeholder(&alt, &image.url), next));
        }
        NodeValue::ShortCode(short) => {
            spans.push(InlineSpan::new(short.emoji.clone(), style));
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
        }
        NodeValue::SoftBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
        }
        NodeValue::LineBreak => {
            spans.push(InlineSpan::new(HARD_BREAK.to_string(), style));
        }
        NodeValue::HtmlInline(_) | NodeValue::HtmlBlock(_) => {}
        _ => {
            for child in node.children() {
                collect_inline_spans_recursive(child, style, spans);
            }
        }
    }
}
