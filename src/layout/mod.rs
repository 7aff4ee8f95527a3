//! Layout of a styled document into a positioned scene.
//!
//! The scene mirrors the share card: an outer canvas with the theme
//! background, a centered paper surface, the optional header band, the
//! content blocks and the footer band. Layout is a pure function of the
//! document, the options and the text metrics.

mod metrics;
mod scene;
mod svg;

pub use metrics::{EstimateMetrics, FontBook, TextMetrics};
pub use scene::{Line, Rect, Scene, SceneItem, TextRun};
pub use svg::{escape, to_svg};

use crate::document::wrap::{wrap_chars, wrap_spans};
use crate::document::{
    Alignment, Block, CodeBlock, Document, ElementKind, ElementStyle, FontFamily, Footer, Header,
    InlineSpan, InlineStyle, List, Table, fade, style_for,
};
use crate::theme::{Rgba, Theme};

/// Natural canvas width in CSS pixels.
pub const DEFAULT_WIDTH: f32 = 1000.0;
/// Padding between the canvas edge and the paper.
pub const CANVAS_PADDING: f32 = 32.0;
/// Minimum canvas height; shorter papers are vertically centered.
pub const MIN_HEIGHT: f32 = 600.0;
/// Padding around the content blocks inside the paper.
pub const CONTENT_PADDING: f32 = 40.0;
const PAPER_RADIUS: f32 = 8.0;
const TAB_WIDTH: usize = 4;
const MIN_CONTENT_WIDTH: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub width: f32,
    pub padding: f32,
    pub min_height: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            padding: CANVAS_PADDING,
            min_height: MIN_HEIGHT,
        }
    }
}

impl LayoutOptions {
    #[must_use]
    pub fn with_width(mut self, width: f32) -> Self {
        let floor = (self.padding + CONTENT_PADDING) * 2.0 + MIN_CONTENT_WIDTH;
        self.width = width.max(floor);
        self
    }
}

/// Lay out `doc` into a scene.
pub fn layout(doc: &Document, options: &LayoutOptions, metrics: &impl TextMetrics) -> Scene {
    let _span = tracing::debug_span!("layout", theme = doc.theme().as_str(), width = options.width)
        .entered();

    let theme = doc.theme().theme();
    let paper_width = (options.width - options.padding * 2.0).max(0.0);
    let mut painter = Painter {
        theme,
        metrics,
        items: Vec::new(),
        y: 0.0,
    };

    if let Some(header) = doc.header() {
        painter.header(header, paper_width);
    }
    painter.content(doc.blocks(), paper_width);
    painter.footer(doc.footer(), paper_width);

    let paper_height = painter.y;
    let height = (paper_height + options.padding * 2.0).max(options.min_height);
    let paper_y = ((height - paper_height) / 2.0).max(options.padding.min(height));

    let mut items = Vec::with_capacity(painter.items.len() + 1);
    let mut paper = Rect::filled(0.0, 0.0, paper_width, paper_height, theme.paper.fill)
        .rounded(PAPER_RADIUS)
        .stroked(theme.paper.border, 1.0);
    paper.shadow = Some(theme.paper.shadow);
    items.push(SceneItem::Rect(paper));
    items.extend(painter.items);

    let mut scene = Scene {
        width: options.width,
        height,
        background: theme.background,
        sans_family: metrics.family_list(FontFamily::Sans),
        mono_family: metrics.family_list(FontFamily::Mono),
        items,
    };
    scene.translate(options.padding, paper_y);
    tracing::debug!(
        height = scene.height,
        items = scene.items.len(),
        "layout complete"
    );
    scene
}

/// Resolved paint attributes of one inline run.
#[derive(Debug, Clone, Copy)]
struct RunStyle {
    font: FontFamily,
    size: f32,
    weight: u16,
    italic: bool,
    underline: bool,
    strikethrough: bool,
    color: Rgba,
    fill: Option<Rgba>,
}

struct Painter<'a, M: TextMetrics> {
    theme: &'a Theme,
    metrics: &'a M,
    items: Vec<SceneItem>,
    /// Paper-local cursor.
    y: f32,
}

impl<M: TextMetrics> Painter<'_, M> {
    fn header(&mut self, header: &Header, width: f32) {
        let band = header.band_style;
        let title_style = header.title_style;
        let author_style = header.author_style;
        let line_height = title_style.line_height.max(author_style.line_height);
        let top = self.y;
        let inner = width - band.padding_x * 2.0;

        let author_width = header.author.as_deref().map_or(0.0, |author| {
            self.measure_plain(author, &author_style)
        });
        if let Some(author) = header.author.as_deref() {
            let x = width - band.padding_x - author_width;
            self.text_line(author, &author_style, x, top + band.padding_y, line_height);
        }
        if let Some(title) = header.title.as_deref() {
            let room = (inner - author_width - 16.0).max(inner / 2.0);
            let title = self.truncate(title, &title_style, room);
            self.text_line(&title, &title_style, band.padding_x, top + band.padding_y, line_height);
        }

        self.y = top + line_height + band.padding_y * 2.0;
        if let Some(border) = band.border {
            self.hline(0.0, width, self.y, border, band.border_width);
        }
    }

    fn footer(&mut self, footer: &Footer, width: f32) {
        let band = footer.band_style;
        let top = self.y;
        if let Some(border) = band.border {
            self.hline(0.0, width, top, border, band.border_width);
        }

        let badge_style = footer.badge_style;
        let pill_height = badge_style.line_height + badge_style.padding_y * 2.0;
        let row_height = pill_height.max(footer.watermark_style.line_height);
        let row_top = top + band.padding_y;

        if let Some(badge) = &footer.badge {
            let label = match badge.glyph {
                Some(glyph) => format!("{glyph} {}", badge.label),
                None => badge.label.clone(),
            };
            let label = apply_case(&label, &badge_style);
            let text_width = self.measure_plain(&label, &badge_style);
            let pill_top = row_top + (row_height - pill_height) / 2.0;
            if let Some(fill) = badge_style.fill {
                self.items.push(SceneItem::Rect(
                    Rect::filled(
                        band.padding_x,
                        pill_top,
                        text_width + badge_style.padding_x * 2.0,
                        pill_height,
                        fill,
                    )
                    .rounded(badge_style.radius),
                ));
            }
            self.text_line(
                &label,
                &badge_style,
                band.padding_x + badge_style.padding_x,
                pill_top + badge_style.padding_y,
                badge_style.line_height,
            );
        }

        let watermark_style = footer.watermark_style;
        let watermark = apply_case(footer.watermark, &watermark_style);
        let watermark_width = self.measure_plain(&watermark, &watermark_style);
        self.text_line(
            &watermark,
            &watermark_style,
            width - band.padding_x - watermark_width,
            row_top + (row_height - watermark_style.line_height) / 2.0,
            watermark_style.line_height,
        );

        self.y = top + row_height + band.padding_y * 2.0;
    }

    fn content(&mut self, blocks: &[Block], width: f32) {
        self.y += CONTENT_PADDING;
        let inner = (width - CONTENT_PADDING * 2.0).max(1.0);
        self.blocks(blocks, CONTENT_PADDING, inner, None);
        self.y += CONTENT_PADDING;
    }

    /// Lay out a block sequence with collapsed margins. The first block's
    /// top margin and the last block's bottom margin are dropped.
    fn blocks(&mut self, blocks: &[Block], x: f32, width: f32, text: Option<&ElementStyle>) {
        let mut previous_bottom: Option<f32> = None;
        for block in blocks {
            let style = block_style(block);
            if let Some(bottom) = previous_bottom {
                let top = text.map_or(style.margin_top, |_| 0.0);
                self.y += bottom.max(top);
            }
            self.block(block, x, width, text);
            previous_bottom = Some(match (text, block) {
                // Paragraphs inside lists and quotes sit close together.
                (Some(inherited), Block::Paragraph { .. }) => inherited.padding_y * 2.0,
                _ => style.margin_bottom,
            });
        }
    }

    fn block(&mut self, block: &Block, x: f32, width: f32, text: Option<&ElementStyle>) {
        match block {
            Block::Heading { spans, style, .. } => {
                self.paragraph(spans, style, x, width);
            }
            Block::Paragraph { spans, style } => {
                let style = text.map_or(*style, |inherited| inherit(style, inherited));
                self.paragraph(spans, &style, x, width);
            }
            Block::Image { alt, src, style } => {
                let label = format!("[Image: {}]", if alt.is_empty() { src } else { alt });
                self.paragraph(&[InlineSpan::plain(label)], style, x, width);
            }
            Block::List(list) => self.list(list, x, width),
            Block::BlockQuote { blocks, style } => self.quote(blocks, style, x, width),
            Block::Rule { style } => {
                let color = style.border.unwrap_or(self.theme.accent);
                self.hline(x, x + width, self.y + 0.5, color, style.border_width.max(1.0));
                self.y += style.border_width.max(1.0);
            }
            Block::Code(code) => self.code(code, x, width),
            Block::Table(table) => self.table(table, x, width),
        }
    }

    fn paragraph(&mut self, spans: &[InlineSpan], style: &ElementStyle, x: f32, width: f32) {
        let spans: Vec<InlineSpan> = if style.uppercase {
            spans
                .iter()
                .map(|span| InlineSpan::new(span.text().to_uppercase(), span.style()))
                .collect()
        } else {
            spans.to_vec()
        };
        let measure = |text: &str, inline: InlineStyle| {
            let run = self.run_style(inline, style);
            self.metrics.advance(text, run.font, run.size, run.weight)
        };
        let lines = wrap_spans(&spans, width, &measure);
        for line in &lines {
            self.spans_line(line, style, x, self.y, style.line_height);
            self.y += style.line_height;
        }
    }

    fn list(&mut self, list: &List, x: f32, width: f32) {
        let style = list.style;
        let markers: Vec<String> = list
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| match (item.task, list.start) {
                (Some(true), _) => "☑".to_string(),
                (Some(false), _) => "☐".to_string(),
                (None, Some(start)) => format!("{}.", start + index),
                (None, None) => "•".to_string(),
            })
            .collect();
        let widest = markers
            .iter()
            .map(|marker| self.measure_plain(marker, &style))
            .fold(0.0f32, f32::max);
        let indent = style.indent.max(widest + 6.0);
        let marker_style = ElementStyle {
            color: style.color,
            ..style
        };

        for (index, (item, marker)) in list.items.iter().zip(&markers).enumerate() {
            if index > 0 {
                self.y += style.padding_y;
            }
            let marker_width = self.measure_plain(marker, &marker_style);
            self.text_line(
                marker,
                &marker_style,
                x + indent - 6.0 - marker_width,
                self.y,
                style.line_height,
            );
            let before = self.y;
            self.blocks(&item.blocks, x + indent, (width - indent).max(1.0), Some(&style));
            if (self.y - before).abs() < f32::EPSILON {
                self.y += style.line_height;
            }
        }
    }

    fn quote(&mut self, blocks: &[Block], style: &ElementStyle, x: f32, width: f32) {
        let insert_at = self.items.len();
        let top = self.y;
        self.y += style.padding_y;
        let bar = style.border_width;
        let inner_x = x + bar + style.padding_x;
        let inner_width = (width - bar - style.padding_x * 2.0).max(1.0);
        self.blocks(blocks, inner_x, inner_width, Some(style));
        self.y += style.padding_y;
        let height = self.y - top;

        let mut backdrop = Vec::new();
        if let Some(fill) = style.fill {
            backdrop.push(SceneItem::Rect(
                Rect::filled(x, top, width, height, fill).rounded(style.radius),
            ));
        }
        if let Some(border) = style.border {
            backdrop.push(SceneItem::Rect(Rect::filled(x, top, bar, height, border)));
        }
        self.items.splice(insert_at..insert_at, backdrop);
    }

    fn code(&mut self, code: &CodeBlock, x: f32, width: f32) {
        let style = code.style;
        let top = self.y;
        let inner_width = (width - style.padding_x * 2.0).max(1.0);
        let metrics = self.metrics;
        let measure = |text: &str, _inline: InlineStyle| {
            metrics.advance(text, FontFamily::Mono, style.font_size, style.weight)
        };

        let mut rows: Vec<Vec<InlineSpan>> = Vec::new();
        for line in &code.lines {
            let expanded: Vec<InlineSpan> = line
                .iter()
                .map(|span| {
                    InlineSpan::new(span.text().replace('\t', &" ".repeat(TAB_WIDTH)), span.style())
                })
                .collect();
            rows.extend(wrap_chars(&expanded, inner_width, &measure));
        }
        if rows.is_empty() {
            rows.push(Vec::new());
        }

        let height = rows.len() as f32 * style.line_height + style.padding_y * 2.0;
        let mut rect = Rect::filled(x, top, width, height, style.fill.unwrap_or(Rgba::WHITE))
            .rounded(style.radius);
        if let Some(border) = style.border {
            rect = rect.stroked(border, style.border_width);
        }
        self.items.push(SceneItem::Rect(rect));

        let mut line_top = top + style.padding_y;
        for row in &rows {
            let mut cursor = x + style.padding_x;
            for span in row {
                let color = span.style().fg.map_or(style.color, |fg| Rgba {
                    r: fg.r,
                    g: fg.g,
                    b: fg.b,
                    alpha: 1.0,
                });
                let advance = measure(span.text(), span.style());
                if !span.text().trim().is_empty() {
                    self.items.push(SceneItem::Text(TextRun {
                        x: cursor,
                        baseline: baseline(line_top, style.line_height, style.font_size),
                        text: span.text().to_string(),
                        font: FontFamily::Mono,
                        size: style.font_size,
                        weight: if span.style().strong { 700 } else { style.weight },
                        italic: span.style().emphasis,
                        underline: false,
                        strikethrough: false,
                        color,
                    }));
                }
                cursor += advance;
            }
            line_top += style.line_height;
        }
        self.y = top + height;
    }

    fn table(&mut self, table: &Table, x: f32, width: f32) {
        let columns = table.column_count();
        if columns == 0 {
            return;
        }
        let header_style = table.header_style;
        let cell_style = table.cell_style;

        let header: Vec<Vec<InlineSpan>> = table
            .header
            .iter()
            .map(|cell| {
                cell.iter()
                    .map(|span| InlineSpan::new(span.text().to_uppercase(), span.style()))
                    .collect()
            })
            .collect();

        let mut natural = vec![0.0f32; columns];
        let rows = std::iter::once((&header, &header_style))
            .chain(table.rows.iter().map(|row| (row, &cell_style)));
        for (row, style) in rows.clone() {
            for (index, cell) in row.iter().enumerate() {
                let w = self.measure_spans(cell, style) + style.padding_x * 2.0;
                natural[index] = natural[index].max(w);
            }
        }
        let widths = distribute(&natural, width);

        let top = self.y;
        let insert_at = self.items.len();
        let mut row_top = top;
        let mut separators = Vec::new();
        let mut header_height = None;

        for (row_index, (row, style)) in rows.enumerate() {
            let mut cell_lines = Vec::with_capacity(columns);
            for (column, cell_width) in widths.iter().enumerate() {
                let inner = (cell_width - style.padding_x * 2.0).max(1.0);
                let spans = row.get(column).map_or(&[][..], Vec::as_slice);
                let measure = |text: &str, inline: InlineStyle| {
                    let run = self.run_style(inline, style);
                    self.metrics.advance(text, run.font, run.size, run.weight)
                };
                cell_lines.push(wrap_spans(spans, inner, &measure));
            }
            let line_count = cell_lines.iter().map(Vec::len).max().unwrap_or(0).max(1);
            let row_height = line_count as f32 * style.line_height + style.padding_y * 2.0;

            let mut cell_x = x;
            for (column, lines) in cell_lines.iter().enumerate() {
                let align = table
                    .alignments
                    .get(column)
                    .copied()
                    .unwrap_or(Alignment::None);
                let inner = widths[column] - style.padding_x * 2.0;
                let mut line_top = row_top + style.padding_y;
                for line in lines {
                    let used = self.measure_spans(line, style);
                    let offset = match align {
                        Alignment::Center => ((inner - used) / 2.0).max(0.0),
                        Alignment::Right => (inner - used).max(0.0),
                        Alignment::Left | Alignment::None => 0.0,
                    };
                    self.spans_line(
                        line,
                        style,
                        cell_x + style.padding_x + offset,
                        line_top,
                        style.line_height,
                    );
                    line_top += style.line_height;
                }
                cell_x += widths[column];
            }

            if row_index == 0 {
                header_height = Some(row_height);
            } else {
                separators.push(row_top);
            }
            row_top += row_height;
        }

        let height = row_top - top;
        let mut backdrop = Vec::new();
        if let (Some(fill), Some(h)) = (header_style.fill, header_height) {
            backdrop.push(SceneItem::Rect(Rect::filled(x, top, width, h, fill)));
        }
        self.items.splice(insert_at..insert_at, backdrop);

        let rule = cell_style.border.unwrap_or(self.theme.accent);
        for y in separators {
            self.hline(x, x + width, y, rule, cell_style.border_width.max(1.0));
        }
        let mut frame = Rect {
            fill: None,
            ..Rect::filled(x, top, width, height, Rgba::WHITE)
        }
        .rounded(table.style.radius);
        if let Some(border) = table.style.border {
            frame = frame.stroked(border, table.style.border_width);
        }
        self.items.push(SceneItem::Rect(frame));
        self.y = top + height;
    }

    /// Paint a pre-wrapped line of spans with its top at `top`.
    fn spans_line(&mut self, line: &[InlineSpan], style: &ElementStyle, x: f32, top: f32, line_height: f32) {
        let mut cursor = x;
        for span in line {
            let run = self.run_style(span.style(), style);
            let advance = self.metrics.advance(span.text(), run.font, run.size, run.weight);
            if let Some(fill) = run.fill {
                let pad = 2.0;
                let box_height = run.size * 1.4;
                self.items.push(SceneItem::Rect(
                    Rect::filled(
                        cursor - pad,
                        top + (line_height - box_height) / 2.0,
                        advance + pad * 2.0,
                        box_height,
                        fill,
                    )
                    .rounded(4.0),
                ));
            }
            if !span.text().trim().is_empty() {
                self.items.push(SceneItem::Text(TextRun {
                    x: cursor,
                    baseline: baseline(top, line_height, style.font_size),
                    text: span.text().to_string(),
                    font: run.font,
                    size: run.size,
                    weight: run.weight,
                    italic: run.italic,
                    underline: run.underline,
                    strikethrough: run.strikethrough,
                    color: run.color,
                }));
            }
            cursor += advance;
        }
    }

    fn text_line(&mut self, text: &str, style: &ElementStyle, x: f32, top: f32, line_height: f32) {
        self.spans_line(&[InlineSpan::plain(text)], style, x, top, line_height);
    }

    fn run_style(&self, inline: InlineStyle, base: &ElementStyle) -> RunStyle {
        let mut run = RunStyle {
            font: base.font,
            size: base.font_size,
            weight: base.weight,
            italic: base.italic || inline.emphasis,
            underline: base.underline,
            strikethrough: inline.strikethrough,
            color: base.color,
            fill: None,
        };
        if inline.strong {
            run.weight = run.weight.max(700);
        }
        if inline.code && base.font == FontFamily::Sans {
            let code = style_for(self.theme, ElementKind::InlineCode);
            run.font = FontFamily::Mono;
            run.size = base.font_size * 0.85;
            run.weight = run.weight.max(code.weight);
            run.fill = code.fill;
        }
        if inline.link {
            let link = style_for(self.theme, ElementKind::Link);
            run.underline = true;
            run.color = fade(base.color, link.color.alpha);
        }
        if let Some(fg) = inline.fg {
            run.color = Rgba {
                r: fg.r,
                g: fg.g,
                b: fg.b,
                alpha: base.color.alpha,
            };
        }
        run
    }

    fn measure_spans(&self, spans: &[InlineSpan], style: &ElementStyle) -> f32 {
        spans
            .iter()
            .map(|span| {
                let run = self.run_style(span.style(), style);
                self.metrics.advance(span.text(), run.font, run.size, run.weight)
            })
            .sum()
    }

    fn measure_plain(&self, text: &str, style: &ElementStyle) -> f32 {
        self.metrics
            .advance(text, style.font, style.font_size, style.weight)
    }

    fn truncate(&self, text: &str, style: &ElementStyle, max_width: f32) -> String {
        if self.measure_plain(text, style) <= max_width {
            return text.to_string();
        }
        let ellipsis = "…";
        let budget = max_width - self.measure_plain(ellipsis, style);
        let mut out = String::new();
        for ch in text.chars() {
            out.push(ch);
            if self.measure_plain(&out, style) > budget {
                out.pop();
                break;
            }
        }
        out.push_str(ellipsis);
        out
    }

    fn hline(&mut self, x1: f32, x2: f32, y: f32, color: Rgba, width: f32) {
        self.items.push(SceneItem::Line(Line {
            x1,
            y1: y,
            x2,
            y2: y,
            color,
            width,
        }));
    }
}

fn block_style(block: &Block) -> ElementStyle {
    match block {
        Block::Heading { style, .. }
        | Block::Paragraph { style, .. }
        | Block::BlockQuote { style, .. }
        | Block::Rule { style }
        | Block::Image { style, .. } => *style,
        Block::List(list) => list.style,
        Block::Code(code) => code.style,
        Block::Table(table) => table.style,
    }
}

/// Text inside a list or quote takes the container's font and color.
fn inherit(own: &ElementStyle, container: &ElementStyle) -> ElementStyle {
    ElementStyle {
        color: container.color,
        font_size: container.font_size,
        line_height: container.line_height,
        italic: container.italic || own.italic,
        ..*own
    }
}

fn apply_case(text: &str, style: &ElementStyle) -> String {
    if style.uppercase {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

fn baseline(top: f32, line_height: f32, font_size: f32) -> f32 {
    top + (line_height - font_size) / 2.0 + font_size * 0.8
}

/// Share `total` among columns. Extra room grows columns in proportion to
/// their natural width; when space is short, narrow columns keep their
/// natural width and the rest split what remains.
fn distribute(natural: &[f32], total: f32) -> Vec<f32> {
    let sum: f32 = natural.iter().sum();
    if natural.is_empty() {
        return Vec::new();
    }
    if sum <= 0.0 {
        return vec![total / natural.len() as f32; natural.len()];
    }
    if sum <= total {
        return natural.iter().map(|w| w / sum * total).collect();
    }

    let fair = total / natural.len() as f32;
    let narrow: f32 = natural.iter().filter(|w| **w <= fair).sum();
    let wide: f32 = natural.iter().filter(|w| **w > fair).sum();
    let remaining = (total - narrow).max(0.0);
    natural
        .iter()
        .map(|w| if *w <= fair { *w } else { w / wide * remaining })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand;
    use crate::document::{RenderDescriptor, render};
    use crate::theme::{self, ThemeId};
    use proptest::prelude::*;

    fn scene_for(source: &str) -> Scene {
        let doc = render(&RenderDescriptor::new(source, theme::default_theme()));
        layout(&doc, &LayoutOptions::default(), &EstimateMetrics)
    }

    #[test]
    fn test_short_document_uses_minimum_height() {
        let scene = scene_for("# Hi");
        assert!((scene.width - DEFAULT_WIDTH).abs() < f32::EPSILON);
        assert!((scene.height - MIN_HEIGHT).abs() < f32::EPSILON);
    }

    #[test]
    fn test_paper_is_first_and_centered() {
        let scene = scene_for("# Hi");
        let SceneItem::Rect(paper) = &scene.items[0] else {
            panic!("paper first");
        };
        assert!((paper.x - CANVAS_PADDING).abs() < f32::EPSILON);
        let below = scene.height - (paper.y + paper.height);
        assert!((paper.y - below).abs() < 0.01);
        assert!(paper.shadow.is_some());
    }

    #[test]
    fn test_long_document_grows_canvas() {
        let source = "paragraph\n\n".repeat(60);
        let scene = scene_for(&source);
        assert!(scene.height > MIN_HEIGHT);
    }

    #[test]
    fn test_text_stays_inside_paper() {
        let source = "word ".repeat(400);
        let scene = scene_for(&source);
        let right = DEFAULT_WIDTH - CANVAS_PADDING - CONTENT_PADDING;
        for run in scene.texts().filter(|run| run.text.contains("word")) {
            let width = EstimateMetrics.advance(&run.text, run.font, run.size, run.weight);
            assert!(run.x + width <= right + 0.5, "{} overflows", run.text);
        }
    }

    #[test]
    fn test_watermark_and_badge_are_painted() {
        let doc = render(
            &RenderDescriptor::new("x", theme::default_theme()).with_brand(brand::resolve("claude")),
        );
        let scene = layout(&doc, &LayoutOptions::default(), &EstimateMetrics);
        let text = scene.plain_text();
        assert!(text.contains("CLAUDE"));
        assert!(text.contains("由 AI分享助手 生成"));
    }

    #[test]
    fn test_header_texts_are_painted() {
        let doc = render(
            &RenderDescriptor::new("x", theme::default_theme())
                .with_title("代码片段")
                .with_author("ada"),
        );
        let scene = layout(&doc, &LayoutOptions::default(), &EstimateMetrics);
        let text = scene.plain_text();
        assert!(text.contains("代码片段"));
        assert!(text.contains("@ada"));
    }

    #[test]
    fn test_code_block_draws_background_and_mono_text() {
        let scene = scene_for("```rust\nfn main() {}\n```");
        assert!(scene.texts().any(|run| run.font == FontFamily::Mono));
        let code_bg = style_for(theme::default_theme(), ElementKind::CodeBlock).fill;
        assert!(scene.items.iter().any(|item| matches!(
            item,
            SceneItem::Rect(rect) if rect.fill == code_bg
        )));
    }

    #[test]
    fn test_table_header_is_uppercased() {
        let scene = scene_for("| name | v |\n|---|---|\n| a | 1 |");
        let text = scene.plain_text();
        assert!(text.contains("NAME"));
        assert!(text.contains('a'));
    }

    #[test]
    fn test_gradient_theme_background_passes_through() {
        let doc = render(&RenderDescriptor::new("x", ThemeId::Sunset.theme()));
        let scene = layout(&doc, &LayoutOptions::default(), &EstimateMetrics);
        assert_eq!(scene.background, ThemeId::Sunset.theme().background);
    }

    #[test]
    fn test_width_option_has_a_floor() {
        let options = LayoutOptions::default().with_width(10.0);
        assert!(options.width >= MIN_CONTENT_WIDTH);
    }

    #[test]
    fn test_distribute_fills_available_width() {
        let widths = distribute(&[10.0, 30.0], 80.0);
        assert!((widths.iter().sum::<f32>() - 80.0).abs() < 1e-3);
        assert!((widths[1] - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_distribute_keeps_narrow_columns_when_short() {
        let widths = distribute(&[10.0, 200.0, 200.0], 150.0);
        assert!((widths[0] - 10.0).abs() < 1e-3);
        assert!((widths.iter().sum::<f32>() - 150.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_layout_is_deterministic(source in "[#*>`| a-z0-9\\n-]{0,160}") {
            let doc = render(&RenderDescriptor::new(&source, theme::default_theme()));
            let a = layout(&doc, &LayoutOptions::default(), &EstimateMetrics);
            let b = layout(&doc, &LayoutOptions::default(), &EstimateMetrics);
            prop_assert_eq!(a, b);
        }
    }
}
