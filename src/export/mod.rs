//! Export engine: rasterize a rendered document into a PNG.
//!
//! The document is laid out into a [`Scene`], serialized to SVG, rendered
//! with resvg at [`PIXEL_RATIO`] and encoded losslessly. Only the document
//! is ever rasterized; none of the terminal UI ends up in the image.

mod sink;
mod worker;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::document::Document;
use crate::layout::{self, FontBook, LayoutOptions, Scene};

pub use sink::{DirectorySink, FileNamer, ImageSink, MemorySink, file_name};
pub use worker::{ExportJob, ExportOutcome};

/// Supersampling factor applied to the natural scene size.
pub const PIXEL_RATIO: f32 = 3.0;

/// Quiescence wait before rasterizing.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(200);

/// Largest output image, in device pixels. The pixmap and the RGBA copy
/// made for encoding each take four bytes per pixel.
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export: the canvas is empty")]
    EmptyCanvas,
    #[error("failed to build image from scene: {0}")]
    Svg(#[from] usvg::Error),
    #[error("cannot allocate a {width}x{height} image")]
    Pixmap { width: u32, height: u32 },
    #[error("a {width}x{height} image exceeds the export size limit; shorten the content")]
    TooLarge { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Encoded image bytes plus their pixel size. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Turns documents into PNG files.
///
/// Holds no per-export state besides the file namer, so one exporter can be
/// shared behind an `Arc` between the UI thread and export workers.
#[derive(Debug)]
pub struct Exporter {
    fonts: Arc<FontBook>,
    settle: Duration,
    options: LayoutOptions,
    namer: FileNamer,
}

impl Exporter {
    pub fn new(fonts: Arc<FontBook>) -> Self {
        Self {
            fonts,
            settle: DEFAULT_SETTLE,
            options: LayoutOptions::default(),
            namer: FileNamer::new(),
        }
    }

    #[must_use]
    pub const fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    #[must_use]
    pub const fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn settle(&self) -> Duration {
        self.settle
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Lay out `doc` with the same fonts used for rasterization.
    pub fn scene(&self, doc: &Document) -> Scene {
        layout::layout(doc, &self.options, self.fonts.as_ref())
    }

    /// Rasterize and encode `doc`, without saving.
    ///
    /// # Errors
    /// Fails if the scene is empty, cannot be rasterized, or cannot be
    /// encoded.
    pub fn render(&self, doc: &Document) -> Result<ExportArtifact, ExportError> {
        let _span = tracing::debug_span!("export.render", theme = %doc.theme()).entered();
        let scene = self.scene(doc);
        let pixmap = rasterize(&scene, &self.fonts)?;
        let bytes = encode_png(&pixmap)?;
        tracing::debug!(
            width = pixmap.width(),
            height = pixmap.height(),
            bytes = bytes.len(),
            "encoded export"
        );
        Ok(ExportArtifact {
            file_name: self.namer.next_name(),
            bytes,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }

    /// Wait for the settle delay, render `doc` and hand it to `sink`.
    ///
    /// Exactly one save happens on success and none on failure.
    ///
    /// # Errors
    /// Any render error, or the sink's save error.
    pub fn export(
        &self,
        doc: &Document,
        sink: &mut dyn ImageSink,
    ) -> Result<(PathBuf, ExportArtifact), ExportError> {
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
        let artifact = self.render(doc)?;
        let path = sink.save(&artifact.file_name, &artifact.bytes)?;
        tracing::info!(path = %path.display(), width = artifact.width, height = artifact.height, "exported image");
        Ok((path, artifact))
    }
}

/// Output size in device pixels for a scene dimension.
pub fn scaled(natural: f32) -> u32 {
    let px = (natural * PIXEL_RATIO).ceil();
    if px <= 0.0 {
        0
    } else if px >= u32::MAX as f32 {
        u32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let px = px as u32;
        px
    }
}

/// Render `scene` into a pixmap at [`PIXEL_RATIO`].
///
/// # Errors
/// [`ExportError::EmptyCanvas`] for zero-sized scenes,
/// [`ExportError::TooLarge`] above [`MAX_PIXELS`], [`ExportError::Svg`]
/// if the generated SVG is rejected, [`ExportError::Pixmap`] if the buffer
/// cannot be allocated.
pub fn rasterize(scene: &Scene, fonts: &FontBook) -> Result<Pixmap, ExportError> {
    if scene.is_empty() {
        return Err(ExportError::EmptyCanvas);
    }
    let width = scaled(scene.width);
    let height = scaled(scene.height);
    if u64::from(width) * u64::from(height) > MAX_PIXELS {
        tracing::warn!(width, height, "export canvas too large");
        return Err(ExportError::TooLarge { width, height });
    }

    let svg = layout::to_svg(scene);
    let options = usvg::Options {
        fontdb: fonts.database(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&svg, &options)?;

    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Pixmap { width, height })?;
    resvg::render(
        &tree,
        Transform::from_scale(PIXEL_RATIO, PIXEL_RATIO),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

/// Encode a premultiplied pixmap as straight-alpha RGBA PNG.
///
/// # Errors
/// Returns [`ExportError::Encode`] if the encoder fails.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let mut rgba = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    let mut bytes = Vec::new();
    PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive)
        .write_image(&rgba, pixmap.width(), pixmap.height(), ExtendedColorType::Rgba8)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand;
    use crate::document::{self, RenderDescriptor};
    use crate::theme::{Background, Rgba, ThemeId};

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn doc(source: &str) -> Document {
        let theme = ThemeId::Light.theme();
        document::render(&RenderDescriptor::new(source, theme).with_brand(brand::resolve("claude")))
    }

    fn exporter() -> Exporter {
        Exporter::new(Arc::new(FontBook::empty())).with_settle(Duration::ZERO)
    }

    #[test]
    fn test_scaled_applies_pixel_ratio_and_ceils() {
        assert_eq!(scaled(100.0), 300);
        assert_eq!(scaled(100.2), 301);
        assert_eq!(scaled(0.0), 0);
        assert_eq!(scaled(-5.0), 0);
    }

    #[test]
    fn test_render_produces_png_at_three_x() {
        let exporter = exporter();
        let doc = doc("# Hi\n\n**bold**");
        let scene = exporter.scene(&doc);
        let artifact = exporter.render(&doc).unwrap();
        assert!(artifact.bytes.starts_with(PNG_MAGIC));
        assert_eq!(artifact.width, scaled(scene.width));
        assert_eq!(artifact.height, scaled(scene.height));
        assert!(artifact.file_name.starts_with("ai-share-"));
    }

    #[test]
    fn test_empty_scene_is_rejected() {
        let scene = Scene {
            width: 0.0,
            height: 10.0,
            background: Background::Solid(Rgba::WHITE),
            sans_family: "sans-serif".to_string(),
            mono_family: "monospace".to_string(),
            items: Vec::new(),
        };
        let err = rasterize(&scene, &FontBook::empty()).unwrap_err();
        assert!(matches!(err, ExportError::EmptyCanvas));
    }

    #[test]
    fn test_oversized_scene_is_rejected_before_allocating() {
        let scene = Scene {
            width: 1000.0,
            height: 120_000.0,
            background: Background::Solid(Rgba::WHITE),
            sans_family: "sans-serif".to_string(),
            mono_family: "monospace".to_string(),
            items: Vec::new(),
        };
        let err = rasterize(&scene, &FontBook::empty()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::TooLarge {
                width: 3000,
                height: 360_000
            }
        ));
    }

    #[test]
    fn test_long_document_export_fails_without_saving() {
        let source = (0..3000).map(|i| format!("paragraph {i}\n\n")).collect::<String>();
        let mut sink = MemorySink::default();
        let err = exporter().export(&doc(&source), &mut sink).unwrap_err();
        assert!(matches!(err, ExportError::TooLarge { .. }));
        assert!(sink.saved.is_empty());
    }

    #[test]
    fn test_background_pixel_matches_theme() {
        let scene = Scene {
            width: 4.0,
            height: 4.0,
            background: Background::Solid(Rgba::hex(0x10_20_30)),
            sans_family: "sans-serif".to_string(),
            mono_family: "monospace".to_string(),
            items: Vec::new(),
        };
        let pixmap = rasterize(&scene, &FontBook::empty()).unwrap();
        assert_eq!(pixmap.width(), 12);
        let pixel = pixmap.pixels()[0].demultiply();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()), (0x10, 0x20, 0x30, 0xff));
    }

    #[test]
    fn test_export_saves_exactly_once() {
        let exporter = exporter();
        let mut sink = MemorySink::default();
        let (path, artifact) = exporter.export(&doc("hello"), &mut sink).unwrap();
        assert_eq!(sink.saved.len(), 1);
        assert_eq!(path, PathBuf::from(&artifact.file_name));
        assert_eq!(sink.saved[0].1, artifact.bytes);
    }

    #[test]
    fn test_failed_save_reports_error() {
        let exporter = exporter();
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("does-not-exist"));
        let err = exporter.export(&doc("hello"), &mut sink).unwrap_err();
        assert!(matches!(err, ExportError::Save { .. }));
        assert!(!dir.path().join("does-not-exist").exists());
    }

    #[test]
    fn test_repeated_exports_get_unique_names() {
        let exporter = exporter();
        let mut sink = MemorySink::default();
        let doc = doc("same");
        exporter.export(&doc, &mut sink).unwrap();
        exporter.export(&doc, &mut sink).unwrap();
        assert_ne!(sink.saved[0].0, sink.saved[1].0);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ExportError::Pixmap { width: 1, height: 2 }.to_string(),
            "cannot allocate a 1x2 image"
        );
        assert!(ExportError::EmptyCanvas.to_string().contains("empty"));
    }
}
