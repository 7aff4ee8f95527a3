//! Text measurement.
//!
//! Real advances come from the system fonts (fontdb + ttf-parser). When no
//! usable face exists, a deterministic estimate based on Unicode display
//! width is used instead, so layout never fails.

use std::sync::Arc;

use resvg::usvg::fontdb::{self, Database, Family, Query, Weight};
use unicode_width::UnicodeWidthChar;

use crate::document::FontFamily;

const SANS_CANDIDATES: &[&str] = &[
    "Inter",
    "Helvetica Neue",
    "Helvetica",
    "Arial",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Noto Sans CJK SC",
    "PingFang SC",
    "Microsoft YaHei",
];

const MONO_CANDIDATES: &[&str] = &[
    "SF Mono",
    "Menlo",
    "Consolas",
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "Courier New",
];

/// Width of a run of text in CSS pixels.
pub trait TextMetrics {
    fn advance(&self, text: &str, font: FontFamily, size: f32, weight: u16) -> f32;

    /// The `font-family` list written into the SVG for `font`.
    fn family_list(&self, font: FontFamily) -> String {
        match font {
            FontFamily::Sans => "sans-serif".to_string(),
            FontFamily::Mono => "monospace".to_string(),
        }
    }
}

/// Estimated advances; depends on nothing but the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateMetrics;

impl TextMetrics for EstimateMetrics {
    fn advance(&self, text: &str, font: FontFamily, size: f32, weight: u16) -> f32 {
        text.chars().map(|ch| estimate_char(ch, font, size, weight)).sum()
    }
}

fn estimate_char(ch: char, font: FontFamily, size: f32, weight: u16) -> f32 {
    let columns = ch.width().unwrap_or(0) as f32;
    if columns >= 2.0 {
        return size;
    }
    let em = match font {
        FontFamily::Mono => 0.6,
        FontFamily::Sans if ch == ' ' => 0.28,
        FontFamily::Sans => 0.55,
    };
    let bold = if weight >= 600 { 1.06 } else { 1.0 };
    columns * em * size * bold
}

#[derive(Debug, Clone)]
struct Face {
    id: fontdb::ID,
    family: String,
}

/// Fonts shared by layout (measurement) and export (rasterization).
#[derive(Debug, Clone)]
pub struct FontBook {
    db: Arc<Database>,
    sans: Option<Face>,
    sans_bold: Option<Face>,
    mono: Option<Face>,
}

impl FontBook {
    /// Load the system fonts.
    pub fn system() -> Self {
        let _span = tracing::debug_span!("layout.fonts.load_system").entered();
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self::from_database(db)
    }

    /// A font book with no faces. Measurement falls back to estimates and
    /// rasterized text is omitted; useful for deterministic tests.
    pub fn empty() -> Self {
        Self::from_database(Database::new())
    }

    pub fn from_database(mut db: Database) -> Self {
        let sans = resolve_face(&db, SANS_CANDIDATES, Family::SansSerif, Weight::NORMAL);
        let mono = resolve_face(&db, MONO_CANDIDATES, Family::Monospace, Weight::NORMAL);
        // Generic families in the SVG must land on the faces we measured.
        if let Some(face) = &sans {
            db.set_sans_serif_family(face.family.clone());
        }
        if let Some(face) = &mono {
            db.set_monospace_family(face.family.clone());
        }
        let sans_bold = sans.as_ref().and_then(|face| {
            db.query(&Query {
                families: &[Family::Name(&face.family)],
                weight: Weight::BOLD,
                ..Query::default()
            })
            .map(|id| Face {
                id,
                family: face.family.clone(),
            })
        });
        if sans.is_none() {
            tracing::warn!("no sans-serif font found, text measurement uses estimates");
        }
        Self {
            db: Arc::new(db),
            sans,
            sans_bold,
            mono,
        }
    }

    pub fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    /// Whether any face was resolved for measurement.
    pub const fn has_faces(&self) -> bool {
        self.sans.is_some()
    }

    fn face(&self, font: FontFamily, weight: u16) -> Option<&Face> {
        match font {
            FontFamily::Mono => self.mono.as_ref().or(self.sans.as_ref()),
            FontFamily::Sans if weight >= 600 => self.sans_bold.as_ref().or(self.sans.as_ref()),
            FontFamily::Sans => self.sans.as_ref(),
        }
    }
}

impl TextMetrics for FontBook {
    fn advance(&self, text: &str, font: FontFamily, size: f32, weight: u16) -> f32 {
        let Some(face) = self.face(font, weight) else {
            return EstimateMetrics.advance(text, font, size, weight);
        };
        self.db
            .with_face_data(face.id, |data, index| {
                let parsed = ttf_parser::Face::parse(data, index).ok()?;
                let scale = size / f32::from(parsed.units_per_em());
                Some(
                    text.chars()
                        .map(|ch| {
                            parsed
                                .glyph_index(ch)
                                .and_then(|glyph| parsed.glyph_hor_advance(glyph))
                                .map_or_else(
                                    || estimate_char(ch, font, size, weight),
                                    |adv| f32::from(adv) * scale,
                                )
                        })
                        .sum(),
                )
            })
            .flatten()
            .unwrap_or_else(|| EstimateMetrics.advance(text, font, size, weight))
    }

    fn family_list(&self, font: FontFamily) -> String {
        let generic = match font {
            FontFamily::Sans => "sans-serif",
            FontFamily::Mono => "monospace",
        };
        let face = match font {
            FontFamily::Sans => self.sans.as_ref(),
            FontFamily::Mono => self.mono.as_ref(),
        };
        face.map_or_else(
            || generic.to_string(),
            |face| format!("'{}', {generic}", face.family.replace('\'', "")),
        )
    }
}

fn resolve_face(db: &Database, candidates: &[&str], generic: Family<'_>, weight: Weight) -> Option<Face> {
    let query = |families: &[Family<'_>]| {
        db.query(&Query {
            families,
            weight,
            ..Query::default()
        })
    };
    let id = candidates
        .iter()
        .find_map(|name| query(&[Family::Name(name)]))
        .or_else(|| query(&[generic]))
        .or_else(|| db.faces().next().map(|face| face.id))?;
    let family = db.face(id)?.families.first()?.0.clone();
    Some(Face { id, family })
}
