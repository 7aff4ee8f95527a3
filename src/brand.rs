//! Brand registry.
//!
//! Brands are the AI-assistant watermarks that can be shown as a badge in
//! the footer of an exported image. The `none` entry disables the badge.

/// Id of the entry that suppresses the footer badge.
pub const NONE_ID: &str = "none";

/// A selectable watermark identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brand {
    pub id: &'static str,
    pub name: &'static str,
    pub glyph: Option<&'static str>,
}

impl Brand {
    /// Whether this brand renders a footer badge.
    pub fn is_none(&self) -> bool {
        self.id == NONE_ID
    }
}

static BRANDS: [Brand; 6] = [
    Brand {
        id: NONE_ID,
        name: "无水印",
        glyph: None,
    },
    Brand {
        id: "gemini",
        name: "Gemini",
        glyph: Some("✦"),
    },
    Brand {
        id: "chatgpt",
        name: "ChatGPT",
        glyph: Some("◎"),
    },
    Brand {
        id: "claude",
        name: "Claude",
        glyph: Some("✳"),
    },
    Brand {
        id: "deepseek",
        name: "DeepSeek",
        glyph: Some("◈"),
    },
    Brand {
        id: "llama",
        name: "Llama",
        glyph: Some("∞"),
    },
];

/// All brands in display order; `none` is always first.
pub fn list() -> &'static [Brand] {
    &BRANDS
}

/// The `none` brand.
pub fn none() -> &'static Brand {
    &BRANDS[0]
}

/// Look up a brand by id (case-insensitive), falling back to `none`.
pub fn resolve(id: &str) -> &'static Brand {
    let wanted = id.trim();
    BRANDS
        .iter()
        .find(|brand| brand.id.eq_ignore_ascii_case(wanted))
        .unwrap_or_else(|| {
            if !wanted.is_empty() {
                tracing::warn!(brand = id, "unknown brand id, using none");
            }
            none()
        })
}

/// The brand after `id` in registry order, wrapping around.
pub fn next(id: &str) -> &'static Brand {
    let idx = position(id);
    &BRANDS[(idx + 1) % BRANDS.len()]
}

/// The brand before `id` in registry order, wrapping around.
pub fn previous(id: &str) -> &'static Brand {
    let idx = position(id);
    &BRANDS[(idx + BRANDS.len() - 1) % BRANDS.len()]
}

fn position(id: &str) -> usize {
    BRANDS
        .iter()
        .position(|brand| brand.id.eq_ignore_ascii_case(id.trim()))
        .unwrap_or(0)
}
