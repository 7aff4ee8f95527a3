//! Theme registry.
//!
//! A theme is a static bundle of colors for the exported image: the outer
//! canvas background, the "paper" surface the document sits on, the text
//! color, and an accent used for borders and rules.

use std::fmt;
use std::str::FromStr;

/// RGB color with a separate opacity, as used by SVG `fill`/`fill-opacity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Rgba {
    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
            alpha: 1.0,
        }
    }

    #[must_use]
    pub const fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// `#rrggbb` without the alpha channel.
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub const BLACK: Self = Self::hex(0x00_00_00);
    pub const WHITE: Self = Self::hex(0xff_ff_ff);
}

/// Direction of a two-stop linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    ToRight,
    ToBottomRight,
}

/// Fill of the outer canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Rgba),
    Gradient {
        from: Rgba,
        to: Rgba,
        direction: GradientDirection,
    },
}

/// Drop shadow under the paper surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset_y: f32,
    pub blur: f32,
    pub color: Rgba,
}

/// The card the document is printed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paper {
    pub fill: Rgba,
    pub border: Rgba,
    pub shadow: Shadow,
}

/// Syntax palette family. Dark themes get a dark code palette, everything
/// else gets a light one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    Light,
    Dark,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeId {
    Light,
    Dark,
    Midnight,
    Nature,
    Sunset,
}

impl ThemeId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Midnight => "midnight",
            Self::Nature => "nature",
            Self::Sunset => "sunset",
        }
    }

    pub fn theme(self) -> &'static Theme {
        THEMES
            .iter()
            .find(|theme| theme.id == self)
            .unwrap_or(&THEMES[0])
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        THEMES
            .iter()
            .map(|theme| theme.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

/// A named color scheme for the exported image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub id: ThemeId,
    pub name: &'static str,
    pub background: Background,
    pub paper: Paper,
    pub text: Rgba,
    pub accent: Rgba,
}

impl Theme {
    pub const fn palette(&self) -> Palette {
        match self.id {
            ThemeId::Dark | ThemeId::Midnight => Palette::Dark,
            ThemeId::Light | ThemeId::Nature | ThemeId::Sunset => Palette::Light,
        }
    }

    /// Translucent overlay used behind inline code, table headers, quotes
    /// and the brand pill.
    pub const fn tint(&self) -> Rgba {
        match self.palette() {
            Palette::Light => Rgba::BLACK.with_alpha(0.05),
            Palette::Dark => Rgba::WHITE.with_alpha(0.10),
        }
    }
}

const SHADOW_SM: Shadow = Shadow {
    offset_y: 1.0,
    blur: 2.0,
    color: Rgba::BLACK.with_alpha(0.05),
};
const SHADOW_LG: Shadow = Shadow {
    offset_y: 10.0,
    blur: 15.0,
    color: Rgba::BLACK.with_alpha(0.10),
};
const SHADOW_XL: Shadow = Shadow {
    offset_y: 20.0,
    blur: 25.0,
    color: Rgba::BLACK.with_alpha(0.10),
};
const SHADOW_2XL: Shadow = Shadow {
    offset_y: 25.0,
    blur: 50.0,
    color: Rgba::BLACK.with_alpha(0.25),
};

static THEMES: [Theme; 5] = [
    Theme {
        id: ThemeId::Light,
        name: "Minimal Light",
        background: Background::Solid(Rgba::hex(0xf1_f5_f9)),
        paper: Paper {
            fill: Rgba::WHITE,
            border: Rgba::hex(0xe2_e8_f0),
            shadow: SHADOW_SM,
        },
        text: Rgba::hex(0x1e_29_3b),
        accent: Rgba::hex(0xe2_e8_f0),
    },
    Theme {
        id: ThemeId::Dark,
        name: "Developer Dark",
        background: Background::Solid(Rgba::hex(0x0f_17_2a)),
        paper: Paper {
            fill: Rgba::hex(0x1e_29_3b),
            border: Rgba::hex(0x33_41_55),
            shadow: SHADOW_XL,
        },
        text: Rgba::hex(0xf1_f5_f9),
        accent: Rgba::hex(0x47_55_69),
    },
    Theme {
        id: ThemeId::Midnight,
        name: "Midnight Blue",
        background: Background::Gradient {
            from: Rgba::hex(0x31_2e_81),
            to: Rgba::hex(0x0f_17_2a),
            direction: GradientDirection::ToBottomRight,
        },
        paper: Paper {
            fill: Rgba::hex(0x1e_1b_4b).with_alpha(0.80),
            border: Rgba::hex(0x63_66_f1).with_alpha(0.30),
            shadow: SHADOW_2XL,
        },
        text: Rgba::hex(0xee_f2_ff),
        accent: Rgba::hex(0x63_66_f1).with_alpha(0.50),
    },
    Theme {
        id: ThemeId::Nature,
        name: "Sage Garden",
        background: Background::Solid(Rgba::hex(0xe7_e5_e4)),
        paper: Paper {
            fill: Rgba::hex(0xfd_fb_f7),
            border: Rgba::hex(0xe7_e5_e4),
            shadow: SHADOW_LG,
        },
        text: Rgba::hex(0x29_25_24),
        accent: Rgba::hex(0xd6_d3_d1),
    },
    Theme {
        id: ThemeId::Sunset,
        name: "Sunset Gradient",
        background: Background::Gradient {
            from: Rgba::hex(0xff_ed_d5),
            to: Rgba::hex(0xff_e4_e6),
            direction: GradientDirection::ToRight,
        },
        paper: Paper {
            fill: Rgba::WHITE.with_alpha(0.90),
            border: Rgba::hex(0xff_e4_e6),
            shadow: SHADOW_XL,
        },
        text: Rgba::hex(0x1e_29_3b),
        accent: Rgba::hex(0xfe_cd_d3),
    },
];

/// All themes in display order. The first entry is the default.
pub fn all() -> &'static [Theme] {
    &THEMES
}

/// The default theme (first registry entry).
pub fn default_theme() -> &'static Theme {
    &THEMES[0]
}

/// Look up a theme by id, falling back to the default for unknown ids.
pub fn resolve(id: &str) -> &'static Theme {
    id.parse::<ThemeId>().map_or_else(
        |_| {
            tracing::warn!(theme = id, "unknown theme id, using default");
            default_theme()
        },
        ThemeId::theme,
    )
}

/// The theme after `id` in registry order, wrapping around.
pub fn next(id: ThemeId) -> ThemeId {
    let idx = THEMES.iter().position(|t| t.id == id).unwrap_or(0);
    THEMES[(idx + 1) % THEMES.len()].id
}

/// The theme before `id` in registry order, wrapping around.
pub fn previous(id: ThemeId) -> ThemeId {
    let idx = THEMES.iter().position(|t| t.id == id).unwrap_or(0);
    THEMES[(idx + THEMES.len() - 1) % THEMES.len()].id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lists_five_themes_light_first() {
        let ids: Vec<_> = all().iter().map(|t| t.id).collect();
        assert_eq!(
            ids,
            vec![
                ThemeId::Light,
                ThemeId::Dark,
                ThemeId::Midnight,
                ThemeId::Nature,
                ThemeId::Sunset
            ]
        );
        assert_eq!(default_theme().name, "Minimal Light");
    }

    #[test]
    fn test_resolve_known_id_is_case_insensitive() {
        assert_eq!(resolve("midnight").name, "Midnight Blue");
        assert_eq!(resolve("NATURE").name, "Sage Garden");
    }

    #[test]
    fn test_resolve_unknown_id_falls_back_to_first_entry() {
        assert_eq!(resolve("neon").id, ThemeId::Light);
        assert_eq!(resolve("").id, ThemeId::Light);
    }

    #[test]
    fn test_only_dark_and_midnight_use_dark_palette() {
        for theme in all() {
            let expected = matches!(theme.id, ThemeId::Dark | ThemeId::Midnight);
            assert_eq!(theme.palette() == Palette::Dark, expected, "{}", theme.name);
        }
    }

    #[test]
    fn test_next_and_previous_wrap_around() {
        assert_eq!(next(ThemeId::Sunset), ThemeId::Light);
        assert_eq!(previous(ThemeId::Light), ThemeId::Sunset);
        assert_eq!(next(ThemeId::Light), ThemeId::Dark);
    }

    #[test]
    fn test_hex_string_drops_alpha() {
        let color = Rgba::hex(0x63_66_f1).with_alpha(0.3);
        assert_eq!(color.to_hex_string(), "#6366f1");
    }
}
