use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Hex colors handed out to participants when no palette is configured.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#e06c75", "#61afef", "#98c379", "#e5c07b", "#c678dd", "#56b6c2", "#d19a66", "#be5046",
];

/// Ordered, non-empty list of presentation colors.
///
/// A participant's color slot is an unbounded integer; the color shown is
/// `colors[slot % len]`, so two participants may share a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette from colors. Returns `None` for an empty list.
    pub fn new(colors: Vec<Color>) -> Option<Self> {
        if colors.is_empty() {
            return None;
        }
        Some(Self { colors })
    }

    /// Parse a list of `#rrggbb` strings. Any invalid entry rejects the list.
    pub fn from_hex_list<S: AsRef<str>>(hex: &[S]) -> Option<Self> {
        let colors = hex
            .iter()
            .map(|h| Color::from_hex(h.as_ref()))
            .collect::<Option<Vec<_>>>()?;
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index into the palette used for `slot`.
    pub fn index_for(&self, slot: u32) -> usize {
        slot as usize % self.colors.len()
    }

    pub fn color_for(&self, slot: u32) -> Color {
        self.colors[self.index_for(slot)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        let colors = DEFAULT_PALETTE
            .iter()
            .filter_map(|h| Color::from_hex(h))
            .collect();
        Self { colors }
    }
}
