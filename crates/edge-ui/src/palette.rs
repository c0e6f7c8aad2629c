//! Fixed colour palette for tags and badges.

use serde::Serialize;

/// A background/text colour pair, expressed as utility class names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColourTag {
    /// Colour family (e.g., "green").
    pub name: &'static str,
    /// Background class.
    pub background: &'static str,
    /// Text class.
    pub text: &'static str,
}

impl ColourTag {
    const fn new(name: &'static str, background: &'static str, text: &'static str) -> Self {
        Self {
            name,
            background,
            text,
        }
    }

    /// Both classes joined, ready for a `class` attribute.
    pub fn classes(&self) -> String {
        format!("{} {}", self.background, self.text)
    }
}

const PALETTE: [ColourTag; 6] = [
    ColourTag::new("green", "bg-green-50", "text-green-700"),
    ColourTag::new("red", "bg-red-50", "text-red-700"),
    ColourTag::new("yellow", "bg-yellow-50", "text-yellow-700"),
    ColourTag::new("blue", "bg-blue-50", "text-blue-700"),
    ColourTag::new("orange", "bg-orange-50", "text-orange-700"),
    ColourTag::new("rose", "bg-rose-50", "text-rose-700"),
];

/// The palette, always the same six entries in the same order.
pub fn colour_palette() -> &'static [ColourTag; 6] {
    &PALETTE
}

/// Pick a palette entry for an index, wrapping around.
pub fn colour_for(index: usize) -> &'static ColourTag {
    &PALETTE[index % PALETTE.len()]
}
