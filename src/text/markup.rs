use std::collections::HashMap;

use crate::color::PackedColor;

/// Reasons a markup tag can fail to resolve.
///
/// Unresolved tags are rendered as literal text by the layout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("`{{}}` with an empty color stack")]
    EmptyStack,
    #[error("malformed hex color `#{0}`")]
    MalformedHex(String),
    #[error("unknown color name `{0}`")]
    UnknownColor(String),
}

/// Named colors available to `{name}` tags.
///
/// Names are matched case-insensitively. When CSS fallback is enabled, names
/// missing from the table are looked up in the CSS named colors provided by
/// `palette`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTable {
    colors: HashMap<String, PackedColor, fxhash::FxBuildHasher>,
    css_fallback: bool,
}

impl Default for ColorTable {
    /// The classic palette: `CLEAR`, `BLACK`, `WHITE`, `RED`, `SKY`, `FOREST`, ...
    fn default() -> Self {
        let mut table = Self::empty();
        for (name, rgba) in DEFAULT_COLORS {
            table.insert(name, PackedColor(rgba));
        }
        table
    }
}

const DEFAULT_COLORS: [(&str, u32); 34] = [
    ("CLEAR", 0x0000_0000),
    ("BLACK", 0x0000_00FF),
    ("WHITE", 0xFFFF_FFFF),
    ("LIGHT_GRAY", 0xBFBF_BFFF),
    ("GRAY", 0x7F7F_7FFF),
    ("DARK_GRAY", 0x3F3F_3FFF),
    ("BLUE", 0x0000_FFFF),
    ("NAVY", 0x0000_80FF),
    ("ROYAL", 0x4169_E1FF),
    ("SLATE", 0x7080_90FF),
    ("SKY", 0x87CE_EBFF),
    ("CYAN", 0x00FF_FFFF),
    ("TEAL", 0x0080_80FF),
    ("GREEN", 0x00FF_00FF),
    ("CHARTREUSE", 0x7FFF_00FF),
    ("LIME", 0x32CD_32FF),
    ("FOREST", 0x228B_22FF),
    ("OLIVE", 0x6B8E_23FF),
    ("YELLOW", 0xFFFF_00FF),
    ("GOLD", 0xFFD7_00FF),
    ("GOLDENROD", 0xDAA5_20FF),
    ("ORANGE", 0xFFA5_00FF),
    ("BROWN", 0x8B45_13FF),
    ("TAN", 0xD2B4_8CFF),
    ("FIREBRICK", 0xB222_22FF),
    ("RED", 0xFF00_00FF),
    ("SCARLET", 0xFF34_1CFF),
    ("CORAL", 0xFF7F_50FF),
    ("SALMON", 0xFA80_72FF),
    ("PINK", 0xFF69_B4FF),
    ("MAGENTA", 0xFF00_FFFF),
    ("PURPLE", 0xA020_F0FF),
    ("VIOLET", 0xEE82_EEFF),
    ("MAROON", 0xB030_60FF),
];

impl ColorTable {
    /// A table without any names.
    pub fn empty() -> Self {
        Self {
            colors: HashMap::default(),
            css_fallback: false,
        }
    }

    /// Enables or disables the CSS named color fallback.
    pub fn with_css_fallback(mut self, enabled: bool) -> Self {
        self.css_fallback = enabled;
        self
    }

    /// Adds or replaces a named color, returning the previous value.
    pub fn insert(&mut self, name: &str, color: PackedColor) -> Option<PackedColor> {
        self.colors.insert(name.to_uppercase(), color)
    }

    pub fn remove(&mut self, name: &str) -> Option<PackedColor> {
        self.colors.remove(&name.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Looks up a color by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<PackedColor> {
        if let Some(&color) = self.colors.get(&name.to_uppercase()) {
            return Some(color);
        }
        if !self.css_fallback {
            return None;
        }
        palette::named::from_str(&name.to_lowercase())
            .map(|rgb| PackedColor::from_rgba8(rgb.red, rgb.green, rgb.blue, u8::MAX))
    }
}

fn hex_value(c: char) -> Option<u8> {
    c.to_digit(16).map(|v| v as u8)
}

/// Parses the digits of a `#` color tag (without the `#`).
///
/// Accepts `RGB`, `RGBA`, `RRGGBB` and `RRGGBBAA`. Without an alpha component
/// `default_alpha` is used.
pub fn parse_hex_color(digits: &[char], default_alpha: u8) -> Option<PackedColor> {
    let values = digits
        .iter()
        .map(|&c| hex_value(c))
        .collect::<Option<Vec<u8>>>()?;

    let [r, g, b, a] = match values.as_slice() {
        &[r, g, b] => [r * 17, g * 17, b * 17, default_alpha],
        &[r, g, b, a] => [r * 17, g * 17, b * 17, a * 17],
        &[r1, r2, g1, g2, b1, b2] => [r1 << 4 | r2, g1 << 4 | g2, b1 << 4 | b2, default_alpha],
        &[r1, r2, g1, g2, b1, b2, a1, a2] => {
            [r1 << 4 | r2, g1 << 4 | g2, b1 << 4 | b2, a1 << 4 | a2]
        }
        _ => return None,
    };
    Some(PackedColor::from_rgba8(r, g, b, a))
}

/// Resolves color tags against a [`ColorTable`] and tracks nested scopes.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkupResolver {
    colors: ColorTable,
    stack: Vec<PackedColor>,
}

impl MarkupResolver {
    pub fn new(colors: ColorTable) -> Self {
        Self {
            colors,
            stack: Vec::with_capacity(4),
        }
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut ColorTable {
        &mut self.colors
    }

    /// Number of open color scopes.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Color of the innermost scope, or `base` outside of any tag.
    pub fn current(&self, base: PackedColor) -> PackedColor {
        self.stack.last().copied().unwrap_or(base)
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Applies the content of a tag (the text between the braces).
    ///
    /// On error the stack is left untouched.
    pub fn apply(&mut self, content: &[char], base_alpha: u8) -> Result<(), MarkupError> {
        match content {
            [] => self.stack.pop().map(|_| ()).ok_or(MarkupError::EmptyStack),
            ['~'] => {
                self.stack.clear();
                Ok(())
            }
            ['#', digits @ ..] => {
                let color = parse_hex_color(digits, base_alpha)
                    .ok_or_else(|| MarkupError::MalformedHex(digits.iter().collect()))?;
                self.stack.push(color);
                Ok(())
            }
            name => {
                let name: String = name.iter().collect();
                let color = self
                    .colors
                    .get(&name)
                    .ok_or(MarkupError::UnknownColor(name))?;
                // opaque named colors inherit the alpha of the text
                let color = if color.is_opaque() {
                    color.with_alpha(base_alpha)
                } else {
                    color
                };
                self.stack.push(color);
                Ok(())
            }
        }
    }
}
