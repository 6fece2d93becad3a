//! Bitmap fonts consumed by the layout engine.
//!
//! A [`BitmapFont`] only describes glyph metrics and where each glyph lives on
//! its texture page. Loading the page images themselves is left to the
//! renderer; the font just needs each page's pixel size to compute UVs.

/// Rasterizes outline fonts into bitmap fonts.
pub mod bake;
/// Binary font asset reader and writer.
pub mod format;

use std::collections::HashMap;

use euclid::{Box2D, Point2D, Size2D, UnknownUnit};

pub use bake::{BakeConfig, BakedFont, PageImage};
pub use format::FontFormatError;

/// Codepoint of the glyph drawn for characters the font does not contain.
pub const MISSING_GLYPH_CODEPOINT: u32 = 0;

/// A texture page referenced by glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontPage {
    /// Path of the page image, relative to the font asset.
    pub path: String,
    /// Pixel size of the page image.
    pub size: Size2D<u32, UnknownUnit>,
}

/// Raw glyph fields as stored in the font asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphRecord {
    pub codepoint: u32,
    pub page: u8,
    pub page_x: u16,
    pub page_y: u16,
    pub page_width: u16,
    pub page_height: u16,
    /// Offset from the pen position to the left edge of the bitmap.
    pub x_offset: i16,
    /// Offset from the draw baseline down to the top edge of the bitmap.
    pub y_offset: i16,
    /// Distance the pen moves after this glyph.
    pub x_advance: i16,
    /// Distance from the pen position to the visible left edge.
    pub left_side_bearing: i16,
}

/// A glyph resolved against its page, ready for layout and drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub record: GlyphRecord,
    /// Normalized texture coordinates, `min` is the top-left texel corner.
    pub uv: Box2D<f32, UnknownUnit>,
}

impl Glyph {
    /// Resolves a record against the pixel size of the page it lives on.
    pub fn new(record: GlyphRecord, page_size: Size2D<u32, UnknownUnit>) -> Self {
        let w = page_size.width.max(1) as f32;
        let h = page_size.height.max(1) as f32;
        let x0 = record.page_x as f32;
        let y0 = record.page_y as f32;
        let x1 = x0 + record.page_width as f32;
        let y1 = y0 + record.page_height as f32;
        Self {
            record,
            uv: Box2D::new(Point2D::new(x0 / w, y0 / h), Point2D::new(x1 / w, y1 / h)),
        }
    }

    pub fn codepoint(&self) -> u32 {
        self.record.codepoint
    }

    pub fn page(&self) -> usize {
        self.record.page as usize
    }

    pub fn x_advance(&self) -> f32 {
        self.record.x_advance as f32
    }

    pub fn left_side_bearing(&self) -> f32 {
        self.record.left_side_bearing as f32
    }

    /// Glyphs without a visible cell count as whitespace.
    pub fn is_blank(&self) -> bool {
        self.record.page_width == 0 || self.record.page_height == 0
    }
}

/// Vertical metrics shared by every line of a laid out text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// `ascent - descent + line_gap`
    pub line_height: f32,
    pub ascent: f32,
    /// Always zero or negative.
    pub descent: f32,
}

impl FontMetrics {
    /// Height of the visible part of a line, without the line gap.
    pub fn display_line_height(&self) -> f32 {
        self.ascent - self.descent
    }
}

/// Glyph metrics of a single-size bitmap font.
#[derive(Clone, Debug, PartialEq)]
pub struct BitmapFont {
    pages: Vec<FontPage>,
    line_gap: i16,
    ascent: i16,
    descent: i16,
    glyphs: HashMap<u32, Glyph, fxhash::FxBuildHasher>,
    missing_glyph: Option<Glyph>,
}

impl BitmapFont {
    /// Creates a font without glyphs.
    ///
    /// `descent` is normalized to be negative regardless of the sign it was
    /// stored with.
    pub fn new(pages: Vec<FontPage>, line_gap: i16, ascent: i16, descent: i16) -> Self {
        Self {
            pages,
            line_gap,
            ascent,
            descent: descent.saturating_abs().saturating_neg(),
            glyphs: HashMap::default(),
            missing_glyph: None,
        }
    }

    /// Adds a glyph, resolving its UVs against the page it references.
    ///
    /// Returns `None` when the record references a page the font does not have.
    /// A record for codepoint 0 also becomes the missing glyph.
    pub fn insert_glyph(&mut self, record: GlyphRecord) -> Option<Glyph> {
        let page = self.pages.get(record.page as usize)?;
        let glyph = Glyph::new(record, page.size);
        if record.codepoint == MISSING_GLYPH_CODEPOINT {
            self.missing_glyph = Some(glyph);
        }
        self.glyphs.insert(record.codepoint, glyph);
        Some(glyph)
    }

    pub fn pages(&self) -> &[FontPage] {
        &self.pages
    }

    pub fn line_gap(&self) -> i16 {
        self.line_gap
    }

    pub fn ascent(&self) -> i16 {
        self.ascent
    }

    pub fn descent(&self) -> i16 {
        self.descent
    }

    pub fn line_height(&self) -> f32 {
        self.ascent as f32 - self.descent as f32 + self.line_gap as f32
    }

    pub fn metrics(&self) -> FontMetrics {
        FontMetrics {
            line_height: self.line_height(),
            ascent: self.ascent as f32,
            descent: self.descent as f32,
        }
    }

    /// Number of glyphs, including the missing glyph.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Iterates over the glyphs in no particular order.
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }

    pub fn missing_glyph(&self) -> Option<&Glyph> {
        self.missing_glyph.as_ref()
    }

    /// Looks up a glyph without falling back to the missing glyph.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&(ch as u32))
    }

    /// Looks up a glyph, falling back to the missing glyph.
    pub fn glyph_or_missing(&self, ch: char) -> Option<&Glyph> {
        self.glyph(ch).or(self.missing_glyph.as_ref())
    }

    /// Whether `ch` is a word break opportunity for this font.
    ///
    /// Glyphs with an empty page cell count as whitespace. When neither the
    /// codepoint nor the missing glyph resolve, Unicode whitespace is used.
    pub fn is_whitespace(&self, ch: char) -> bool {
        if ch == '\0' {
            return false;
        }
        match self.glyph_or_missing(ch) {
            Some(glyph) => glyph.is_blank(),
            None => ch.is_whitespace(),
        }
    }
}

/// Synthetic font shared by the unit tests.
///
/// Line height 10 (ascent 8, descent -2). Every printable ASCII character
/// advances 10 pixels except `i`, `l` and `.` which advance 4. Space is blank.
/// There is no missing glyph unless a test adds one.
#[cfg(test)]
pub(crate) fn test_font() -> BitmapFont {
    let page = FontPage {
        path: "test.png".into(),
        size: Size2D::new(256, 256),
    };
    let mut font = BitmapFont::new(vec![page], 0, 8, -2);
    for (n, ch) in (' '..='~').enumerate() {
        let narrow = matches!(ch, 'i' | 'l' | '.');
        let blank = ch == ' ';
        font.insert_glyph(GlyphRecord {
            codepoint: ch as u32,
            page: 0,
            page_x: (n % 16) as u16 * 16,
            page_y: (n / 16) as u16 * 16,
            page_width: if blank { 0 } else if narrow { 2 } else { 8 },
            page_height: if blank { 0 } else { 8 },
            x_offset: 0,
            y_offset: 0,
            x_advance: if narrow { 4 } else { 10 },
            left_side_bearing: if narrow { 1 } else { 0 },
        });
    }
    font
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descent_is_normalized_negative() {
        let font = BitmapFont::new(vec![], 2, 12, 4);
        assert_eq!(font.descent(), -4);
        assert_eq!(font.line_height(), 18.0);
        assert_eq!(font.metrics().display_line_height(), 16.0);
    }

    #[test]
    fn glyphs_referencing_missing_pages_are_rejected() {
        let mut font = BitmapFont::new(vec![], 0, 8, -2);
        let inserted = font.insert_glyph(GlyphRecord {
            codepoint: 'a' as u32,
            page: 0,
            ..Default::default()
        });
        assert!(inserted.is_none());
        assert_eq!(font.glyph_count(), 0);
    }

    #[test]
    fn uv_is_normalized_to_page_size() {
        let font = test_font();
        let glyph = font.glyph('!').unwrap();
        assert_eq!(glyph.uv.min, Point2D::new(16.0 / 256.0, 0.0));
        assert_eq!(glyph.uv.max, Point2D::new(24.0 / 256.0, 8.0 / 256.0));
    }

    #[test]
    fn missing_glyph_fallback() {
        let mut font = test_font();
        assert!(font.glyph_or_missing('\u{3042}').is_none());

        font.insert_glyph(GlyphRecord {
            codepoint: MISSING_GLYPH_CODEPOINT,
            page: 0,
            page_width: 8,
            page_height: 8,
            x_advance: 6,
            ..Default::default()
        });
        let fallback = font.glyph_or_missing('\u{3042}').unwrap();
        assert_eq!(fallback.codepoint(), MISSING_GLYPH_CODEPOINT);
        assert!(font.glyph('\u{3042}').is_none());
    }

    #[test]
    fn whitespace_follows_glyph_cells() {
        let mut font = test_font();
        assert!(font.is_whitespace(' '));
        assert!(!font.is_whitespace('a'));
        assert!(!font.is_whitespace('\0'));
        // unmapped codepoints fall back to Unicode rules while there is no missing glyph
        assert!(font.is_whitespace('\u{2003}'));
        assert!(!font.is_whitespace('\u{3042}'));

        font.insert_glyph(GlyphRecord {
            codepoint: MISSING_GLYPH_CODEPOINT,
            page: 0,
            page_width: 8,
            page_height: 8,
            x_advance: 6,
            ..Default::default()
        });
        assert!(!font.is_whitespace('\u{2003}'));
    }
}
