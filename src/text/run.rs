use crate::color::PackedColor;
use crate::font::{BitmapFont, Glyph};

/// Placeholder codepoint standing in for consumed markup characters.
pub const DISCARD: char = '\0';

/// Codepoints that never resolve to a glyph.
pub fn is_discard(ch: char) -> bool {
    matches!(ch, DISCARD | '\n' | '\t')
}

/// A same-colored span of codepoints placed on a single line.
///
/// The codepoints keep a one-to-one correspondence with the source text:
/// consumed markup shows up as [`DISCARD`] and line breaks and tabs are kept
/// as the leading codepoint of the run they start.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphRun {
    codepoints: Vec<char>,
    color: PackedColor,
    x: f32,
    line_index: usize,
    wrap_continuation: bool,

    // filled in by `compute_size`
    glyphs: Vec<Option<Glyph>>,
    glyph_x: Vec<f32>,
    width: f32,
}

impl GlyphRun {
    pub fn codepoints(&self) -> &[char] {
        &self.codepoints
    }

    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }

    pub fn color(&self) -> PackedColor {
        self.color
    }

    /// Horizontal position of the run within its line.
    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    /// Whether this run holds the overflow of a wrapped run.
    pub fn is_wrap_continuation(&self) -> bool {
        self.wrap_continuation
    }

    /// Resolved glyph per codepoint, `None` where nothing is drawn.
    pub fn glyphs(&self) -> &[Option<Glyph>] {
        &self.glyphs
    }

    /// Offset of each codepoint relative to [`Self::x`], plus a trailing entry
    /// equal to [`Self::width`].
    pub fn glyph_x(&self) -> &[f32] {
        &self.glyph_x
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// The codepoints without sentinels.
    pub fn visible_text(&self) -> String {
        self.codepoints.iter().filter(|&&c| !is_discard(c)).collect()
    }

    pub(crate) fn set_color(&mut self, color: PackedColor) {
        self.color = color;
    }

    pub(crate) fn shift_x(&mut self, dx: f32) {
        self.x += dx;
    }

    pub(crate) fn push_codepoint(&mut self, ch: char) {
        self.codepoints.push(ch);
    }

    /// Whether the run holds nothing but consumed markup.
    pub(crate) fn is_sentinel_only(&self) -> bool {
        !self.codepoints.is_empty() && self.codepoints.iter().all(|&c| c == DISCARD)
    }

    /// Number of consumed markup codepoints the run starts with.
    pub(crate) fn leading_sentinels(&self) -> usize {
        self.codepoints.iter().take_while(|&&c| c == DISCARD).count()
    }

    /// Moves every codepoint of `other` to the end of this run. Sizing data
    /// is stale afterwards.
    pub(crate) fn append(&mut self, other: &mut GlyphRun) {
        self.codepoints.append(&mut other.codepoints);
    }

    pub(crate) fn has_linebreak(&self) -> bool {
        self.codepoints.first() == Some(&'\n')
    }

    pub(crate) fn has_tab(&self) -> bool {
        self.codepoints.first() == Some(&'\t')
    }

    pub(crate) fn place(&mut self, x: f32, line_index: usize) {
        self.x = x;
        self.line_index = line_index;
    }

    /// Moves the codepoints from `at` on into `tail`, which becomes a wrap
    /// continuation with the same color. Sizing data of `self` is stale
    /// afterwards.
    pub(crate) fn split_off_into(&mut self, at: usize, tail: &mut GlyphRun) {
        tail.codepoints.extend(self.codepoints.drain(at..));
        tail.color = self.color;
        tail.wrap_continuation = true;
    }

    /// Resolves glyphs and computes the offset of every codepoint.
    pub(crate) fn compute_size(&mut self, font: &BitmapFont) {
        self.glyphs.clear();
        self.glyph_x.clear();
        self.glyphs.reserve(self.codepoints.len());
        self.glyph_x.reserve(self.codepoints.len() + 1);

        // overflowed whitespace must not indent the continuation line
        let mut skip_whitespace = self.wrap_continuation;
        let mut pen = 0.0;

        for &ch in &self.codepoints {
            let glyph = if is_discard(ch) {
                None
            } else {
                font.glyph_or_missing(ch).copied()
            };

            let (advance, bearing) = match glyph {
                Some(_) if skip_whitespace && font.is_whitespace(ch) => (0.0, 0.0),
                Some(glyph) => {
                    skip_whitespace = false;
                    (glyph.x_advance(), glyph.left_side_bearing())
                }
                None => (0.0, 0.0),
            };

            self.glyphs.push(glyph);
            self.glyph_x.push(pen + bearing);
            pen += advance;
        }

        self.width = pen;
        self.glyph_x.push(pen);
    }

    /// Caret index closest to `x`, measured from the run's left edge.
    pub(crate) fn find_index_at(&self, x: f32) -> usize {
        let len = self.codepoints.len();
        let (Some(&first), Some(&last)) = (self.glyph_x.first(), self.glyph_x.last()) else {
            return 0;
        };
        if len <= 1 || x < first {
            return 0;
        }
        if x > last {
            return len;
        }
        for i in (0..len).rev() {
            let this = self.glyph_x[i];
            let next = self.glyph_x[i + 1];
            if x > this {
                return if x - this < next - x { i } else { i + 1 };
            }
        }
        0
    }

    /// Index of the last codepoint starting at or before `x`.
    ///
    /// Only raw positions are considered, not word boundaries.
    pub(crate) fn find_wrap_index_at(&self, x: f32) -> usize {
        let len = self.codepoints.len();
        let (Some(&first), Some(&last)) = (self.glyph_x.first(), self.glyph_x.last()) else {
            return 0;
        };
        if len <= 1 || x < first {
            return 0;
        }
        if x > last {
            return len;
        }
        (0..len).rev().find(|&i| x >= self.glyph_x[i]).unwrap_or(0)
    }

    /// Clears the run for reuse, keeping its buffers.
    pub(crate) fn clear(&mut self) {
        self.codepoints.clear();
        self.glyphs.clear();
        self.glyph_x.clear();
        self.width = 0.0;
        self.x = 0.0;
        self.line_index = 0;
        self.wrap_continuation = false;
        self.color = PackedColor::default();
    }
}
