pub mod cpu_renderer;

pub use cpu_renderer::{CpuRenderer, RgbaBitmap};

use euclid::{Box2D, Point2D, UnknownUnit};

use crate::color::PackedColor;
use crate::text::GlyphLayout;

/// One textured rectangle to draw.
///
/// **Y-axis goes up.** `bounds.max.y` is the top edge of the glyph and
/// `uv.min` maps to the top-left corner of `bounds`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphQuad {
    /// Index of the font page to sample.
    pub page: usize,
    pub bounds: Box2D<f32, UnknownUnit>,
    pub color: PackedColor,
    pub uv: Box2D<f32, UnknownUnit>,
}

impl GlyphLayout {
    /// Quads of every drawable glyph, in run order.
    ///
    /// `origin` is where the top-left corner of the text goes.
    pub fn quads(&self, origin: Point2D<f32, UnknownUnit>) -> impl Iterator<Item = GlyphQuad> + '_ {
        let metrics = self.metrics();
        self.runs().iter().flat_map(move |run| {
            let baseline = origin.y
                - metrics.ascent
                - run.line_index() as f32 * metrics.line_height
                - metrics.descent;
            let run_x = origin.x + run.x();

            run.glyphs()
                .iter()
                .zip(run.glyph_x())
                .filter_map(move |(glyph, &offset)| {
                    let glyph = glyph.as_ref()?;
                    let record = &glyph.record;
                    let left = run_x + offset + record.x_offset as f32;
                    let top = baseline - record.y_offset as f32;
                    Some(GlyphQuad {
                        page: glyph.page(),
                        bounds: Box2D::new(
                            Point2D::new(left, top - record.page_height as f32),
                            Point2D::new(left + record.page_width as f32, top),
                        ),
                        color: run.color(),
                        uv: glyph.uv,
                    })
                })
        })
    }
}
