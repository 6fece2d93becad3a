use euclid::Point2D;

use crate::color::PackedColor;
use crate::font::PageImage;
use crate::text::GlyphLayout;

use super::GlyphQuad;

/// RGBA8 image produced by the CPU renderer.
///
/// Pixels are arranged in row-major order with the origin at the top-left,
/// four bytes per pixel, not premultiplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaBitmap {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl RgbaBitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let len = width.saturating_mul(height).saturating_mul(4);
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    /// A bitmap filled with `color`.
    pub fn filled(width: usize, height: usize, color: PackedColor) -> Self {
        let mut bitmap = Self::new(width, height);
        let rgba = [color.r(), color.g(), color.b(), color.a()];
        for pixel in bitmap.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
        bitmap
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<PackedColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let p = &self.pixels[i..i + 4];
        Some(PackedColor::from_rgba8(p[0], p[1], p[2], p[3]))
    }

    /// Source-over blend of `color` scaled by `coverage`.
    fn blend(&mut self, x: usize, y: usize, color: PackedColor, coverage: u8) {
        let i = (y * self.width + x) * 4;
        let alpha = color.a() as f32 / 255.0 * coverage as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[i..i + 4];
        for (channel, src) in dst.iter_mut().zip([color.r(), color.g(), color.b()]) {
            *channel = (src as f32 * alpha + *channel as f32 * (1.0 - alpha)).round() as u8;
        }
        dst[3] = (255.0 * alpha + dst[3] as f32 * (1.0 - alpha)).round() as u8;
    }
}

/// Draws laid out text into RGBA bitmaps using baked page coverage.
///
/// This type is stateless apart from the pages it samples.
pub struct CpuRenderer<'a> {
    pages: &'a [PageImage],
}

impl<'a> CpuRenderer<'a> {
    pub fn new(pages: &'a [PageImage]) -> Self {
        Self { pages }
    }

    /// Renders `layout` into a new transparent bitmap, with the top-left
    /// corner of the text at pixel `(0, 0)`.
    pub fn render_layout(&self, layout: &GlyphLayout, image_size: [usize; 2]) -> RgbaBitmap {
        let mut bitmap = RgbaBitmap::new(image_size[0], image_size[1]);
        self.draw_layout(&mut bitmap, layout, [0.0, 0.0]);
        bitmap
    }

    /// Draws `layout` with the top-left corner of the text at pixel `position`.
    pub fn draw_layout(&self, bitmap: &mut RgbaBitmap, layout: &GlyphLayout, position: [f32; 2]) {
        if bitmap.width == 0 || bitmap.height == 0 {
            return;
        }
        // layout space points up, bitmap rows go down
        for quad in layout.quads(Point2D::new(position[0], -position[1])) {
            self.draw_quad(bitmap, &quad);
        }
    }

    fn draw_quad(&self, bitmap: &mut RgbaBitmap, quad: &GlyphQuad) {
        let Some(page) = self.pages.get(quad.page) else {
            log::warn!("glyph references page {} but only {} are loaded", quad.page, self.pages.len());
            return;
        };

        let glyph_width = quad.bounds.width().round() as usize;
        let glyph_height = quad.bounds.height().round() as usize;
        if glyph_width == 0 || glyph_height == 0 {
            return;
        }

        let src_x = (quad.uv.min.x * page.size.width as f32).round() as u32;
        let src_y = (quad.uv.min.y * page.size.height as f32).round() as u32;
        let origin_x = quad.bounds.min.x;
        let origin_y = -quad.bounds.max.y;

        for row in 0..glyph_height {
            let y = (origin_y + row as f32).floor();
            if y < 0.0 || y as usize >= bitmap.height {
                continue;
            }

            for col in 0..glyph_width {
                let coverage = page.get(src_x + col as u32, src_y + row as u32);
                if coverage == 0 {
                    continue;
                }

                let x = (origin_x + col as f32).floor();
                if x < 0.0 || x as usize >= bitmap.width {
                    continue;
                }

                bitmap.blend(x as usize, y as usize, quad.color, coverage);
            }
        }
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use euclid::Size2D;

    use super::*;
    use crate::font::{BitmapFont, FontPage, GlyphRecord};
    use crate::text::TextLayoutConfig;

    /// One page holding a solid 2x3 glyph for `x`.
    fn solid_font() -> (BitmapFont, Vec<PageImage>) {
        let size = Size2D::new(8, 8);
        let mut page = PageImage::new(size);
        for y in 0..3 {
            for x in 0..2 {
                page.coverage[y * 8 + x] = 255;
            }
        }
        let mut font = BitmapFont::new(
            vec![FontPage {
                path: "solid.png".into(),
                size,
            }],
            0,
            4,
            -1,
        );
        font.insert_glyph(GlyphRecord {
            codepoint: 'x' as u32,
            page: 0,
            page_width: 2,
            page_height: 3,
            // top edge one pixel below the top of the line
            y_offset: -2,
            x_advance: 3,
            ..Default::default()
        });
        (font, vec![page])
    }

    #[test]
    fn renders_solid_glyphs_in_run_color() {
        let (font, pages) = solid_font();
        let mut layout = GlyphLayout::new();
        let config = TextLayoutConfig {
            base_color: PackedColor(0x1020_30FF),
            ..Default::default()
        };
        layout.set_text(&font, "xx", &config);

        let bitmap = CpuRenderer::new(&pages).render_layout(&layout, [8, 6]);
        let ink = PackedColor(0x1020_30FF);

        // baseline = -4 + 1 = -3, top = -3 + 2 = -1, so rows 1..4 are covered
        assert_eq!(bitmap.pixel(0, 0), Some(PackedColor::TRANSPARENT));
        assert_eq!(bitmap.pixel(0, 1), Some(ink));
        assert_eq!(bitmap.pixel(1, 3), Some(ink));
        assert_eq!(bitmap.pixel(2, 2), Some(PackedColor::TRANSPARENT));
        assert_eq!(bitmap.pixel(3, 2), Some(ink));
        assert_eq!(bitmap.pixel(0, 4), Some(PackedColor::TRANSPARENT));
        assert_eq!(bitmap.pixel(8, 0), None);
    }

    #[test]
    fn blending_mixes_with_the_background() {
        let mut bitmap = RgbaBitmap::filled(1, 1, PackedColor::BLACK);
        bitmap.blend(0, 0, PackedColor::WHITE, 128);
        let mixed = bitmap.pixel(0, 0).unwrap();
        assert_eq!(mixed.r(), 128);
        assert_eq!(mixed.a(), 255);
    }

    #[test]
    fn missing_pages_are_skipped() {
        let (font, _) = solid_font();
        let mut layout = GlyphLayout::new();
        layout.set_text(&font, "x", &TextLayoutConfig::default());
        let bitmap = CpuRenderer::new(&[]).render_layout(&layout, [4, 4]);
        assert!(bitmap.pixels.iter().all(|&p| p == 0));
    }
}
