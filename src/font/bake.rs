use euclid::{Size2D, UnknownUnit};

use super::{BitmapFont, FontPage, GlyphRecord, MISSING_GLYPH_CODEPOINT};

/// Parameters for turning an outline font into a [`BitmapFont`].
#[derive(Clone, Debug, PartialEq)]
pub struct BakeConfig {
    /// Pixel size the glyphs are rasterized at.
    pub font_size: f32,
    /// Characters to rasterize. Characters the font does not map are skipped.
    pub characters: Vec<char>,
    /// Side length of each square coverage page.
    pub page_size: u32,
    /// Empty pixels kept around every glyph.
    pub padding: u32,
    /// Page paths are `{page_path_prefix}{index}.png`.
    pub page_path_prefix: String,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            font_size: 32.0,
            characters: (' '..='~').collect(),
            page_size: 512,
            padding: 1,
            page_path_prefix: "page".into(),
        }
    }
}

impl BakeConfig {
    /// Page coordinates are stored as `u16` in the font asset.
    fn page_size_fits(&self) -> bool {
        self.page_size <= u32::from(u16::MAX)
    }
}

/// 8-bit coverage image of one font page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageImage {
    pub size: Size2D<u32, UnknownUnit>,
    /// Row-major coverage, `0` is empty and `255` fully covered.
    pub coverage: Vec<u8>,
}

impl PageImage {
    pub fn new(size: Size2D<u32, UnknownUnit>) -> Self {
        Self {
            size,
            coverage: vec![0; size.width as usize * size.height as usize],
        }
    }

    /// Coverage at `(x, y)`, zero outside the page.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.size.width || y >= self.size.height {
            return 0;
        }
        self.coverage[y as usize * self.size.width as usize + x as usize]
    }

    /// Copies a `width`-wide coverage block to `(x, y)`, clipping at the edges.
    fn blit(&mut self, x: u32, y: u32, width: usize, data: &[u8]) {
        if width == 0 {
            return;
        }
        let page_width = self.size.width as usize;
        for (row, src) in data.chunks(width).enumerate() {
            let dy = y as usize + row;
            if dy >= self.size.height as usize {
                break;
            }
            let dx = x as usize;
            let len = src.len().min(page_width.saturating_sub(dx));
            let start = dy * page_width + dx;
            self.coverage[start..start + len].copy_from_slice(&src[..len]);
        }
    }
}

/// Result of baking: the font metrics and the page images they reference.
#[derive(Clone, Debug, PartialEq)]
pub struct BakedFont {
    pub font: BitmapFont,
    pub pages: Vec<PageImage>,
}

/// Shelf allocator handing out rectangles on square pages.
#[derive(Debug)]
struct ShelfPacker {
    page_size: u32,
    padding: u32,
    page: usize,
    cursor_x: u32,
    cursor_y: u32,
    shelf_height: u32,
}

impl ShelfPacker {
    fn new(page_size: u32, padding: u32) -> Self {
        Self {
            page_size,
            padding,
            page: 0,
            cursor_x: padding,
            cursor_y: padding,
            shelf_height: 0,
        }
    }

    /// Returns `(page, x, y)` for a `width` x `height` cell.
    fn allocate(&mut self, width: u32, height: u32) -> Option<(usize, u32, u32)> {
        let pad = self.padding;
        if width + 2 * pad > self.page_size || height + 2 * pad > self.page_size {
            return None;
        }

        if self.cursor_x + width + pad > self.page_size {
            self.cursor_x = pad;
            self.cursor_y += self.shelf_height + pad;
            self.shelf_height = 0;
        }
        if self.cursor_y + height + pad > self.page_size {
            self.page += 1;
            self.cursor_x = pad;
            self.cursor_y = pad;
            self.shelf_height = 0;
        }

        let placed = (self.page, self.cursor_x, self.cursor_y);
        self.cursor_x += width + pad;
        self.shelf_height = self.shelf_height.max(height);
        Some(placed)
    }
}

fn saturate_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Rasterizes `config.characters` and the font's `.notdef` glyph into pages.
///
/// Returns `None` when the font has no horizontal line metrics or when
/// `config.page_size` does not fit the 16-bit page coordinates of the asset.
pub fn bake(font: &fontdue::Font, config: &BakeConfig) -> Option<BakedFont> {
    if !config.page_size_fits() {
        log::warn!(
            "page size {} exceeds {}, cannot bake",
            config.page_size,
            u16::MAX
        );
        return None;
    }
    let Some(line_metrics) = font.horizontal_line_metrics(config.font_size) else {
        log::warn!("font has no horizontal line metrics, cannot bake");
        return None;
    };
    let ascent = saturate_i16(line_metrics.ascent.round() as i32);
    let descent = saturate_i16(line_metrics.descent.round() as i32);
    let line_gap = saturate_i16(line_metrics.line_gap.round() as i32);
    let page_extent = Size2D::new(config.page_size, config.page_size);

    let mut packer = ShelfPacker::new(config.page_size, config.padding);
    let mut pages = vec![PageImage::new(page_extent)];
    let mut records = Vec::with_capacity(config.characters.len() + 1);
    let mut seen = fxhash::FxHashSet::default();

    let targets = std::iter::once((MISSING_GLYPH_CODEPOINT, 0u16)).chain(
        config
            .characters
            .iter()
            .filter(|&&ch| ch != '\0')
            .map(|&ch| (ch as u32, font.lookup_glyph_index(ch)))
            .filter(|&(_, index)| index != 0),
    );

    for (codepoint, glyph_index) in targets {
        if !seen.insert(codepoint) {
            continue;
        }
        let (metrics, coverage) = font.rasterize_indexed(glyph_index, config.font_size);
        let (Ok(width), Ok(height)) = (
            u16::try_from(metrics.width),
            u16::try_from(metrics.height),
        ) else {
            log::warn!("glyph {codepoint:#x} is too large to bake, skipped");
            continue;
        };

        let (page, page_x, page_y) = if width == 0 || height == 0 {
            (0, 0, 0)
        } else {
            let Some(placed) = packer.allocate(width as u32, height as u32) else {
                log::warn!(
                    "glyph {codepoint:#x} ({width}x{height}) does not fit a {} pixel page, skipped",
                    config.page_size
                );
                continue;
            };
            placed
        };
        let (Ok(page_x), Ok(page_y)) = (u16::try_from(page_x), u16::try_from(page_y)) else {
            log::warn!("glyph {codepoint:#x} placed outside 16-bit page coordinates, skipped");
            continue;
        };
        let Ok(page_index) = u8::try_from(page) else {
            log::warn!("font needs more than 256 pages, remaining glyphs skipped");
            break;
        };
        while pages.len() <= page {
            pages.push(PageImage::new(page_extent));
        }
        pages[page].blit(page_x.into(), page_y.into(), metrics.width, &coverage);

        records.push(GlyphRecord {
            codepoint,
            page: page_index,
            page_x,
            page_y,
            page_width: width,
            page_height: height,
            x_offset: 0,
            // quads hang from the draw baseline, which sits |descent| above the real one
            y_offset: saturate_i16(-(descent as i32) - (metrics.ymin + metrics.height as i32)),
            x_advance: saturate_i16(metrics.advance_width.round() as i32),
            left_side_bearing: saturate_i16(metrics.xmin),
        });
    }

    let font_pages = (0..pages.len())
        .map(|index| FontPage {
            path: format!("{}{index}.png", config.page_path_prefix),
            size: page_extent,
        })
        .collect();
    let mut bitmap_font = BitmapFont::new(font_pages, line_gap, ascent, descent);
    for record in records {
        bitmap_font.insert_glyph(record);
    }

    log::debug!(
        "baked {} glyphs at {}px onto {} pages",
        bitmap_font.glyph_count(),
        config.font_size,
        pages.len()
    );

    Some(BakedFont {
        font: bitmap_font,
        pages,
    })
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packer_fills_shelves_then_pages() {
        let mut packer = ShelfPacker::new(32, 1);

        assert_eq!(packer.allocate(10, 8), Some((0, 1, 1)));
        assert_eq!(packer.allocate(10, 12), Some((0, 12, 1)));
        // 23 + 10 + 1 > 32, next shelf starts below the tallest glyph
        assert_eq!(packer.allocate(10, 8), Some((0, 1, 14)));
        assert_eq!(packer.allocate(10, 10), Some((0, 12, 14)));
        // neither the shelf nor the page below it has room left
        assert_eq!(packer.allocate(10, 10), Some((1, 1, 1)));
    }

    #[test]
    fn packer_rejects_cells_larger_than_a_page() {
        let mut packer = ShelfPacker::new(16, 1);
        assert_eq!(packer.allocate(15, 4), None);
        assert_eq!(packer.allocate(14, 14), Some((0, 1, 1)));
    }

    #[test]
    fn blit_clips_to_the_page() {
        let mut page = PageImage::new(Size2D::new(4, 3));
        page.blit(2, 1, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9]);

        assert_eq!(page.get(2, 1), 1);
        assert_eq!(page.get(3, 1), 2);
        assert_eq!(page.get(2, 2), 4);
        assert_eq!(page.get(3, 2), 5);
        assert_eq!(page.get(0, 0), 0);
        assert_eq!(page.get(4, 1), 0);
    }

    #[test]
    fn oversized_pages_are_rejected() {
        let config = |page_size| BakeConfig {
            page_size,
            ..Default::default()
        };
        assert!(config(512).page_size_fits());
        assert!(config(65535).page_size_fits());
        assert!(!config(65536).page_size_fits());
        assert!(!config(100_000).page_size_fits());
    }

    #[test]
    fn default_config_covers_printable_ascii() {
        let config = BakeConfig::default();
        assert_eq!(config.characters.len(), 95);
        assert_eq!(config.characters.first(), Some(&' '));
        assert_eq!(config.characters.last(), Some(&'~'));
    }
}
