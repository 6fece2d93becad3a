//! Binary bitmap font assets.
//!
//! All values are big-endian:
//!
//! ```text
//! u8  page_count
//! [page_count] { u16 len; [len] u8 utf8_path }
//! i16 line_gap
//! i16 ascent
//! i16 descent          // sign is ignored, stored negative
//! i32 glyph_count
//! [glyph_count] {
//!     i32 codepoint
//!     u8  page
//!     u16 page_x, page_y, page_width, page_height
//!     i16 x_offset, y_offset
//!     i16 x_advance, left_side_bearing
//! }
//! ```

use std::io::{self, Read, Write};
use std::string::FromUtf8Error;

use euclid::{Size2D, UnknownUnit};

use super::{BitmapFont, FontPage, GlyphRecord};

/// Errors produced while reading a font asset.
#[derive(Debug, thiserror::Error)]
pub enum FontFormatError {
    #[error("failed to read font data: {0}")]
    Io(#[from] io::Error),
    #[error("page path is not valid UTF-8: {0}")]
    InvalidPagePath(#[from] FromUtf8Error),
    #[error("glyph count {0} is negative")]
    NegativeGlyphCount(i32),
    #[error("glyph {codepoint:#x} references page {page}, but the font has {page_count} pages")]
    MissingPage {
        codepoint: u32,
        page: u8,
        page_count: usize,
    },
}

struct BeReader<R> {
    inner: R,
}

impl<R: Read> BeReader<R> {
    fn array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut buf = [0; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn u8(&mut self) -> io::Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> io::Result<u16> {
        self.array().map(u16::from_be_bytes)
    }

    fn i16(&mut self) -> io::Result<i16> {
        self.array().map(i16::from_be_bytes)
    }

    fn i32(&mut self) -> io::Result<i32> {
        self.array().map(i32::from_be_bytes)
    }

    fn string(&mut self) -> Result<String, FontFormatError> {
        let len = self.u16()? as usize;
        let mut bytes = vec![0; len];
        self.inner.read_exact(&mut bytes)?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl BitmapFont {
    /// Reads a font asset.
    ///
    /// `page_size` resolves each page path to the pixel size of its image,
    /// which is needed to normalize glyph UVs.
    pub fn read_from(
        reader: impl Read,
        mut page_size: impl FnMut(&str) -> io::Result<Size2D<u32, UnknownUnit>>,
    ) -> Result<Self, FontFormatError> {
        let mut r = BeReader { inner: reader };

        let page_count = r.u8()?;
        let mut pages = Vec::with_capacity(page_count as usize);
        for _ in 0..page_count {
            let path = r.string()?;
            let size = page_size(&path)?;
            pages.push(FontPage { path, size });
        }

        let line_gap = r.i16()?;
        let ascent = r.i16()?;
        let descent = r.i16()?;
        let mut font = BitmapFont::new(pages, line_gap, ascent, descent);

        let glyph_count = r.i32()?;
        if glyph_count < 0 {
            return Err(FontFormatError::NegativeGlyphCount(glyph_count));
        }

        for _ in 0..glyph_count {
            let record = GlyphRecord {
                codepoint: r.i32()? as u32,
                page: r.u8()?,
                page_x: r.u16()?,
                page_y: r.u16()?,
                page_width: r.u16()?,
                page_height: r.u16()?,
                x_offset: r.i16()?,
                y_offset: r.i16()?,
                x_advance: r.i16()?,
                left_side_bearing: r.i16()?,
            };
            if font.insert_glyph(record).is_none() {
                return Err(FontFormatError::MissingPage {
                    codepoint: record.codepoint,
                    page: record.page,
                    page_count: font.pages().len(),
                });
            }
        }

        log::debug!(
            "loaded bitmap font: {} pages, {} glyphs, line height {}",
            font.pages().len(),
            font.glyph_count(),
            font.line_height()
        );

        Ok(font)
    }

    /// Writes the font in the asset format, glyphs ordered by codepoint.
    pub fn write_to(&self, mut writer: impl Write) -> io::Result<()> {
        let page_count = u8::try_from(self.pages().len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "more than 255 pages"))?;
        writer.write_all(&[page_count])?;
        for page in self.pages() {
            let len = u16::try_from(page.path.len()).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "page path longer than 65535 bytes")
            })?;
            writer.write_all(&len.to_be_bytes())?;
            writer.write_all(page.path.as_bytes())?;
        }

        writer.write_all(&self.line_gap().to_be_bytes())?;
        writer.write_all(&self.ascent().to_be_bytes())?;
        writer.write_all(&self.descent().to_be_bytes())?;

        let mut records: Vec<GlyphRecord> = self.glyphs().map(|glyph| glyph.record).collect();
        records.sort_by_key(|record| record.codepoint);

        let glyph_count = i32::try_from(records.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many glyphs"))?;
        writer.write_all(&glyph_count.to_be_bytes())?;

        for record in records {
            writer.write_all(&(record.codepoint as i32).to_be_bytes())?;
            writer.write_all(&[record.page])?;
            for field in [
                record.page_x,
                record.page_y,
                record.page_width,
                record.page_height,
            ] {
                writer.write_all(&field.to_be_bytes())?;
            }
            for field in [
                record.x_offset,
                record.y_offset,
                record.x_advance,
                record.left_side_bearing,
            ] {
                writer.write_all(&field.to_be_bytes())?;
            }
        }

        Ok(())
    }
}
