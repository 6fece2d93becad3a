//! Mapping between positions and codepoint indices of a finished layout.
//!
//! Positions are in layout space: the origin is the top-left corner of the
//! text and y points up, so line `n` covers
//! `-(n + 1) * line_height <= y < -n * line_height`.

use std::cmp::Ordering;
use std::ops::Range;

use euclid::{Box2D, Point2D, UnknownUnit};

use super::layout::GlyphLayout;
use super::run::{DISCARD, GlyphRun};

fn caret_x(run: &GlyphRun, index: usize) -> f32 {
    run.x() + run.glyph_x().get(index).copied().unwrap_or(run.width())
}

impl GlyphLayout {
    /// Line under `y`, `None` above the text.
    fn line_at(&self, y: f32) -> Option<usize> {
        let line_height = self.metrics().line_height;
        if y >= 0.0 || line_height <= 0.0 {
            return None;
        }
        Some((-y / line_height).floor() as usize)
    }

    /// Index of the codepoint under `point`, or `None` when no run is there.
    pub fn index_at(&self, point: Point2D<f32, UnknownUnit>) -> Option<usize> {
        let line = self.line_at(point.y)?;
        let mut offset = 0;
        for run in self.runs() {
            let hit = run.line_index() == line
                && run.width() > 0.0
                && run.x() <= point.x
                && point.x <= run.x() + run.width();
            if hit {
                let index = run.find_index_at(point.x - run.x());
                // step over consumed markup to the codepoint drawn there
                let markup = run.codepoints()[index.min(run.len())..]
                    .iter()
                    .take_while(|&&c| c == DISCARD)
                    .count();
                return Some(offset + index + markup);
            }
            offset += run.len();
        }
        None
    }

    /// Caret index closest to `point`.
    ///
    /// Points above the text map to 0 and points below it to the end. Left of
    /// a line gives the first caret of that line, right of it the last one.
    pub fn closest_index_to(&self, point: Point2D<f32, UnknownUnit>) -> usize {
        let Some(line) = self.line_at(point.y) else {
            return 0;
        };

        let mut offset = 0;
        for run in self.runs() {
            match run.line_index().cmp(&line) {
                Ordering::Less => offset += run.len(),
                Ordering::Greater => return offset,
                Ordering::Equal => {
                    // the caret before a line break belongs to the previous line
                    let first = usize::from(run.has_linebreak());
                    if point.x <= run.x() {
                        return offset + first;
                    }
                    if point.x < run.x() + run.width() {
                        return offset + run.find_index_at(point.x - run.x()).max(first);
                    }
                    offset += run.len();
                }
            }
        }
        offset
    }

    /// Bounds of the first line fragment covered by the codepoint `range`,
    /// and how many codepoints of the range that fragment includes.
    ///
    /// An empty range touching two runs resolves to the end of the first one.
    pub fn range_bounds(&self, range: Range<usize>) -> (Box2D<f32, UnknownUnit>, usize) {
        let metrics = self.metrics();
        let display_height = metrics.display_line_height();
        let empty = Box2D::new(Point2D::new(0.0, -display_height), Point2D::new(0.0, 0.0));

        let Range { mut start, mut end } = range;
        if start > end {
            return (empty, 0);
        }
        let left_affine = start == end;

        let runs = self.runs();
        let mut first = None;
        for (index, run) in runs.iter().enumerate() {
            let before = if left_affine {
                run.len() < start
            } else {
                run.len() <= start
            };
            if !before {
                first = Some(index);
                break;
            }
            start -= run.len();
            end -= run.len();
        }
        let Some(first_index) = first else {
            return (empty, 0);
        };
        let first_run = &runs[first_index];

        let (last_run, end_in_last, included) = if end <= first_run.len() {
            (first_run, end, end - start)
        } else {
            let mut included = first_run.len() - start;
            let mut remaining = end - first_run.len();
            let mut last = (first_run, first_run.len());
            for next in runs[first_index + 1..]
                .iter()
                .take_while(|run| run.line_index() == first_run.line_index())
            {
                if remaining > next.len() {
                    remaining -= next.len();
                    included += next.len();
                    last = (next, next.len());
                } else {
                    included += remaining;
                    last = (next, remaining);
                    break;
                }
            }
            (last.0, last.1, included)
        };

        let top = -(first_run.line_index() as f32) * metrics.line_height;
        let bounds = Box2D::new(
            Point2D::new(caret_x(first_run, start), top - display_height),
            Point2D::new(caret_x(last_run, end_in_last), top),
        );
        (bounds, included)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_font;
    use crate::text::{ColorTable, TextLayoutConfig};

    fn laid_out(text: &str) -> GlyphLayout {
        let mut layout = GlyphLayout::with_markup(ColorTable::default());
        layout.set_text(&test_font(), text, &TextLayoutConfig::default());
        layout
    }

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Box2D<f32, UnknownUnit> {
        Box2D::new(Point2D::new(x0, y0), Point2D::new(x1, y1))
    }

    #[test]
    fn index_under_a_point() {
        // a0 b1 \n2 c3 d4
        let layout = laid_out("ab\ncd");
        assert_eq!(layout.index_at(Point2D::new(3.0, -5.0)), Some(0));
        assert_eq!(layout.index_at(Point2D::new(12.0, -5.0)), Some(1));
        assert_eq!(layout.index_at(Point2D::new(12.0, -15.0)), Some(4));
        assert_eq!(layout.index_at(Point2D::new(50.0, -5.0)), None);
        assert_eq!(layout.index_at(Point2D::new(5.0, 5.0)), None);
        assert_eq!(layout.index_at(Point2D::new(5.0, -25.0)), None);
    }

    #[test]
    fn index_skips_markup() {
        let layout = laid_out("{#F00}red");
        assert_eq!(layout.index_at(Point2D::new(0.0, -5.0)), Some(6));
        assert_eq!(layout.index_at(Point2D::new(12.0, -5.0)), Some(7));

        // the zero-width run holding `{RED}` is never hit
        let layout = laid_out("{RED}{}ab");
        assert_eq!(layout.runs()[0].width(), 0.0);
        assert_eq!(layout.index_at(Point2D::new(0.0, -5.0)), Some(7));
    }

    #[test]
    fn closest_caret() {
        let layout = laid_out("ab\ncd");
        let closest = |x, y| layout.closest_index_to(Point2D::new(x, y));

        assert_eq!(closest(5.0, 5.0), 0);
        assert_eq!(closest(100.0, -5.0), 2);
        assert_eq!(closest(-5.0, -15.0), 3);
        assert_eq!(closest(12.0, -15.0), 4);
        assert_eq!(closest(100.0, -15.0), 5);
        assert_eq!(closest(5.0, -100.0), 5);
    }

    #[test]
    fn closest_caret_on_empty_layout() {
        let layout = laid_out("");
        assert_eq!(layout.closest_index_to(Point2D::new(5.0, -5.0)), 0);
        assert_eq!(layout.index_at(Point2D::new(5.0, -5.0)), None);
    }

    #[test]
    fn bounds_stop_at_the_end_of_the_line() {
        let layout = laid_out("ab\ncd");
        assert_eq!(layout.range_bounds(1..4), (rect(10.0, -10.0, 20.0, 0.0), 1));
        assert_eq!(layout.range_bounds(3..5), (rect(0.0, -20.0, 20.0, -10.0), 2));
    }

    #[test]
    fn empty_range_prefers_the_end_of_a_run() {
        let layout = laid_out("ab\ncd");
        assert_eq!(layout.range_bounds(2..2), (rect(20.0, -10.0, 20.0, 0.0), 0));
    }

    #[test]
    fn bounds_span_runs_on_one_line() {
        // red run of 6 sentinels + "ab", then 2 sentinels + "cd"
        let layout = laid_out("{#F00}ab{}cd");
        assert_eq!(layout.range_bounds(6..12), (rect(0.0, -10.0, 40.0, 0.0), 6));
        assert_eq!(layout.range_bounds(7..11), (rect(10.0, -10.0, 30.0, 0.0), 4));
    }

    #[test]
    fn bounds_of_invalid_ranges() {
        let layout = laid_out("ab");
        let empty = rect(0.0, -10.0, 0.0, 0.0);
        assert_eq!(layout.range_bounds(100..120), (empty, 0));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 2..1;
        assert_eq!(layout.range_bounds(reversed), (empty, 0));
    }
}
