use std::ops::Range;

use crate::color::PackedColor;
use crate::font::{BitmapFont, FontMetrics};

use super::markup::{ColorTable, MarkupResolver};
use super::pool::RunPool;
use super::run::{DISCARD, GlyphRun};
use super::scanner::{self, Scanner, Token};

/// Configuration knobs used by a single `set_text` call.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayoutConfig {
    /// Color of text outside any markup tag. Its alpha is also the default
    /// alpha of tag colors.
    pub base_color: PackedColor,
    /// Width used for wrapping and alignment. `None` and `Some(0.0)` both
    /// mean unbounded.
    pub target_width: Option<f32>,
    pub horizontal_align: HorizontalAlign,
    /// Tab stops are placed every `tab_stop_scale` line heights.
    pub tab_stop_scale: f32,
    /// Minimum number of codepoints kept on a line when a word has to be
    /// broken because it is wider than the whole line.
    pub min_break_chars: usize,
}

impl Default for TextLayoutConfig {
    fn default() -> Self {
        Self {
            base_color: PackedColor::WHITE,
            target_width: None,
            horizontal_align: HorizontalAlign::Left,
            tab_stop_scale: 2.5,
            min_break_chars: 3,
        }
    }
}

impl TextLayoutConfig {
    /// The target width, with unbounded mapped to infinity.
    pub fn wrap_width(&self) -> f32 {
        match self.target_width {
            Some(width) if width != 0.0 => width,
            _ => f32::INFINITY,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Horizontal justification applied after every line is built.
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Lays out a text as a sequence of [`GlyphRun`]s.
///
/// The layout keeps its runs and a pool of spare runs between calls, so
/// repeatedly laying out text does not allocate once the buffers have grown.
///
/// Coordinates are relative to the top-left corner of the text with x going
/// right. Line `n` starts `n` line heights below the top.
#[derive(Clone, Debug, Default)]
pub struct GlyphLayout {
    markup: Option<MarkupResolver>,
    pool: RunPool,
    codepoints: Vec<char>,

    // result
    runs: Vec<GlyphRun>,
    metrics: FontMetrics,
    width: f32,
    height: f32,
    line_count: usize,
}

impl GlyphLayout {
    /// A layout that places every character literally.
    pub fn new() -> Self {
        Self::default()
    }

    /// A layout that interprets `{...}` color tags using `colors`.
    pub fn with_markup(colors: ColorTable) -> Self {
        Self {
            markup: Some(MarkupResolver::new(colors)),
            ..Self::default()
        }
    }

    /// Replaces the run pool, e.g. with [`RunPool::unpooled`].
    pub fn with_pool(mut self, pool: RunPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn markup_enabled(&self) -> bool {
        self.markup.is_some()
    }

    /// Named colors used by tags, `None` when markup is disabled.
    pub fn colors(&self) -> Option<&ColorTable> {
        self.markup.as_ref().map(MarkupResolver::colors)
    }

    pub fn colors_mut(&mut self) -> Option<&mut ColorTable> {
        self.markup.as_mut().map(MarkupResolver::colors_mut)
    }

    pub fn pool(&self) -> &RunPool {
        &self.pool
    }

    /// Runs in line order.
    pub fn runs(&self) -> &[GlyphRun] {
        &self.runs
    }

    /// Widest extent of any line before alignment.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Vertical metrics of the font used by the last layout.
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Number of codepoints over all runs, sentinels included.
    pub fn codepoint_count(&self) -> usize {
        self.runs.iter().map(GlyphRun::len).sum()
    }

    /// The laid out text without sentinels, lines joined by `'\n'`.
    pub fn visible_text(&self) -> String {
        let mut text = String::new();
        let mut line = 0;
        for run in &self.runs {
            while line < run.line_index() {
                text.push('\n');
                line += 1;
            }
            text.push_str(&run.visible_text());
        }
        text
    }

    /// Drops the current result, returning its runs to the pool.
    pub fn reset(&mut self) {
        self.pool.free_all(&mut self.runs);
        if let Some(markup) = self.markup.as_mut() {
            markup.clear();
        }
        self.width = 0.0;
        self.height = 0.0;
        self.line_count = 0;
    }

    pub fn set_text(&mut self, font: &BitmapFont, text: &str, config: &TextLayoutConfig) {
        self.set_text_range(font, text, 0..text.len(), config);
    }

    /// Lays out `text[range]`, where `range` is a byte range.
    pub fn set_text_range(
        &mut self,
        font: &BitmapFont,
        text: &str,
        range: Range<usize>,
        config: &TextLayoutConfig,
    ) {
        let mut codepoints = std::mem::take(&mut self.codepoints);
        scanner::decode_str(text, range, &mut codepoints);
        self.layout_codepoints(font, &codepoints, config);
        self.codepoints = codepoints;
    }

    /// Lays out UTF-16 `units[range]`.
    ///
    /// Unpaired surrogates are laid out as invisible placeholders.
    pub fn set_text_utf16(
        &mut self,
        font: &BitmapFont,
        units: &[u16],
        range: Range<usize>,
        config: &TextLayoutConfig,
    ) {
        let mut codepoints = std::mem::take(&mut self.codepoints);
        scanner::decode_utf16(units, range, &mut codepoints);
        self.layout_codepoints(font, &codepoints, config);
        self.codepoints = codepoints;
    }

    fn layout_codepoints(
        &mut self,
        font: &BitmapFont,
        codepoints: &[char],
        config: &TextLayoutConfig,
    ) {
        let Self {
            markup,
            pool,
            runs,
            metrics,
            width,
            height,
            line_count,
            ..
        } = self;

        pool.free_all(runs);
        if let Some(markup) = markup.as_mut() {
            markup.clear();
        }
        *metrics = font.metrics();

        let base = config.base_color;
        let mut breaker = LineBreaker {
            font,
            config,
            wrap_width: config.wrap_width(),
            line_height: metrics.line_height,
            runs: &mut *runs,
            pool: &mut *pool,
            width: 0.0,
            height: metrics.line_height,
            line_count: 1,
        };

        let mut run = breaker.fresh_run(base);
        let mut scanner = Scanner::new(codepoints, markup.is_some());
        while let Some(token) = scanner.next() {
            match token {
                Token::Codepoint(ch @ ('\n' | '\t')) => {
                    let color = current_color(markup.as_ref(), base);
                    run = breaker.push_run(run, color);
                    run.push_codepoint(ch);
                }
                Token::Codepoint(ch) => run.push_codepoint(ch),
                Token::EscapedBrace(ch) => {
                    run.push_codepoint(DISCARD);
                    run.push_codepoint(ch);
                }
                Token::Tag { content, len } => {
                    let resolved = match markup.as_mut() {
                        Some(resolver) => resolver.apply(content, base.a()),
                        None => continue,
                    };
                    match resolved {
                        Ok(()) => {
                            let color = current_color(markup.as_ref(), base);
                            run = breaker.push_run(run, color);
                            for _ in 0..len {
                                run.push_codepoint(DISCARD);
                            }
                        }
                        Err(err) => {
                            log::debug!(
                                "markup tag `{{{}}}` left as text: {err}",
                                content.iter().collect::<String>()
                            );
                            scanner.reject_tag();
                            run.push_codepoint('{');
                        }
                    }
                }
            }
        }

        breaker.finish(run);

        *width = breaker.width;
        *height = breaker.height;
        *line_count = breaker.line_count;

        if let Some(markup) = markup.as_mut() {
            markup.clear();
        }

        let align_width = if config.wrap_width().is_finite() {
            config.wrap_width()
        } else {
            *width
        };
        align_lines(runs, config.horizontal_align, align_width);

        log::trace!(
            "laid out {} codepoints as {} runs on {} lines ({} x {})",
            codepoints.len(),
            runs.len(),
            line_count,
            width,
            height
        );
    }
}

fn current_color(markup: Option<&MarkupResolver>, base: PackedColor) -> PackedColor {
    markup.map_or(base, |resolver| resolver.current(base))
}

/// Shifts every line so its right edge meets `target_width` (or its center
/// meets the center of it).
fn align_lines(runs: &mut [GlyphRun], align: HorizontalAlign, target_width: f32) {
    let factor = match align {
        HorizontalAlign::Left => return,
        HorizontalAlign::Center => 0.5,
        HorizontalAlign::Right => 1.0,
    };
    for line in runs.chunk_by_mut(|a, b| a.line_index() == b.line_index()) {
        let extent = line
            .iter()
            .map(|run| run.x() + run.width())
            .fold(0.0, f32::max);
        let shift = (target_width - extent) * factor;
        for run in line {
            run.shift_x(shift);
        }
    }
}

enum Split {
    Fits,
    /// The run has no break opportunity and has to start on a new line.
    MoveToNextLine,
    At(usize),
}

/// Places finished runs and wraps them against the target width.
struct LineBreaker<'a> {
    font: &'a BitmapFont,
    config: &'a TextLayoutConfig,
    wrap_width: f32,
    line_height: f32,
    runs: &'a mut Vec<GlyphRun>,
    pool: &'a mut RunPool,
    width: f32,
    height: f32,
    line_count: usize,
}

impl LineBreaker<'_> {
    fn fresh_run(&mut self, color: PackedColor) -> GlyphRun {
        let mut run = self.pool.obtain();
        run.set_color(color);
        run
    }

    /// Closes `run` and returns a new run colored `next_color`.
    ///
    /// Empty runs are dropped. Runs that overflow the target width are split,
    /// and the overflow continues on the next line.
    fn push_run(&mut self, run: GlyphRun, next_color: PackedColor) -> GlyphRun {
        let mut pending = Some((run, false));

        while let Some((mut run, mut force_new_line)) = pending.take() {
            if run.is_empty() {
                self.pool.free(run);
                continue;
            }

            loop {
                self.place(&mut run, force_new_line);
                run.compute_size(self.font);

                match self.find_split(&run) {
                    Split::Fits => break,
                    Split::MoveToNextLine => {
                        log::trace!("run of {} codepoints moved to the next line", run.len());
                        force_new_line = true;
                    }
                    Split::At(index) => {
                        log::trace!("run of {} codepoints wrapped at {index}", run.len());
                        let mut tail = self.pool.obtain();
                        run.split_off_into(index, &mut tail);
                        run.compute_size(self.font);
                        pending = Some((tail, true));
                        break;
                    }
                }
            }

            self.width = self.width.max(run.x() + run.width());
            self.runs.push(run);
        }

        self.fresh_run(next_color)
    }

    /// Closes the last run of the text.
    ///
    /// A last run holding only the markup of closing tags is folded into the
    /// previous run instead of becoming a run of its own.
    fn finish(&mut self, mut run: GlyphRun) {
        if run.is_sentinel_only() {
            if let Some(last) = self.runs.last_mut() {
                last.append(&mut run);
                last.compute_size(self.font);
                self.pool.free(run);
                return;
            }
        }
        let spare = self.push_run(run, PackedColor::default());
        self.pool.free(spare);
    }

    fn place(&mut self, run: &mut GlyphRun, force_new_line: bool) {
        let (mut x, mut line) = match self.runs.last() {
            Some(last) => (last.x() + last.width(), last.line_index()),
            None => (0.0, 0),
        };

        if force_new_line || run.has_linebreak() {
            x = 0.0;
            line += 1;
            self.height += self.line_height;
            self.line_count += 1;
        } else if run.has_tab() {
            x = next_tab_stop(x, self.config.tab_stop_scale * self.line_height);
        }

        run.place(x, line);
    }

    fn find_split(&self, run: &GlyphRun) -> Split {
        if run.x() + run.width() <= self.wrap_width {
            return Split::Fits;
        }

        let codepoints = run.codepoints();
        let candidate = run
            .find_wrap_index_at(self.wrap_width - run.x())
            .min(codepoints.len() - 1);

        let mut split = candidate;
        while split != 0 && !self.font.is_whitespace(codepoints[split]) {
            split -= 1;
        }

        // markup at the start of the run is not part of the first word
        let lead = run.leading_sentinels();
        if split == 0 {
            let first_on_line = self
                .runs
                .iter()
                .rev()
                .take_while(|last| last.line_index() == run.line_index())
                .all(GlyphRun::is_sentinel_only);
            if !first_on_line {
                return Split::MoveToNextLine;
            }
            // a single word wider than the line, break it
            split = candidate.max(lead + self.config.min_break_chars);
        }

        if split > lead && split < codepoints.len() {
            Split::At(split)
        } else {
            Split::Fits
        }
    }
}

/// The first tab stop strictly right of `x`.
fn next_tab_stop(x: f32, tab_width: f32) -> f32 {
    if tab_width <= 0.0 {
        return x;
    }
    let on_stop = (x % tab_width).abs() <= 1e-6;
    ((x / tab_width).ceil() + if on_stop { 1.0 } else { 0.0 }) * tab_width
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::test_font;

    fn config(target_width: Option<f32>) -> TextLayoutConfig {
        TextLayoutConfig {
            target_width,
            ..Default::default()
        }
    }

    fn laid_out(text: &str, config: &TextLayoutConfig) -> GlyphLayout {
        let mut layout = GlyphLayout::with_markup(ColorTable::default());
        layout.set_text(&test_font(), text, config);
        layout
    }

    fn lines_of(layout: &GlyphLayout) -> Vec<usize> {
        layout.runs().iter().map(GlyphRun::line_index).collect()
    }

    #[test]
    fn single_word_unbounded() {
        let layout = laid_out("hello", &config(None));
        assert_eq!(layout.runs().len(), 1);
        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.width(), 38.0);
        assert_eq!(layout.height(), 10.0);
        assert_eq!(layout.runs()[0].color(), PackedColor::WHITE);
    }

    #[test]
    fn newline_starts_a_run_on_the_next_line() {
        let layout = laid_out("a\nb", &config(None));
        assert_eq!(lines_of(&layout), [0, 1]);
        assert_eq!(layout.runs()[1].codepoints(), ['\n', 'b']);
        assert_eq!(layout.runs()[1].x(), 0.0);
        assert_eq!(layout.height(), 20.0);
        assert_eq!(layout.line_count(), 2);
        assert_eq!(layout.visible_text(), "a\nb");
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let layout = laid_out("", &config(Some(100.0)));
        assert!(layout.runs().is_empty());
        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.height(), 10.0);
        assert_eq!(layout.width(), 0.0);
    }

    #[test]
    fn color_tag_opens_a_colored_run() {
        let layout = laid_out("{#F00}red{}", &config(None));
        let runs = layout.runs();
        assert_eq!(runs.len(), 1);

        let red = &runs[0];
        assert_eq!(red.codepoints()[..6], [DISCARD; 6]);
        assert_eq!(red.codepoints()[6..9], ['r', 'e', 'd']);
        assert_eq!(red.codepoints()[9..], [DISCARD; 2]);
        assert_eq!(red.visible_text(), "red");
        assert_eq!(red.color(), PackedColor(0xFF00_00FF));
        assert_eq!(red.x(), 0.0);
        assert_eq!(red.width(), 30.0);

        assert_eq!(layout.codepoint_count(), 11);
        assert_eq!(layout.visible_text(), "red");
    }

    #[test]
    fn closing_tag_markup_opens_the_following_run() {
        let layout = laid_out("{#F00}ab{}cd", &config(None));
        let runs = layout.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 8);
        assert_eq!(runs[1].codepoints(), [DISCARD, DISCARD, 'c', 'd']);
        assert_eq!(runs[1].color(), PackedColor::WHITE);
        assert_eq!(runs[1].x(), 20.0);
    }

    #[test]
    fn tag_alpha_defaults_to_the_base_alpha() {
        let config = TextLayoutConfig {
            base_color: PackedColor(0xFFFF_FF80),
            ..config(None)
        };
        let layout = laid_out("{#0F0}g{RED}r{#0000FF40}b", &config);
        let colors: Vec<_> = layout.runs().iter().map(GlyphRun::color).collect();
        assert_eq!(
            colors,
            [
                PackedColor(0x00FF_0080),
                PackedColor(0xFF00_0080),
                PackedColor(0x0000_FF40)
            ]
        );
    }

    #[test]
    fn wraps_at_whitespace() {
        let layout = laid_out("aaaa bbbb", &config(Some(50.0)));
        let runs = layout.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].codepoints(), ['a'; 4]);
        assert_eq!(runs[0].width(), 40.0);

        assert!(runs[1].is_wrap_continuation());
        assert_eq!(runs[1].line_index(), 1);
        assert_eq!(runs[1].visible_text(), " bbbb");
        assert_eq!(runs[1].glyph_x()[1], 0.0);
        assert_eq!(runs[1].width(), 40.0);

        assert_eq!(layout.height(), 20.0);
        assert_eq!(layout.width(), 40.0);
    }

    #[test]
    fn escaped_braces_are_literal() {
        let layout = laid_out("{{literal}}", &config(None));
        assert_eq!(layout.runs().len(), 1);
        assert_eq!(layout.visible_text(), "{literal}");
        assert_eq!(layout.codepoint_count(), 11);
    }

    #[test]
    fn unresolved_tags_are_literal() {
        let layout = laid_out("{bogus}", &config(None));
        assert_eq!(layout.runs().len(), 1);
        assert_eq!(layout.visible_text(), "{bogus}");
        assert_eq!(layout.width(), 70.0);

        let layout = laid_out("{}x{#12}", &config(None));
        assert_eq!(layout.visible_text(), "{}x{#12}");
    }

    #[test]
    fn markup_disabled_keeps_tags() {
        let mut layout = GlyphLayout::new();
        layout.set_text(&test_font(), "{red}{{", &config(None));
        assert_eq!(layout.visible_text(), "{red}{{");
        assert_eq!(layout.runs().len(), 1);
    }

    #[test]
    fn color_stack_does_not_leak_between_calls() {
        let font = test_font();
        let mut layout = GlyphLayout::with_markup(ColorTable::default());
        layout.set_text(&font, "{RED}a", &config(None));
        layout.set_text(&font, "b", &config(None));
        assert_eq!(layout.runs()[0].color(), PackedColor::WHITE);
    }

    #[test]
    fn word_wider_than_line_is_broken() {
        let layout = laid_out("abcdefgh", &config(Some(25.0)));
        let texts: Vec<_> = layout.runs().iter().map(GlyphRun::visible_text).collect();
        assert_eq!(texts, ["abc", "def", "gh"]);
        assert_eq!(lines_of(&layout), [0, 1, 2]);
        assert_eq!(layout.line_count(), 3);
    }

    #[test]
    fn leading_markup_does_not_delay_a_hard_break() {
        for text in ["{RED}abcdefgh", "{RED}{}abcdefgh"] {
            let layout = laid_out(text, &config(Some(25.0)));
            let visible: Vec<_> = layout
                .runs()
                .iter()
                .map(GlyphRun::visible_text)
                .filter(|text| !text.is_empty())
                .collect();
            assert_eq!(visible, ["abc", "def", "gh"], "{text}");
            assert_eq!(layout.line_count(), 3, "{text}");
            assert_eq!(layout.height(), 30.0, "{text}");
            assert_eq!(layout.codepoint_count(), text.chars().count());
        }
    }

    #[test]
    fn min_break_chars_is_configurable() {
        let config = TextLayoutConfig {
            min_break_chars: 1,
            ..config(Some(15.0))
        };
        let layout = laid_out("abc", &config);
        let texts: Vec<_> = layout.runs().iter().map(GlyphRun::visible_text).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn unbreakable_run_moves_to_the_next_line() {
        let layout = laid_out("aa{#F00}bbbbbb", &config(Some(50.0)));
        let texts: Vec<_> = layout.runs().iter().map(GlyphRun::visible_text).collect();
        assert_eq!(texts, ["aa", "bbbbb", "b"]);
        assert_eq!(lines_of(&layout), [0, 1, 2]);
        assert_eq!(layout.runs()[1].x(), 0.0);
        assert_eq!(layout.runs()[2].color(), PackedColor(0xFF00_00FF));
        assert_eq!(layout.height(), 30.0);
    }

    #[test]
    fn tabs_snap_to_stops() {
        assert_eq!(next_tab_stop(0.0, 25.0), 25.0);
        assert_eq!(next_tab_stop(10.0, 25.0), 25.0);
        assert_eq!(next_tab_stop(25.0, 25.0), 50.0);
        assert_eq!(next_tab_stop(26.0, 25.0), 50.0);

        let layout = laid_out("a\tb\tc", &config(None));
        let xs: Vec<_> = layout.runs().iter().map(GlyphRun::x).collect();
        assert_eq!(xs, [0.0, 25.0, 50.0]);
        assert_eq!(lines_of(&layout), [0, 0, 0]);
        assert_eq!(layout.width(), 60.0);
    }

    #[test]
    fn right_alignment_meets_the_target() {
        let config = TextLayoutConfig {
            horizontal_align: HorizontalAlign::Right,
            ..config(Some(100.0))
        };
        let layout = laid_out("one two three four five six", &config);
        assert!(layout.line_count() > 1);
        for line in 0..layout.line_count() {
            let extent = layout
                .runs()
                .iter()
                .filter(|run| run.line_index() == line)
                .map(|run| run.x() + run.width())
                .fold(0.0, f32::max);
            assert!((extent - 100.0).abs() < 1e-4, "line {line} ends at {extent}");
        }
    }

    #[test]
    fn unbounded_alignment_uses_the_measured_width() {
        let config = TextLayoutConfig {
            horizontal_align: HorizontalAlign::Center,
            ..config(None)
        };
        let layout = laid_out("aaaa\naa", &config);
        assert_eq!(layout.runs()[0].x(), 0.0);
        assert_eq!(layout.runs()[1].x(), 10.0);
    }

    #[test]
    fn wrapped_lines_fit_and_do_not_overlap() {
        let text = "the quick brown fox\tjumps over {SKY}the lazy{} dog and keeps running";
        let layout = laid_out(text, &config(Some(120.0)));

        for run in layout.runs() {
            assert!(run.x() + run.width() <= 120.0 + 1e-4);
        }
        for pair in layout.runs().windows(2) {
            assert!(pair[0].line_index() <= pair[1].line_index());
            if pair[0].line_index() == pair[1].line_index() {
                assert!(pair[0].x() + pair[0].width() <= pair[1].x() + 1e-4);
            }
        }
    }

    #[test]
    fn every_source_character_is_accounted_for() {
        let text = "{RED}héllo{} wörld\n\tnext {{line}} {#0F0}with{~} wrapping text";
        let layout = laid_out(text, &config(Some(70.0)));
        assert_eq!(layout.codepoint_count(), text.chars().count());
    }

    #[test]
    fn layout_is_repeatable_and_pool_independent() {
        let font = test_font();
        let text = "some {FOREST}colored{} text\nwith\ttabs and wrapping words";
        let config = config(Some(90.0));

        let mut pooled = GlyphLayout::with_markup(ColorTable::default());
        pooled.set_text(&font, text, &config);
        let first = pooled.runs().to_vec();
        pooled.reset();
        pooled.set_text(&font, text, &config);
        assert_eq!(pooled.runs(), first.as_slice());
        assert!(!pooled.pool().is_empty());

        let mut unpooled =
            GlyphLayout::with_markup(ColorTable::default()).with_pool(RunPool::unpooled());
        unpooled.set_text(&font, text, &config);
        assert_eq!(unpooled.runs(), first.as_slice());
        assert_eq!(unpooled.height(), pooled.height());
        assert_eq!(unpooled.width(), pooled.width());
        assert!(unpooled.pool().is_empty());
    }

    #[test]
    fn ranges_select_part_of_the_text() {
        let font = test_font();
        let mut layout = GlyphLayout::new();
        layout.set_text_range(&font, "xxhelloxx", 2..7, &config(None));
        assert_eq!(layout.visible_text(), "hello");

        layout.set_text_range(&font, "héllo", 2..4, &config(None));
        assert!(layout.runs().is_empty());
        assert_eq!(layout.line_count(), 1);
    }

    #[test]
    fn utf16_surrogates() {
        let font = test_font();
        let mut layout = GlyphLayout::new();
        let units = [0x61, 0xD800, 0x62];
        layout.set_text_utf16(&font, &units, 0..3, &config(None));
        assert_eq!(layout.codepoint_count(), 3);
        assert_eq!(layout.visible_text(), "ab");
        assert_eq!(layout.width(), 20.0);
    }

    #[test]
    fn reset_clears_the_result() {
        let mut layout = laid_out("a\nb", &config(None));
        layout.reset();
        assert!(layout.runs().is_empty());
        assert_eq!(layout.line_count(), 0);
        assert_eq!(layout.height(), 0.0);
        // both runs plus the spare left over from the last layout
        assert_eq!(layout.pool().len(), 3);
    }

    #[test]
    fn zero_target_width_is_unbounded() {
        let layout = laid_out("aaaa bbbb cccc", &config(Some(0.0)));
        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.width(), 140.0);
    }
}
