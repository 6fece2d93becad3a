//! Turns source text into the codepoint tokens consumed by the run builder.

use std::ops::Range;

/// Decodes `text[range]` into `out`.
///
/// An invalid byte range is reported and produces no codepoints.
pub(crate) fn decode_str(text: &str, range: Range<usize>, out: &mut Vec<char>) {
    out.clear();
    match text.get(range.clone()) {
        Some(slice) => out.extend(slice.chars()),
        None => log::warn!(
            "byte range {range:?} is not valid for a {} byte string, laying out nothing",
            text.len()
        ),
    }
}

/// Decodes UTF-16 `units[range]` into `out`.
///
/// Unpaired surrogates are reported and replaced with `'\0'`, which the layout
/// treats as an invisible placeholder.
pub(crate) fn decode_utf16(units: &[u16], range: Range<usize>, out: &mut Vec<char>) {
    out.clear();
    let Some(slice) = units.get(range.clone()) else {
        log::warn!(
            "unit range {range:?} is not valid for {} UTF-16 units, laying out nothing",
            units.len()
        );
        return;
    };

    let mut index = range.start;
    for decoded in char::decode_utf16(slice.iter().copied()) {
        match decoded {
            Ok(ch) => {
                index += ch.len_utf16();
                out.push(ch);
            }
            Err(err) => {
                log::warn!(
                    "dangling surrogate {:#06x} at index {index}",
                    err.unpaired_surrogate()
                );
                index += 1;
                out.push('\0');
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// A codepoint to place as-is, including `'\n'` and `'\t'`.
    Codepoint(char),
    /// `{{` or `}}`, standing for a single literal brace.
    EscapedBrace(char),
    /// A closed tag; `content` excludes the braces, `len` includes them.
    Tag { content: &'a [char], len: usize },
}

/// Splits decoded codepoints into tokens, recognizing markup when enabled.
#[derive(Debug)]
pub(crate) struct Scanner<'a> {
    codepoints: &'a [char],
    pos: usize,
    markup: bool,
    tag_start: Option<usize>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(codepoints: &'a [char], markup: bool) -> Self {
        Self {
            codepoints,
            pos: 0,
            markup,
            tag_start: None,
        }
    }

    /// Undoes the tag returned by the last call to `next`.
    ///
    /// The caller places the open brace literally and scanning resumes right
    /// after it, so the tag content shows up as text.
    pub(crate) fn reject_tag(&mut self) {
        if let Some(start) = self.tag_start.take() {
            self.pos = start + 1;
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let codepoints = self.codepoints;
        let start = self.pos;
        let ch = *codepoints.get(start)?;
        self.pos += 1;
        self.tag_start = None;

        if !self.markup {
            return Some(Token::Codepoint(ch));
        }

        match (ch, codepoints.get(start + 1)) {
            ('{', Some('{')) | ('}', Some('}')) => {
                self.pos += 1;
                Some(Token::EscapedBrace(ch))
            }
            ('{', Some(_)) => {
                let rest = &codepoints[start + 1..];
                match rest.iter().position(|&c| c == '}') {
                    Some(close) => {
                        self.pos = start + close + 2;
                        self.tag_start = Some(start);
                        Some(Token::Tag {
                            content: &rest[..close],
                            len: close + 2,
                        })
                    }
                    // never closed, the brace is plain text
                    None => Some(Token::Codepoint(ch)),
                }
            }
            _ => Some(Token::Codepoint(ch)),
        }
    }
}
