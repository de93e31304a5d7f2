//! Plain text that flows from a text block into overflow columns.
//!
//! Text is wrapped greedily at whitespace with a fixed advance per character. Words longer than
//! a line are broken at the line width. Runs of whitespace at the start of a line (including
//! line breaks) are skipped, so blank lines collapse.

use crate::element::{ColumnTemplate, ElementId, Flow};
use cgmath::Vector2;
use std::ops::Range;
use std::sync::Arc;

/// Fixed text metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Horizontal advance of every character.
    pub char_width: f64,
    pub line_height: f64,
}

/// Text shared by a text block and its overflow columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSource {
    text: String,
    metrics: TextMetrics,
}

impl TextSource {
    /// Creates a text source. Non-positive metrics are raised to the smallest positive value.
    pub fn new<S: Into<String>>(text: S, metrics: TextMetrics) -> Arc<TextSource> {
        Arc::new(TextSource {
            text: text.into(),
            metrics: TextMetrics {
                char_width: metrics.char_width.max(f64::MIN_POSITIVE),
                line_height: metrics.line_height.max(f64::MIN_POSITIVE),
            },
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metrics(&self) -> TextMetrics {
        self.metrics
    }
}

/// A single wrapped line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    range: Range<usize>,
    chars: usize,
}

/// Wraps the line that starts at byte offset `pos`. Returns `None` if only whitespace is left.
fn wrap_line(text: &str, pos: usize, max_chars: usize) -> Option<Line> {
    let rest = &text[pos..];
    let start = pos + (rest.len() - rest.trim_start().len());
    if start == text.len() {
        return None;
    }

    let mut chars = 0;
    let mut end = start;
    let mut iter = text[start..]
        .char_indices()
        .map(|(i, c)| (start + i, c))
        .peekable();

    loop {
        let mut gap = 0;
        let mut word_start = None;
        while let Some(&(i, c)) = iter.peek() {
            if c == '\n' {
                return Some(Line {
                    range: start..end,
                    chars,
                });
            } else if c.is_whitespace() {
                gap += 1;
                iter.next();
            } else {
                word_start = Some(i);
                break;
            }
        }
        let word_start = match word_start {
            Some(i) => i,
            None => {
                return Some(Line {
                    range: start..end,
                    chars,
                })
            }
        };

        let mut word_chars = 0;
        let mut word_end = word_start;
        while let Some(&(i, c)) = iter.peek() {
            if c.is_whitespace() {
                break;
            }
            word_chars += 1;
            word_end = i + c.len_utf8();
            iter.next();
        }

        let needed = if chars == 0 {
            word_chars
        } else {
            chars + gap + word_chars
        };
        if needed <= max_chars {
            chars = needed;
            end = word_end;
            continue;
        }

        if chars == 0 {
            // the word doesn’t fit on a line of its own; break it (taking at least one char)
            let take = max_chars.max(1);
            let split = text[word_start..]
                .char_indices()
                .nth(take)
                .map_or(word_end, |(i, _)| word_start + i);
            return Some(Line {
                range: start..split,
                chars: take,
            });
        }

        return Some(Line {
            range: start..end,
            chars,
        });
    }
}

/// Result of laying out text into a box.
#[derive(Debug, Clone, Default, PartialEq)]
struct Frame {
    lines: Vec<Line>,
    overflow: Option<usize>,
}

impl Frame {
    fn layout(source: &TextSource, from: usize, max_width: f64, max_height: f64) -> Frame {
        let metrics = source.metrics;
        let text = &source.text;
        // float to int casts saturate, so infinite sizes become usize::MAX
        let max_chars = (max_width / metrics.char_width).floor() as usize;
        let max_lines = (max_height / metrics.line_height).floor() as usize;

        let mut pos = from.min(text.len());
        while !text.is_char_boundary(pos) {
            pos -= 1;
        }

        let mut lines = Vec::new();
        while lines.len() < max_lines {
            match wrap_line(text, pos, max_chars) {
                Some(line) => {
                    pos = line.range.end;
                    lines.push(line);
                }
                None => break,
            }
        }

        let overflow = if text[pos..].trim_start().is_empty() {
            None
        } else {
            Some(pos)
        };
        Frame { lines, overflow }
    }

    fn widest(&self) -> usize {
        self.lines.iter().map(|line| line.chars).max().unwrap_or(0)
    }

    fn height(&self, metrics: TextMetrics) -> f64 {
        self.lines.len() as f64 * metrics.line_height
    }
}

/// The primary text element.
///
/// Without a fixed width, text wraps at the available width and the block is as wide as its
/// widest line.
#[derive(Debug, Clone)]
pub struct TextBlock {
    source: Arc<TextSource>,
    width: Option<f64>,
    frame: Frame,
    overflow_target: Option<ElementId>,
}

impl TextBlock {
    pub fn new(source: Arc<TextSource>) -> TextBlock {
        TextBlock {
            source,
            width: None,
            frame: Frame::default(),
            overflow_target: None,
        }
    }

    /// Fixes the block’s width.
    pub fn with_width(mut self, width: f64) -> TextBlock {
        self.width = Some(width.max(0.));
        self
    }

    pub fn source(&self) -> &Arc<TextSource> {
        &self.source
    }

    /// Replaces the text. The block needs to be measured again.
    pub fn set_source(&mut self, source: Arc<TextSource>) {
        self.source = source;
        self.frame = Frame::default();
    }

    /// Lines shown after the last measure pass.
    pub fn lines(&self) -> Vec<&str> {
        shown_lines(&self.source, &self.frame)
    }

    pub fn overflow_target(&self) -> Option<ElementId> {
        self.overflow_target
    }
}

impl Flow for TextBlock {
    type Cursor = TextCursor;

    fn measure(&mut self, available: Vector2<f64>, from: Option<TextCursor>) {
        let wrap_width = self.width.unwrap_or(available.x);
        let offset = match from {
            Some(cursor) => {
                self.source = cursor.source;
                cursor.offset
            }
            None => 0,
        };
        self.frame = Frame::layout(&self.source, offset, wrap_width, available.y);
    }

    fn desired_size(&self) -> Vector2<f64> {
        let metrics = self.source.metrics;
        let width = self
            .width
            .unwrap_or(self.frame.widest() as f64 * metrics.char_width);
        Vector2::new(width, self.frame.height(metrics))
    }

    fn overflow(&self) -> Option<TextCursor> {
        self.frame.overflow.map(|offset| TextCursor {
            source: Arc::clone(&self.source),
            offset,
        })
    }

    fn set_overflow_target(&mut self, target: Option<ElementId>) {
        self.overflow_target = target;
    }
}

/// Where unshown text resumes: a byte offset into a particular source.
///
/// Columns read the text from the cursor they are measured with, so they always continue the
/// text their predecessor was showing, even after it was replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCursor {
    pub source: Arc<TextSource>,
    pub offset: usize,
}

/// A fixed-width column showing text that didn’t fit into the previous element.
#[derive(Debug, Clone)]
pub struct TextOverflow {
    /// Text received with the last measure pass.
    source: Option<Arc<TextSource>>,
    width: f64,
    from: usize,
    frame: Frame,
    overflow_target: Option<ElementId>,
}

impl TextOverflow {
    pub fn new(width: f64) -> TextOverflow {
        TextOverflow {
            source: None,
            width: width.max(0.),
            from: 0,
            frame: Frame::default(),
            overflow_target: None,
        }
    }

    /// Where this column’s text starts.
    pub fn start(&self) -> usize {
        self.from
    }

    pub fn lines(&self) -> Vec<&str> {
        match &self.source {
            Some(source) => shown_lines(source, &self.frame),
            None => Vec::new(),
        }
    }

    pub fn overflow_target(&self) -> Option<ElementId> {
        self.overflow_target
    }
}

impl Flow for TextOverflow {
    type Cursor = TextCursor;

    /// A column measured without a cursor has nothing to show.
    fn measure(&mut self, available: Vector2<f64>, from: Option<TextCursor>) {
        match from {
            Some(cursor) => {
                self.from = cursor.offset;
                self.frame = Frame::layout(&cursor.source, cursor.offset, self.width, available.y);
                self.source = Some(cursor.source);
            }
            None => {
                self.from = 0;
                self.frame = Frame::default();
                self.source = None;
            }
        }
    }

    fn desired_size(&self) -> Vector2<f64> {
        let height = self
            .source
            .as_ref()
            .map_or(0., |source| self.frame.height(source.metrics));
        Vector2::new(self.width, height)
    }

    fn overflow(&self) -> Option<TextCursor> {
        let source = self.source.as_ref()?;
        self.frame.overflow.map(|offset| TextCursor {
            source: Arc::clone(source),
            offset,
        })
    }

    fn set_overflow_target(&mut self, target: Option<ElementId>) {
        self.overflow_target = target;
    }
}

/// Creates [`TextOverflow`] columns of a fixed width.
#[derive(Debug, Clone, Copy)]
pub struct TextOverflowTemplate {
    pub width: f64,
}

impl ColumnTemplate<TextOverflow> for TextOverflowTemplate {
    fn instantiate(&self) -> TextOverflow {
        TextOverflow::new(self.width)
    }
}

fn shown_lines<'a>(source: &'a TextSource, frame: &Frame) -> Vec<&'a str> {
    frame
        .lines
        .iter()
        .map(|line| &source.text[line.range.clone()])
        .collect()
}
