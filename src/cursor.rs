//! Vertical write position and text wrapping.

use crate::metrics::{FontFace, TextMeasurer};

/// Tracks where the next line goes on the current page.
///
/// Between operations `margin <= y <= page_height - margin`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    y: f32,
    page_width: f32,
    page_height: f32,
    margin: f32,
}

impl PageCursor {
    /// A cursor at the top margin.
    pub fn new(page_width: f32, page_height: f32, margin: f32) -> Self {
        Self {
            y: margin,
            page_width,
            page_height,
            margin,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    /// Lowest y content may reach.
    pub fn bottom(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Height left above the bottom margin.
    pub fn remaining(&self) -> f32 {
        (self.bottom() - self.y).max(0.0)
    }

    /// Whether nothing has been written since the last reset.
    pub fn at_top(&self) -> bool {
        self.y <= self.margin
    }

    /// Move back to the top margin of a fresh page.
    pub fn reset(&mut self) {
        self.y = self.margin;
    }

    /// Move down by `dy`, never past the bottom margin.
    pub fn advance(&mut self, dy: f32) {
        self.y = (self.y + dy.max(0.0)).min(self.bottom());
    }

    /// Make room for `required` points of content.
    ///
    /// If the content would cross the bottom margin, the cursor resets to the
    /// top and this returns true: the caller must start a new page. A cursor
    /// already at the top never breaks, so content taller than a page is
    /// placed rather than looping.
    pub fn ensure_space(&mut self, required: f32) -> bool {
        if self.at_top() || self.y + required <= self.bottom() {
            return false;
        }
        self.reset();
        true
    }
}

/// Greedily wrap `text` into lines no wider than `max_width`.
///
/// Newlines start new lines and blank lines are kept as empty strings. Words
/// are separated by single spaces in the output. A word wider than the line is
/// broken between characters; a single character wider than the line gets a
/// line of its own. Text with no visible characters yields no lines.
pub fn wrap(
    measurer: &dyn TextMeasurer,
    text: &str,
    max_width: f32,
    face: FontFace,
    size: f32,
) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let fits = |s: &str| measurer.measure(s, face, size) <= max_width;
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut current = String::new();
        let mut any_word = false;

        for word in raw.split_whitespace() {
            any_word = true;

            if !fits(word) {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                for ch in word.chars() {
                    current.push(ch);
                    if !fits(&current) && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    }
                }
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{} {}", current, word);
            if fits(&candidate) {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        if !current.is_empty() {
            lines.push(current);
        } else if !any_word {
            lines.push(String::new());
        }
    }

    lines
}
