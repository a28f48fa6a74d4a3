//! Drawing surface and laid-out document model.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page and y growing downward. Text positions are baselines. The emitter
//! flips y when writing PDF.

use crate::metrics::FontFace;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Color,
        /// Measured width, kept for link hit areas
        width: f32,
        /// 1-based page this run links to
        link: Option<usize>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Color,
    },
}

/// One page: an ordered list of draw commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub commands: Vec<Command>,
}

impl Page {
    /// Every text run on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            Command::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether any text run equals `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    /// Text runs carrying a page link, with their targets.
    pub fn links(&self) -> Vec<(&str, usize)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Text {
                    text,
                    link: Some(target),
                    ..
                } => Some((text.as_str(), *target)),
                _ => None,
            })
            .collect()
    }
}

/// A section's position in the finished document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAnchor {
    pub title: String,
    /// 1-based page the section starts on
    pub page: usize,
}

/// A laid-out document, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub generated_on: NaiveDate,
    pub pages: Vec<Page>,
    pub sections: Vec<SectionAnchor>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page by 1-based index.
    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    /// 1-based index of the first page containing a text run equal to `needle`.
    pub fn find_page_with_text(&self, needle: &str) -> Option<usize> {
        self.pages
            .iter()
            .position(|p| p.contains_text(needle))
            .map(|i| i + 1)
    }
}

/// Text style for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(face: FontFace, size: f32, color: Color) -> Self {
        Self { face, size, color }
    }
}

/// Recording drawing surface.
///
/// Commands go to the current page. Pages can be revisited with
/// [`Canvas::set_page`] to draw on them after later pages exist.
#[derive(Debug)]
pub struct Canvas {
    width: f32,
    height: f32,
    pages: Vec<Page>,
    current: usize,
}

impl Canvas {
    /// An empty canvas; call [`Canvas::add_page`] before drawing.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pages: Vec::new(),
            current: 0,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based index of the page being drawn on.
    pub fn current_page(&self) -> usize {
        self.current + 1
    }

    /// Append a page and make it current. Returns its 1-based index.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        self.current = self.pages.len() - 1;
        self.pages.len()
    }

    /// Make an existing page current. Returns false if it does not exist.
    pub fn set_page(&mut self, number: usize) -> bool {
        if number == 0 || number > self.pages.len() {
            return false;
        }
        self.current = number - 1;
        true
    }

    fn push(&mut self, command: Command) {
        if self.pages.is_empty() {
            self.add_page();
        }
        self.pages[self.current].commands.push(command);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.push(Command::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    /// Draw a text run with its baseline at `y`. `width` is its measured width.
    pub fn text(&mut self, x: f32, y: f32, text: &str, width: f32, style: TextStyle) {
        self.text_with_link(x, y, text, width, style, None);
    }

    /// Draw a text run that links to a 1-based page.
    pub fn text_with_link(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        width: f32,
        style: TextStyle,
        link: Option<usize>,
    ) {
        self.push(Command::Text {
            x,
            y,
            text: text.to_string(),
            face: style.face,
            size: style.size,
            color: style.color,
            width,
            link,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color) {
        self.push(Command::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }

    /// Finish drawing.
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
