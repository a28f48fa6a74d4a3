//! Paginated document layout.
//!
//! A document is a cover page, a table of contents starting on page 2, one run
//! of pages per content block and a footer on every page but the cover.
//!
//! Section start pages are only known once the sections have been laid out,
//! so the table of contents is planned first (to learn how many pages it
//! needs), those pages are reserved, the sections are laid out while their
//! start pages are recorded, and then the reserved pages are filled in with
//! resolved links.

use crate::canvas::{Canvas, Color, Document, SectionAnchor, TextStyle};
use crate::cursor::{PageCursor, wrap};
use crate::error::{Error, Result};
use crate::metrics::{FontFace, StandardFonts, TextMeasurer};
use crate::synth::ContentBlock;
use chrono::{Local, NaiveDate};
use log::debug;
use std::sync::Arc;

/// A4 in points.
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

/// Page geometry, typography and colors.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Multiplier applied to body and label font sizes
    pub line_height: f32,
    pub cover_title_size: f32,
    pub subtitle: String,
    pub subtitle_size: f32,
    pub date_size: f32,
    pub toc_title_size: f32,
    pub toc_entry_size: f32,
    pub label_size: f32,
    pub title_size: f32,
    pub body_size: f32,
    pub source_size: f32,
    pub footer_size: f32,
    pub cover_background: Color,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    /// Date printed on the cover; today when unset
    pub generated_on: Option<NaiveDate>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: 50.0,
            line_height: 1.5,
            cover_title_size: 28.0,
            subtitle: "Deep Research Report".to_string(),
            subtitle_size: 14.0,
            date_size: 11.0,
            toc_title_size: 20.0,
            toc_entry_size: 12.0,
            label_size: 9.0,
            title_size: 18.0,
            body_size: 11.0,
            source_size: 9.0,
            footer_size: 9.0,
            cover_background: Color::rgb8(26, 41, 77),
            accent: Color::rgb8(52, 120, 246),
            text: Color::rgb8(33, 33, 33),
            muted: Color::rgb8(120, 120, 120),
            generated_on: None,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size in points.
    pub fn page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    pub fn margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Fix the cover date.
    pub fn generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = Some(date);
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    fn validate(&self) -> Result<()> {
        let sizes = [
            self.cover_title_size,
            self.toc_entry_size,
            self.title_size,
            self.body_size,
            self.label_size,
            self.source_size,
            self.footer_size,
        ];
        if sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) || self.line_height < 1.0 {
            return Err(Error::Layout("font sizes must be positive".to_string()));
        }
        if !(self.margin >= 0.0 && self.page_width > 2.0 * self.margin) {
            return Err(Error::Layout(format!(
                "margin {} leaves no room on a page {} wide",
                self.margin, self.page_width
            )));
        }
        let tallest_line = self.title_size * 1.25;
        if self.page_height - 2.0 * self.margin < tallest_line {
            return Err(Error::Layout(format!(
                "margin {} leaves no room on a page {} high",
                self.margin, self.page_height
            )));
        }
        Ok(())
    }
}

/// Width reserved at the right of each TOC row for its page number.
const TOC_NUMBER_COLUMN: f32 = 40.0;
/// Space between TOC rows.
const TOC_ROW_GAP: f32 = 4.0;
/// Smallest size the cover title shrinks to before it is cut short.
const MIN_COVER_TITLE_SIZE: f32 = 14.0;
/// Room below the cover title for the accent rule.
const COVER_RULE_SPACE: f32 = 42.0;
/// Marks text cut short to fit.
const ELLIPSIS: &str = "...";

/// One planned TOC row.
#[derive(Debug)]
struct TocRow {
    lines: Vec<String>,
    /// Offset from the first TOC page
    page_offset: usize,
    /// Top of the row
    y: f32,
}

#[derive(Debug)]
struct TocPlan {
    rows: Vec<TocRow>,
    pages: usize,
}

/// Lays out content blocks into a [`Document`].
#[derive(Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    measurer: Arc<dyn TextMeasurer>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEngine {
    /// Create an engine measuring with the standard Helvetica metrics.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            measurer: Arc::new(StandardFonts),
        }
    }

    /// Replace the text measurer.
    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the report for `topic` from `blocks`, in order.
    pub fn layout(&self, topic: &str, blocks: &[ContentBlock]) -> Result<Document> {
        self.config.validate()?;

        let mut run = LayoutRun::new(&self.config, self.measurer.as_ref(), topic);
        run.cover();

        let plan = run.plan_toc(blocks);
        let first_toc_page = run.canvas.page_count() + 1;
        for _ in 0..plan.pages {
            run.canvas.add_page();
        }

        let mut sections = Vec::with_capacity(blocks.len());
        for (index, block) in blocks.iter().enumerate() {
            let page = run.section(index, block);
            sections.push(SectionAnchor {
                title: block.title.clone(),
                page,
            });
        }

        run.draw_toc(&plan, first_toc_page, &sections);
        run.footers();

        let generated_on = run.generated_on;
        let pages = run.canvas.into_pages();
        debug!(
            "laid out '{}': {} section(s) on {} page(s)",
            topic,
            sections.len(),
            pages.len()
        );

        Ok(Document {
            title: topic.to_string(),
            page_width: self.config.page_width,
            page_height: self.config.page_height,
            generated_on,
            pages,
            sections,
        })
    }
}

/// State for one layout call. Owns the canvas and the cursor exclusively.
struct LayoutRun<'a> {
    config: &'a LayoutConfig,
    measurer: &'a dyn TextMeasurer,
    topic: &'a str,
    canvas: Canvas,
    cursor: PageCursor,
    generated_on: NaiveDate,
}

impl<'a> LayoutRun<'a> {
    fn new(config: &'a LayoutConfig, measurer: &'a dyn TextMeasurer, topic: &'a str) -> Self {
        Self {
            config,
            measurer,
            topic,
            canvas: Canvas::new(config.page_width, config.page_height),
            cursor: PageCursor::new(config.page_width, config.page_height, config.margin),
            generated_on: config
                .generated_on
                .unwrap_or_else(|| Local::now().date_naive()),
        }
    }

    fn measure(&self, text: &str, style: TextStyle) -> f32 {
        self.measurer.measure(text, style.face, style.size)
    }

    fn wrap(&self, text: &str, width: f32, style: TextStyle) -> Vec<String> {
        wrap(self.measurer, text, width, style.face, style.size)
    }

    /// Start a new page if `height` does not fit. Returns true on a break.
    fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor.ensure_space(height) {
            self.canvas.add_page();
            return true;
        }
        false
    }

    /// Draw one line at the cursor and move below it.
    fn write_line(&mut self, text: &str, style: TextStyle, line_height: f32) {
        self.ensure_space(line_height);
        let width = self.measure(text, style);
        let baseline = self.cursor.y() + style.size;
        self.canvas
            .text(self.config.margin, baseline, text, width, style);
        self.cursor.advance(line_height);
    }

    /// `text` cut at a character boundary and ended with an ellipsis so it
    /// is no wider than `max_width`.
    fn truncated(&self, text: &str, max_width: f32, style: TextStyle) -> String {
        let mut kept = text.to_string();
        loop {
            let candidate = format!("{}{}", kept.trim_end(), ELLIPSIS);
            if kept.is_empty() || self.measure(&candidate, style) <= max_width {
                return candidate;
            }
            kept.pop();
        }
    }

    /// `text` unchanged if it fits `max_width`, otherwise truncated.
    fn fitted(&self, text: &str, max_width: f32, style: TextStyle) -> String {
        if self.measure(text, style) <= max_width {
            return text.to_string();
        }
        self.truncated(text, max_width, style)
    }

    fn centered(&mut self, text: &str, baseline: f32, style: TextStyle) {
        let width = self.measure(text, style);
        let x = (self.config.page_width - width) / 2.0;
        self.canvas.text(x, baseline, text, width, style);
    }

    fn cover(&mut self) {
        let cfg = self.config;
        let (w, h) = (cfg.page_width, cfg.page_height);
        self.canvas.add_page();
        self.canvas.fill_rect(0.0, 0.0, w, h, cfg.cover_background);

        // The title block and its rule stay above the lower third.
        let lower_third = h * 2.0 / 3.0;
        let max_block = lower_third - COVER_RULE_SPACE - cfg.margin;
        let width = w - 2.0 * cfg.margin;
        let upper = self.topic.to_uppercase();

        let mut title = TextStyle::new(FontFace::Bold, cfg.cover_title_size, Color::WHITE);
        let mut lines = self.wrap(&upper, width, title);
        while lines.len() as f32 * title.size * 1.25 > max_block && title.size > MIN_COVER_TITLE_SIZE {
            title.size = (title.size - 2.0).max(MIN_COVER_TITLE_SIZE);
            lines = self.wrap(&upper, width, title);
        }

        let line_height = title.size * 1.25;
        let max_lines = ((max_block / line_height).floor() as usize).max(1);
        if lines.len() > max_lines {
            lines.truncate(max_lines);
            if let Some(last) = lines.pop() {
                lines.push(self.truncated(&last, width, title));
            }
        }
        let block_height = lines.len() as f32 * line_height;

        let mut y = ((h - block_height) / 2.0)
            .min(lower_third - COVER_RULE_SPACE - block_height)
            .max(cfg.margin);
        for line in &lines {
            self.centered(line, y + title.size, title);
            y += line_height;
        }

        let rule_y = y + 12.0;
        self.canvas
            .line((w - 80.0) / 2.0, rule_y, (w + 80.0) / 2.0, rule_y, 2.0, cfg.accent);

        let subtitle = TextStyle::new(FontFace::Regular, cfg.subtitle_size, Color::WHITE);
        self.centered(&cfg.subtitle, lower_third + cfg.subtitle_size, subtitle);

        let date = TextStyle::new(FontFace::Regular, cfg.date_size, Color::rgb(0.85, 0.87, 0.92));
        let generated = format!("Generated on {}", self.generated_on.format("%B %-d, %Y"));
        self.centered(&generated, lower_third + cfg.subtitle_size + 24.0, date);
    }

    fn toc_entry_style(&self) -> TextStyle {
        TextStyle::new(FontFace::Regular, self.config.toc_entry_size, self.config.text)
    }

    fn toc_line_height(&self) -> f32 {
        self.config.toc_entry_size * self.config.line_height
    }

    /// Top of the first TOC row on the first TOC page.
    fn toc_entries_top(&self) -> f32 {
        self.config.margin + self.config.toc_title_size + 24.0
    }

    /// Decide where every TOC row goes and how many pages the TOC needs.
    fn plan_toc(&self, blocks: &[ContentBlock]) -> TocPlan {
        let cfg = self.config;
        let style = self.toc_entry_style();
        let width = cfg.page_width - 2.0 * cfg.margin - TOC_NUMBER_COLUMN;
        let line_height = self.toc_line_height();

        let mut cursor = PageCursor::new(cfg.page_width, cfg.page_height, cfg.margin);
        cursor.advance(self.toc_entries_top() - cfg.margin);
        let mut page_offset = 0;
        let mut rows = Vec::with_capacity(blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            let mut lines = self.wrap(&format!("{}. {}", index + 1, block.title), width, style);
            if lines.is_empty() {
                lines.push(format!("{}.", index + 1));
            }
            let height = lines.len() as f32 * line_height + TOC_ROW_GAP;
            if cursor.ensure_space(height) {
                page_offset += 1;
            }
            rows.push(TocRow {
                lines,
                page_offset,
                y: cursor.y(),
            });
            cursor.advance(height);
        }

        TocPlan {
            rows,
            pages: page_offset + 1,
        }
    }

    /// Fill the reserved TOC pages now that section pages are known.
    fn draw_toc(&mut self, plan: &TocPlan, first_page: usize, sections: &[SectionAnchor]) {
        let cfg = self.config;
        self.canvas.set_page(first_page);

        let heading = TextStyle::new(FontFace::Bold, cfg.toc_title_size, cfg.text);
        let heading_width = self.measure("Table of Contents", heading);
        self.canvas.text(
            cfg.margin,
            cfg.margin + cfg.toc_title_size,
            "Table of Contents",
            heading_width,
            heading,
        );
        let rule_y = cfg.margin + cfg.toc_title_size + 10.0;
        self.canvas
            .line(cfg.margin, rule_y, cfg.page_width - cfg.margin, rule_y, 1.0, cfg.accent);

        let style = self.toc_entry_style();
        let line_height = self.toc_line_height();

        for (row, anchor) in plan.rows.iter().zip(sections) {
            self.canvas.set_page(first_page + row.page_offset);
            let target = Some(anchor.page);

            for (k, line) in row.lines.iter().enumerate() {
                let baseline = row.y + k as f32 * line_height + cfg.toc_entry_size;
                let width = self.measure(line, style);
                self.canvas
                    .text_with_link(cfg.margin, baseline, line, width, style, target);
            }

            let number = anchor.page.to_string();
            let number_width = self.measure(&number, style);
            self.canvas.text_with_link(
                cfg.page_width - cfg.margin - number_width,
                row.y + cfg.toc_entry_size,
                &number,
                number_width,
                style,
                target,
            );
        }
    }

    /// Lay out one section starting on a fresh page. Returns that page.
    fn section(&mut self, index: usize, block: &ContentBlock) -> usize {
        let cfg = self.config;
        self.canvas.add_page();
        self.cursor.reset();
        let start = self.canvas.current_page();
        let width = self.cursor.content_width();

        let label = TextStyle::new(FontFace::Bold, cfg.label_size, cfg.accent);
        self.write_line(
            &format!("SECTION {}", index + 1),
            label,
            cfg.label_size * cfg.line_height,
        );
        self.cursor.advance(4.0);

        let title = TextStyle::new(FontFace::Bold, cfg.title_size, cfg.text);
        for line in self.wrap(&block.title, width, title) {
            self.write_line(&line, title, cfg.title_size * 1.25);
        }
        self.cursor.advance(10.0);

        let body = TextStyle::new(FontFace::Regular, cfg.body_size, cfg.text);
        let body_line = cfg.body_size * cfg.line_height;
        for line in self.wrap(&block.content, width, body) {
            if line.is_empty() {
                if !self.cursor.at_top() {
                    self.cursor.advance(body_line * 0.5);
                }
                continue;
            }
            self.write_line(&line, body, body_line);
        }
        self.cursor.advance(12.0);

        let source = TextStyle::new(FontFace::Oblique, cfg.source_size, cfg.muted);
        let attribution = format!("Source: {}", block.source);
        let source_line = cfg.source_size * cfg.line_height;
        let lines = self.wrap(&attribution, width, source);
        let last = lines.len().saturating_sub(1);
        for (k, line) in lines.iter().enumerate() {
            // the last line keeps the divider below it on the same page
            if k == last {
                self.ensure_space(source_line + 8.0 + 2.0);
            }
            self.write_line(line, source, source_line);
        }
        self.cursor.advance(8.0);

        let y = self.cursor.y();
        self.canvas
            .line(cfg.margin, y, cfg.page_width - cfg.margin, y, 0.5, cfg.muted);
        self.cursor.advance(12.0);

        start
    }

    /// Stamp "{topic} - Page i of n" on every page but the cover.
    ///
    /// A topic too long for the line is truncated; the page numbers are kept.
    fn footers(&mut self) {
        let cfg = self.config;
        let total = self.canvas.page_count();
        let style = TextStyle::new(FontFace::Regular, cfg.footer_size, cfg.muted);
        let baseline = cfg.page_height - cfg.margin / 2.0;
        let width = cfg.page_width - 2.0 * cfg.margin;

        for page in 2..=total {
            self.canvas.set_page(page);
            let numbering = format!(" - Page {} of {}", page, total);
            let topic = self.fitted(self.topic, width - self.measure(&numbering, style), style);
            self.centered(&format!("{}{}", topic, numbering), baseline, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::catalog::default_stages;
    use crate::synth::synthesize;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(
            LayoutConfig::new().generated_on(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()),
        )
    }

    fn block(title: &str, content: &str) -> ContentBlock {
        ContentBlock {
            title: title.to_string(),
            content: content.to_string(),
            source: format!("Deep Research Analysis - {}", title),
        }
    }

    fn stage_blocks(topic: &str) -> Vec<ContentBlock> {
        default_stages()
            .iter()
            .map(|s| ContentBlock::for_stage(s, synthesize(topic, s)))
            .collect()
    }

    /// TOC entry links (title lines starting with "n. ") across the TOC pages.
    fn toc_entries(doc: &Document) -> Vec<(String, usize)> {
        doc.pages
            .iter()
            .flat_map(|p| p.links())
            .filter(|(text, _)| !text.chars().all(|c| c.is_ascii_digit()))
            .filter(|(text, _)| {
                text.split_once(". ")
                    .is_some_and(|(n, _)| n.chars().all(|c| c.is_ascii_digit()))
            })
            .map(|(text, page)| (text.to_string(), page))
            .collect()
    }

    fn long_text(paragraphs: usize) -> String {
        vec![
            "Long-running observations accumulate into a detailed record that spans many \
             pages once it is laid out with ordinary body typography and margins.";
            paragraphs
        ]
        .join("\n\n")
    }

    #[test]
    fn test_empty_blocks_produce_cover_and_toc() {
        let doc = engine().layout("Empty", &[]).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert!(toc_entries(&doc).is_empty());
        assert!(doc.page(2).unwrap().contains_text("Table of Contents"));
        assert!(doc.page(2).unwrap().contains_text("Empty - Page 2 of 2"));
        assert!(!doc.page(1).unwrap().texts().any(|t| t.contains(" - Page ")));
    }

    #[test]
    fn test_renewable_energy_scenario() {
        let doc = engine()
            .layout("Renewable Energy", &stage_blocks("Renewable Energy"))
            .unwrap();

        assert!(doc.page_count() >= 10);
        let entries = toc_entries(&doc);
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[2].0, "3. Current Trends");
        assert_eq!(Some(entries[2].1), doc.find_page_with_text("SECTION 3"));

        for (i, (_, page)) in entries.iter().enumerate() {
            let label = format!("SECTION {}", i + 1);
            assert_eq!(doc.find_page_with_text(&label), Some(*page));
        }
    }

    #[test]
    fn test_cover_page() {
        let doc = engine().layout("Renewable Energy", &[]).unwrap();
        let cover = doc.page(1).unwrap();

        assert!(matches!(
            cover.commands.first(),
            Some(Command::FillRect { x, y, .. }) if *x == 0.0 && *y == 0.0
        ));
        assert!(cover.contains_text("RENEWABLE ENERGY"));
        assert!(cover.contains_text("Deep Research Report"));
        assert!(cover.contains_text("Generated on May 17, 2024"));
    }

    #[test]
    fn test_long_section_spans_pages_with_single_toc_entry() {
        let blocks = vec![
            block("Long Story", &long_text(60)),
            block("Short Note", "Brief."),
        ];
        let doc = engine().layout("Archive", &blocks).unwrap();

        let entries = toc_entries(&doc);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].1, 3);

        let second_start = doc.find_page_with_text("SECTION 2").unwrap();
        assert!(second_start > 4, "long section should span several pages");
        assert_eq!(entries[1].1, second_start);
        assert_eq!(doc.sections[1].page, second_start);
        assert_eq!(doc.page_count(), second_start);
    }

    #[test]
    fn test_footers_on_every_page_but_cover() {
        let blocks = vec![block("Long Story", &long_text(40)), block("B", "b")];
        let doc = engine().layout("Topic", &blocks).unwrap();
        let total = doc.page_count();

        for n in 2..=total {
            let footer = format!("Topic - Page {} of {}", n, total);
            let page = doc.page(n).unwrap();
            assert_eq!(page.texts().filter(|t| **t == footer).count(), 1);
        }
        assert!(!doc.page(1).unwrap().texts().any(|t| t.starts_with("Topic - Page")));
    }

    #[test]
    fn test_content_stays_inside_margins() {
        let blocks = vec![block("Long Story", &long_text(50))];
        let doc = engine().layout("Bounds", &blocks).unwrap();
        let cfg = LayoutConfig::default();

        for page in &doc.pages[2..] {
            for command in &page.commands {
                if let Command::Text { y, text, .. } = command {
                    if text.contains(" - Page ") {
                        continue;
                    }
                    assert!(*y >= cfg.margin, "{} above top margin", text);
                    assert!(*y <= cfg.page_height - cfg.margin, "{} below bottom margin", text);
                }
            }
        }
    }

    #[test]
    fn test_many_entries_reserve_extra_toc_pages() {
        let blocks: Vec<ContentBlock> = (0..40)
            .map(|i| block(&format!("Topic {}", i + 1), "Short body."))
            .collect();
        let doc = engine().layout("Index", &blocks).unwrap();

        assert!(doc.page(2).unwrap().contains_text("Table of Contents"));
        let first_section = doc.find_page_with_text("SECTION 1").unwrap();
        assert_eq!(first_section, 4);
        assert_eq!(doc.page_count(), 2 + 2 + 40);

        let entries = toc_entries(&doc);
        assert_eq!(entries.len(), 40);
        for (i, (_, page)) in entries.iter().enumerate() {
            assert_eq!(*page, 4 + i);
        }
        assert!(doc.page(3).unwrap().links().iter().any(|(t, _)| t.starts_with("40. ")));
    }

    #[test]
    fn test_long_title_wraps() {
        let title = "An Unusually Long Section Title That Cannot Possibly Fit On A Single Line Of The Page";
        let doc = engine().layout("Wrap", &[block(title, "Body.")]).unwrap();
        let section = doc.page(3).unwrap();

        let title_runs: Vec<&str> = section
            .commands
            .iter()
            .filter_map(|c| match c {
                Command::Text {
                    text,
                    face: FontFace::Bold,
                    size,
                    ..
                } if *size == 18.0 => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(title_runs.len() > 1);
        assert_eq!(title_runs.join(" "), title);
    }

    #[test]
    fn test_section_ends_with_source_and_divider() {
        let doc = engine().layout("Soil", &[block("Overview", "Text.")]).unwrap();
        let page = doc.page(3).unwrap();

        assert!(page.contains_text("Source: Deep Research Analysis - Overview"));
        assert!(page.commands.iter().any(|c| matches!(c, Command::Line { .. })));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let blocks = stage_blocks("Oceans");
        let a = engine().layout("Oceans", &blocks).unwrap();
        let b = engine().layout("Oceans", &blocks).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        let engine = LayoutEngine::new(LayoutConfig::new().margin(400.0));
        assert!(matches!(engine.layout("X", &[]), Err(Error::Layout(_))));
    }

    fn long_topic() -> String {
        "Renewable Energy Systems ".repeat(20).trim_end().to_string()
    }

    /// Text runs on a page as (x, baseline, width, text).
    fn runs(page: &crate::canvas::Page) -> Vec<(f32, f32, f32, &str)> {
        page.commands
            .iter()
            .filter_map(|c| match c {
                Command::Text {
                    x, y, width, text, ..
                } => Some((*x, *y, *width, text.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_long_topic_footer_fits_page() {
        let topic = long_topic();
        let doc = engine().layout(&topic, &[block("A", "Body.")]).unwrap();
        let total = doc.page_count();
        let cfg = LayoutConfig::default();

        for n in 2..=total {
            let numbering = format!(" - Page {} of {}", n, total);
            let footers: Vec<_> = runs(doc.page(n).unwrap())
                .into_iter()
                .filter(|(_, _, _, text)| text.ends_with(&numbering))
                .collect();
            assert_eq!(footers.len(), 1, "one footer on page {}", n);

            let (x, _, width, text) = footers[0];
            assert!(x >= 0.0 && x + width <= cfg.page_width, "footer off page {}", n);
            assert!(text.starts_with("Renewable Energy Systems"));
            assert!(text.contains("..."));
        }
    }

    #[test]
    fn test_long_topic_cover_stays_on_page() {
        let doc = engine().layout(&long_topic(), &[]).unwrap();
        let cfg = LayoutConfig::default();
        let cover = doc.page(1).unwrap();

        for (x, y, width, text) in runs(cover) {
            assert!(y <= cfg.page_height - cfg.margin, "{} below the page", text);
            assert!(x >= 0.0 && x + width <= cfg.page_width, "{} off the page", text);
        }
        assert!(cover.contains_text("Deep Research Report"));
        assert!(cover.contains_text("Generated on May 17, 2024"));
    }

    #[test]
    fn test_cover_title_cut_short_on_small_page() {
        let cfg = LayoutConfig::new()
            .page_size(300.0, 300.0)
            .margin(20.0)
            .generated_on(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        let doc = LayoutEngine::new(cfg.clone()).layout(&long_topic(), &[]).unwrap();
        let cover = doc.page(1).unwrap();

        let title: Vec<&str> = cover
            .commands
            .iter()
            .filter_map(|c| match c {
                Command::Text {
                    text,
                    face: FontFace::Bold,
                    ..
                } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(title.last().is_some_and(|t| t.ends_with("...")));

        for (x, y, width, text) in runs(cover) {
            assert!(y <= cfg.page_height - cfg.margin, "{} below the page", text);
            assert!(x >= 0.0 && x + width <= cfg.page_width, "{} off the page", text);
        }
    }

    #[test]
    fn test_divider_never_alone_on_a_page() {
        // one body line per row, so the section ends at every possible height
        for lines in 1..=90 {
            let content = vec!["x"; lines].join("\n");
            let doc = engine().layout("Rule", &[block("T", &content)]).unwrap();

            for n in 3..=doc.page_count() {
                let page = doc.page(n).unwrap();
                assert!(
                    page.texts().any(|t| !t.starts_with("Rule - Page")),
                    "page {} holds only the divider ({} lines)",
                    n,
                    lines
                );
            }
        }
    }
}
