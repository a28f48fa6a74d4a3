//! PDF serialization of laid-out documents.
//!
//! Text uses the base-14 Helvetica faces with WinAnsiEncoding, so the output
//! needs no embedded fonts. Characters outside that encoding are written as
//! `?`.

use crate::canvas::{Color, Command, Document, Page};
use crate::error::Result;
use crate::metrics::FontFace;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as PdfDocument, Object, ObjectId, Stream, StringFormat, dictionary};
use regex::Regex;
use std::sync::LazyLock;

/// Content type of serialized documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Appended to every suggested filename.
pub const FILENAME_SUFFIX: &str = "_research_report.pdf";

const PRODUCER: &str = "deep-report";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Filesystem-safe filename for a report on `topic`.
///
/// The topic is lower-cased and every run of characters other than ASCII
/// letters and digits becomes one `_`. A topic with no such characters still
/// yields a separator, so the name is never just the suffix.
pub fn suggested_filename(topic: &str) -> String {
    let lowered = topic.to_lowercase();
    let mut slug = NON_ALPHANUMERIC.replace_all(&lowered, "_").into_owned();
    if slug.is_empty() {
        slug.push('_');
    }
    format!("{}{}", slug, FILENAME_SUFFIX)
}

/// Serialize a document to PDF bytes.
pub fn serialize(document: &Document) -> Result<Vec<u8>> {
    let mut pdf = PdfDocument::with_version("1.5");
    let height = document.page_height;

    let pages_id = pdf.new_object_id();
    let page_ids: Vec<ObjectId> = document.pages.iter().map(|_| pdf.new_object_id()).collect();

    let mut fonts = Dictionary::new();
    for face in FontFace::ALL {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = pdf.add_object(dictionary! { "Font" => fonts });

    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        document.page_width.into(),
        document.page_height.into(),
    ];

    for (page, page_id) in document.pages.iter().zip(&page_ids) {
        let content = page_content(page, height).encode()?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content));

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        };

        let annots: Vec<Object> = link_annotations(page, height, &page_ids)
            .into_iter()
            .map(|annot| pdf.add_object(annot).into())
            .collect();
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }

        pdf.objects.insert(*page_id, Object::Dictionary(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| (*id).into()).collect();
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if let Some(outlines_id) = add_outline(&mut pdf, document, &page_ids) {
        catalog.set("Outlines", outlines_id);
        catalog.set("PageMode", "UseOutlines");
    }
    let catalog_id = pdf.add_object(catalog);
    pdf.trailer.set("Root", catalog_id);

    let info_id = pdf.add_object(dictionary! {
        "Title" => text_string(&document.title),
        "Producer" => text_string(PRODUCER),
        "CreationDate" => text_string(&format!(
            "D:{}000000Z",
            document.generated_on.format("%Y%m%d")
        )),
    });
    pdf.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Encode text as WinAnsi bytes.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{00A0}'..='\u{00FF}' => ch as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

fn text_string(text: &str) -> Object {
    Object::String(win_ansi(text), StringFormat::Literal)
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![color.r.into(), color.g.into(), color.b.into()]
}

/// Content stream for one page, flipping y to PDF's bottom-left origin.
fn page_content(page: &Page, height: f32) -> Content {
    let mut operations = Vec::new();

    for command in &page.commands {
        match command {
            Command::FillRect {
                x,
                y,
                width,
                height: h,
                color,
            } => {
                operations.push(Operation::new("rg", color_operands(*color)));
                operations.push(Operation::new(
                    "re",
                    vec![(*x).into(), (height - y - h).into(), (*width).into(), (*h).into()],
                ));
                operations.push(Operation::new("f", vec![]));
            }
            Command::Text {
                x,
                y,
                text,
                face,
                size,
                color,
                ..
            } => {
                operations.push(Operation::new("rg", color_operands(*color)));
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(face.resource_name().as_bytes().to_vec()), (*size).into()],
                ));
                operations.push(Operation::new("Td", vec![(*x).into(), (height - y).into()]));
                operations.push(Operation::new("Tj", vec![text_string(text)]));
                operations.push(Operation::new("ET", vec![]));
            }
            Command::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                operations.push(Operation::new("RG", color_operands(*color)));
                operations.push(Operation::new("w", vec![(*width).into()]));
                operations.push(Operation::new("m", vec![(*x1).into(), (height - y1).into()]));
                operations.push(Operation::new("l", vec![(*x2).into(), (height - y2).into()]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }

    Content { operations }
}

/// Link annotations for every linked text run whose target page exists.
fn link_annotations(page: &Page, height: f32, page_ids: &[ObjectId]) -> Vec<Dictionary> {
    page.commands
        .iter()
        .filter_map(|command| match command {
            Command::Text {
                x,
                y,
                size,
                width,
                link: Some(target),
                ..
            } => {
                let target_id = target.checked_sub(1).and_then(|i| page_ids.get(i))?;
                let baseline = height - y;
                let rect: Vec<Object> = vec![
                    (*x).into(),
                    (baseline - size * 0.25).into(),
                    (x + width).into(),
                    (baseline + size * 0.9).into(),
                ];
                Some(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => rect,
                    "Border" => vec![0.into(), 0.into(), 0.into()],
                    "Dest" => vec![(*target_id).into(), "Fit".into()],
                })
            }
            _ => None,
        })
        .collect()
}

/// Bookmark tree with one entry per section. None when there are no sections.
fn add_outline(pdf: &mut PdfDocument, document: &Document, page_ids: &[ObjectId]) -> Option<ObjectId> {
    let entries: Vec<(&str, ObjectId)> = document
        .sections
        .iter()
        .filter_map(|s| {
            let id = s.page.checked_sub(1).and_then(|i| page_ids.get(i))?;
            Some((s.title.as_str(), *id))
        })
        .collect();
    if entries.is_empty() {
        return None;
    }

    let outlines_id = pdf.new_object_id();
    let item_ids: Vec<ObjectId> = entries.iter().map(|_| pdf.new_object_id()).collect();

    for (i, ((title, page_id), item_id)) in entries.iter().zip(&item_ids).enumerate() {
        let mut item = dictionary! {
            "Title" => text_string(title),
            "Parent" => outlines_id,
            "Dest" => vec![(*page_id).into(), "Fit".into()],
        };
        if i > 0 {
            item.set("Prev", item_ids[i - 1]);
        }
        if let Some(next) = item_ids.get(i + 1) {
            item.set("Next", *next);
        }
        pdf.objects.insert(*item_id, Object::Dictionary(item));
    }

    pdf.objects.insert(
        outlines_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => item_ids[0],
            "Last" => item_ids[item_ids.len() - 1],
            "Count" => item_ids.len() as i64,
        }),
    );
    Some(outlines_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutConfig, LayoutEngine};
    use crate::synth::ContentBlock;
    use chrono::NaiveDate;

    fn document(topic: &str, sections: usize) -> Document {
        let blocks: Vec<ContentBlock> = (0..sections)
            .map(|i| ContentBlock {
                title: format!("Part {}", i + 1),
                content: "Some body text.".to_string(),
                source: "Deep Research Analysis - Part".to_string(),
            })
            .collect();
        LayoutEngine::new(
            LayoutConfig::new().generated_on(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()),
        )
        .layout(topic, &blocks)
        .unwrap()
    }

    fn dict<'a>(pdf: &'a PdfDocument, object: &Object) -> &'a Dictionary {
        pdf.get_dictionary(object.as_reference().unwrap()).unwrap()
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(
            suggested_filename("Renewable Energy"),
            "renewable_energy_research_report.pdf"
        );
        assert_eq!(
            suggested_filename("C++ & Rust: 2024!"),
            "c_rust_2024__research_report.pdf"
        );
        assert_eq!(
            suggested_filename("Café Society"),
            "caf_society_research_report.pdf"
        );
    }

    #[test]
    fn test_suggested_filename_punctuation_only() {
        let name = suggested_filename("!!!");
        assert_eq!(name, "__research_report.pdf");
        assert_eq!(suggested_filename("!!!"), name);
    }

    #[test]
    fn test_serialized_page_count_matches_layout() {
        let doc = document("Renewable Energy", 3);
        let bytes = serialize(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let pdf = PdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), doc.page_count());
    }

    #[test]
    fn test_section_label_is_in_content_stream() {
        let doc = document("Soil", 2);
        let pdf = PdfDocument::load_mem(&serialize(&doc).unwrap()).unwrap();
        let pages = pdf.get_pages();

        let raw = pdf.get_page_content(pages[&4]).unwrap();
        let content = Content::decode(&raw).unwrap();
        let shown: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first()?.as_str().ok().map(|s| s.to_vec()))
            .collect();
        assert!(shown.contains(&b"SECTION 2".to_vec()));
        assert!(shown.contains(&b"Soil - Page 4 of 4".to_vec()));
    }

    #[test]
    fn test_toc_links_resolve_to_section_pages() {
        let doc = document("Links", 2);
        let pdf = PdfDocument::load_mem(&serialize(&doc).unwrap()).unwrap();
        let pages = pdf.get_pages();

        let toc = pdf.get_dictionary(pages[&2]).unwrap();
        let annots = toc.get(b"Annots").unwrap().as_array().unwrap();
        // title and page number for each entry
        assert_eq!(annots.len(), 4);

        let first = dict(&pdf, &annots[0]);
        let dest = first.get(b"Dest").unwrap().as_array().unwrap();
        assert_eq!(dest[0].as_reference().unwrap(), pages[&3]);
        assert!(pdf.get_dictionary(pages[&1]).unwrap().get(b"Annots").is_err());
    }

    #[test]
    fn test_outline_and_info() {
        let doc = document("Bookmarks", 3);
        let pdf = PdfDocument::load_mem(&serialize(&doc).unwrap()).unwrap();

        let catalog = dict(&pdf, pdf.trailer.get(b"Root").unwrap());
        let outlines = dict(&pdf, catalog.get(b"Outlines").unwrap());
        assert_eq!(outlines.get(b"Count").unwrap().as_i64().unwrap(), 3);
        let first = dict(&pdf, outlines.get(b"First").unwrap());
        assert_eq!(first.get(b"Title").unwrap().as_str().unwrap(), b"Part 1");

        let info = dict(&pdf, pdf.trailer.get(b"Info").unwrap());
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Bookmarks");
        assert_eq!(
            info.get(b"CreationDate").unwrap().as_str().unwrap(),
            b"D:20240517000000Z"
        );
    }

    #[test]
    fn test_no_outline_without_sections() {
        let doc = document("Empty", 0);
        let pdf = PdfDocument::load_mem(&serialize(&doc).unwrap()).unwrap();
        let catalog = dict(&pdf, pdf.trailer.get(b"Root").unwrap());
        assert!(catalog.get(b"Outlines").is_err());
        assert_eq!(pdf.get_pages().len(), 2);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(win_ansi("Aé—"), vec![b'A', 0xE9, 0x97]);
        assert_eq!(win_ansi("日本"), b"??".to_vec());
    }
}
