//! End-to-end report scenarios: stream, collect, lay out, serialize.

use chrono::NaiveDate;
use deep_report::{
    ContentBlock, Document, FontFace, LayoutConfig, LayoutEngine, NoRetrieval, PipelineConfig,
    ReportCollector, ReportEvent, ReportPipeline, ReportService, StandardFonts, TextMeasurer,
    default_stages, event_frames, parse_frames, serialize, suggested_filename, synthesize, wrap,
};
use futures::StreamExt;

fn pipeline() -> ReportPipeline {
    ReportPipeline::new(PipelineConfig::new().no_pacing()).with_retriever(NoRetrieval)
}

fn engine() -> LayoutEngine {
    LayoutEngine::new(LayoutConfig::new().generated_on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()))
}

/// TOC entry links as (entry text, target page).
fn toc_entries(doc: &Document) -> Vec<(String, usize)> {
    doc.pages
        .iter()
        .flat_map(|p| p.links())
        .filter(|(text, _)| {
            text.split_once(". ")
                .is_some_and(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        })
        .map(|(text, page)| (text.to_string(), page))
        .collect()
}

fn blocks(count: usize, paragraphs: usize) -> Vec<ContentBlock> {
    (0..count)
        .map(|i| ContentBlock {
            title: format!("Perspective {}", i + 1),
            content: vec![
                "A paragraph of findings that is long enough to wrap across more than one \
                 line of body text at the default page width and font size.";
                paragraphs
            ]
            .join("\n\n"),
            source: format!("Deep Research Analysis - Perspective {}", i + 1),
        })
        .collect()
}

#[tokio::test]
async fn renewable_energy_end_to_end() {
    let stream = pipeline().run("Renewable Energy").unwrap();
    let events: Vec<ReportEvent> = stream.collect().await;

    assert_eq!(events.len(), 17);
    for pair in events[..16].chunks(2) {
        assert!(matches!(pair[0], ReportEvent::Progress { .. }));
        assert!(matches!(pair[1], ReportEvent::Result { .. }));
    }
    assert_eq!(events[16], ReportEvent::Complete);

    let collector = ReportCollector::new();
    for event in &events {
        collector.record(event);
    }
    let blocks = collector.blocks();
    assert_eq!(blocks.len(), 8);

    let doc = engine().layout("Renewable Energy", &blocks).unwrap();
    assert!(doc.page_count() >= 10);

    let entries = toc_entries(&doc);
    assert_eq!(entries.len(), 8);
    assert_eq!(Some(entries[2].1), doc.find_page_with_text("SECTION 3"));

    let pdf = lopdf::Document::load_mem(&serialize(&doc).unwrap()).unwrap();
    assert_eq!(pdf.get_pages().len(), doc.page_count());
}

#[test]
fn toc_entries_resolve_for_any_block_count() {
    for count in [0, 1, 3, 8, 12] {
        let doc = engine().layout("Coverage", &blocks(count, 3)).unwrap();
        assert!(doc.page_count() >= count + 2);

        let entries = toc_entries(&doc);
        assert_eq!(entries.len(), count);
        for (i, (text, page)) in entries.iter().enumerate() {
            assert!(text.starts_with(&format!("{}. ", i + 1)));
            assert_eq!(doc.find_page_with_text(&format!("SECTION {}", i + 1)), Some(*page));
        }
    }
}

#[test]
fn multi_page_sections_shift_later_entries() {
    let mut content = blocks(3, 2);
    content[0] = blocks(1, 80).remove(0);
    let doc = engine().layout("Drift", &content).unwrap();

    let entries = toc_entries(&doc);
    assert_eq!(entries[0].1, 3);
    assert!(entries[1].1 > 4, "a long first section pushes section 2 back");
    assert_eq!(entries[2].1, entries[1].1 + 1);
}

#[test]
fn footer_on_every_page_but_cover() {
    let doc = engine().layout("Glaciers", &blocks(4, 30)).unwrap();
    let total = doc.page_count();

    assert!(!doc.page(1).unwrap().texts().any(|t| t.starts_with("Glaciers - Page")));
    for i in 2..=total {
        let footer = format!("Glaciers - Page {} of {}", i, total);
        assert!(doc.page(i).unwrap().contains_text(&footer), "missing footer on page {}", i);
    }
}

#[test]
fn zero_blocks_gives_cover_and_empty_toc() {
    let doc = engine().layout("Nothing Yet", &[]).unwrap();

    assert_eq!(doc.page_count(), 2);
    assert!(toc_entries(&doc).is_empty());
    assert!(doc.page(2).unwrap().contains_text("Nothing Yet - Page 2 of 2"));
}

#[test]
fn punctuation_topic_filename_is_never_empty() {
    let name = suggested_filename("!!!");
    assert!(!name.is_empty());
    assert!(!name.starts_with("_research"), "slug part must not be empty: {}", name);
    assert_eq!(name, suggested_filename("!!!"));
    assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.'));
}

#[test]
fn synthesized_stage_text_wraps_without_losing_words() {
    let measurer = StandardFonts;
    for stage in default_stages() {
        let text = synthesize("Urban Beekeeping", &stage);
        let lines = wrap(&measurer, &text, 495.28, FontFace::Regular, 11.0);

        for line in &lines {
            assert!(measurer.measure(line, FontFace::Regular, 11.0) <= 495.28);
        }
        let words: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        assert_eq!(words, text.split_whitespace().collect::<Vec<_>>());
    }
}

#[test]
fn service_round_trip_through_frames() {
    let service = ReportService::new(pipeline(), engine());

    let body: String = tokio_test::block_on(async {
        let stream = service.submit_report(r#"{"topic": "Deep Sea Mining"}"#).unwrap();
        event_frames(stream)
            .map(|frame| frame.unwrap())
            .collect::<Vec<String>>()
            .await
            .concat()
    });

    let events = parse_frames(&body).unwrap();
    let results: Vec<ContentBlock> = events
        .into_iter()
        .filter_map(|e| match e {
            ReportEvent::Result { result } => Some(result),
            _ => None,
        })
        .collect();
    assert_eq!(results.len(), 8);

    let request = serde_json::json!({ "topic": "Deep Sea Mining", "results": results });
    let artifact = service.generate_document(&request.to_string()).unwrap();
    assert_eq!(artifact.filename, "deep_sea_mining_research_report.pdf");
    assert_eq!(artifact.content_type, "application/pdf");

    let pdf = lopdf::Document::load_mem(&artifact.bytes).unwrap();
    assert!(pdf.get_pages().len() >= 10);
}

#[tokio::test]
async fn cancel_stops_a_paced_run() {
    let pipeline = ReportPipeline::new(
        PipelineConfig::new().pacing(std::time::Duration::from_secs(30), std::time::Duration::from_secs(30)),
    )
    .with_retriever(NoRetrieval);

    let mut stream = pipeline.run("Patience").unwrap();
    assert!(matches!(stream.next().await, Some(ReportEvent::Progress { .. })));

    tokio::time::timeout(std::time::Duration::from_secs(5), stream.cancel())
        .await
        .expect("cancel returns promptly");
}
