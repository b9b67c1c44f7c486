//! Benchmarks for unblank parsing and detection performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic body XML with alternating text and
//! empty pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unblank::detector::{scan, segment, DetectOptions};
use unblank::excise::{excise_selection, Selection};
use unblank::parser::parse;
use unblank::render::serialize;

/// Creates a main document part with the given number of pages.
///
/// Every third page holds only empty paragraphs.
fn create_test_body(page_count: usize) -> Vec<u8> {
    let mut body = String::new();
    body.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    body.push_str("\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>");

    for i in 0..page_count {
        for line in 0..20 {
            if i % 3 == 2 {
                body.push_str("\n<w:p><w:pPr><w:spacing w:after=\"0\"/></w:pPr></w:p>");
            } else {
                body.push_str(&format!(
                    "\n<w:p><w:pPr><w:jc w:val=\"both\"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">Page {} line {} of benchmark content. </w:t></w:r><w:bookmarkStart w:id=\"{}\" w:name=\"b\"/><w:bookmarkEnd w:id=\"{}\"/></w:p>",
                    i + 1, line, line, line
                ));
            }
        }
        if i + 1 < page_count {
            body.push_str("\n<w:p><w:r><w:lastRenderedPageBreak/><w:br w:type=\"page\"/></w:r></w:p>");
        }
    }

    body.push_str("\n<w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\"/></w:sectPr></w:body></w:document>");
    body.into_bytes()
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("body_parsing");

    for page_count in [10, 100, 500] {
        let data = create_test_body(page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| parse(black_box(&data)))
        });
    }

    group.finish();
}

fn bench_detection(c: &mut Criterion) {
    let doc = match parse(&create_test_body(100)) {
        Ok(doc) => doc,
        Err(e) => panic!("benchmark body does not parse: {}", e),
    };
    let options = DetectOptions::new().with_blank_runs(true);

    c.bench_function("segment_100_pages", |b| b.iter(|| segment(black_box(&doc))));
    c.bench_function("scan_100_pages", |b| {
        b.iter(|| scan(black_box(&doc), black_box(&options)))
    });
}

fn bench_clean(c: &mut Criterion) {
    let doc = match parse(&create_test_body(100)) {
        Ok(doc) => doc,
        Err(e) => panic!("benchmark body does not parse: {}", e),
    };

    c.bench_function("excise_and_serialize_100_pages", |b| {
        b.iter(|| {
            excise_selection(black_box(&doc), &Selection::All).and_then(|d| serialize(&d))
        })
    });
}

criterion_group!(benches, bench_parsing, bench_detection, bench_clean);
criterion_main!(benches);
