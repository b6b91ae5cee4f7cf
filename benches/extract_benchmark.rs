//! Performance benchmarks for the pattern extractors
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pdf_extract_server::extract::{extract_emails, extract_links, extract_page, extract_tables};
use pdf_extract_server::pdf::{Annotation, AnnotationAction, FormField, Page};

/// Page of mixed prose, contacts and a packed data block
fn synthetic_page(index: u32, paragraphs: usize) -> Page {
    let mut text = String::new();
    for i in 0..paragraphs {
        text.push_str(&format!(
            "Section {i}. For questions write to team{i}@example.com or see https://example.com/docs/{i}\n"
        ));
        text.push_str("Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n");
        if i % 4 == 0 {
            for row in 0..5 {
                text.push_str(&format!(
                    "ITEM-{row:04}-ALPHA-BRAVO-CHARLIE  {}  {}\n",
                    row * 17,
                    row * 31
                ));
            }
        }
    }

    Page {
        index,
        text,
        annotations: (0..paragraphs / 4)
            .map(|i| Annotation {
                contents: Some(format!("Reviewed by reviewer{i}@example.org")),
                subtype: Some("link".to_string()),
                action: Some(AnnotationAction {
                    uri: Some(format!("https://example.com/ref/{i}")),
                }),
            })
            .collect(),
        form_fields: (0..3)
            .map(|i| FormField {
                field_type: "text".to_string(),
                value: Some(format!("row{i}\tvalue{i}\tnote{i}")),
            })
            .collect(),
    }
}

/// Benchmark each extractor on a single page
fn bench_extractors(c: &mut Criterion) {
    let page = synthetic_page(1, 40);

    let mut group = c.benchmark_group("extractors");
    group.throughput(Throughput::Bytes(page.text.len() as u64));

    group.bench_function("emails", |b| b.iter(|| extract_emails(black_box(&page))));
    group.bench_function("links", |b| b.iter(|| extract_links(black_box(&page))));
    group.bench_function("tables", |b| b.iter(|| extract_tables(black_box(&page))));

    group.finish();
}

/// Benchmark full page extraction across document sizes
fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");

    for page_count in [1u32, 10, 100] {
        let pages: Vec<Page> = (1..=page_count).map(|i| synthetic_page(i, 20)).collect();
        group.throughput(Throughput::Elements(page_count as u64));
        group.bench_with_input(
            BenchmarkId::new("extract_page", format!("{}_pages", page_count)),
            &pages,
            |b, pages| {
                b.iter(|| {
                    for page in pages {
                        let _ = extract_page(black_box(page));
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_extractors, bench_document);
criterion_main!(benches);
