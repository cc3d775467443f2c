use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use retexo_core::{
    ExtractorConfig, MergeConfig, NormalizeConfig, extract_from_html, merge_with_description, normalize,
    strip_text_keep_images,
};

fn synthetic_page(paragraphs: usize) -> String {
    let body: String = (0..paragraphs)
        .map(|i| {
            format!(
                r#"<p>Paragraph {} of the synthetic article, padded with enough prose to look like scraped content. <img src="/img-{}.jpg"></p>"#,
                i, i
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Bench</title></head><body>
            <nav><a href="/">Home</a><a href="/about">About</a></nav>
            <article class="post-content">{}</article>
            <footer>footer text</footer>
        </body></html>"#,
        body
    )
}

fn bench_extraction(c: &mut Criterion) {
    let config = ExtractorConfig::default();
    let mut group = c.benchmark_group("extract");

    for size in [10usize, 100, 500] {
        let page = synthetic_page(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &page, |b, html| {
            b.iter(|| extract_from_html(black_box(html), "https://example.com/post", &config))
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let region = synthetic_page(100);
    let config = NormalizeConfig::default();

    c.bench_function("normalize", |b| b.iter(|| normalize(black_box(&region), &config)));
}

fn bench_strip(c: &mut Criterion) {
    let content = synthetic_page(100);

    c.bench_function("strip_text_keep_images", |b| {
        b.iter(|| strip_text_keep_images(black_box(&content)))
    });
}

fn bench_merge(c: &mut Criterion) {
    let description = "<p>Target description paragraph kept ahead of the merged body.</p>";
    let body: String = (0..50).map(|i| format!("<p>Source paragraph {}.</p>", i)).collect();
    let images: String = (0..10).map(|i| format!(r#"<img src="/img-{}.jpg">"#, i)).collect();
    let config = MergeConfig::default();

    c.bench_function("merge_with_description", |b| {
        b.iter(|| merge_with_description(black_box(description), black_box(&body), black_box(&images), &config))
    });
}

criterion_group!(benches, bench_extraction, bench_normalize, bench_strip, bench_merge);
criterion_main!(benches);
