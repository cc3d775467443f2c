//! Library API integration tests
use retexo_core::*;

fn count_images(html: &str) -> usize {
    Document::parse_fragment(html).select("img").unwrap().len()
}

#[test]
fn test_strip_scenario() {
    let html = r#"<div><h1>T</h1><p>Text</p><img src="https://x/a.jpg"></div>"#;
    let result = strip_text_keep_images(html);

    assert_eq!(result, r#"<div><img src="https://x/a.jpg"></div>"#);
}

#[test]
fn test_structured_record_scenario() {
    let text = "Alice Origin: Greek Meaning: *pure* Popularity: #1 in 2020 Bob Origin: Latin Meaning: strong Popularity: #5";
    let records = extract_records(text);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Alice");
    assert_eq!(records[1].name, "Bob");

    let html = render_records(&records);
    assert_eq!(html.matches("<h3>").count(), 2);
    assert_eq!(html.matches("<ul>").count(), 2);
    assert_eq!(html.matches("<li>").count(), 6);
}

#[test]
fn test_slice_scenario() {
    let html = "<p>Intro</p><p>Start here: body</p><p>More</p>";
    let result = slice_from(html, "Start here").unwrap();

    assert!(result.contains("Start here: body"));
    assert!(result.contains("More"));
    assert!(!result.contains("Intro"));
}

#[test]
fn test_truncate_scenario() {
    assert_eq!(
        truncate("<p>Body</p><h2>About the Author</h2><p>Bio</p>"),
        "<p>Body</p>"
    );
}

#[test]
fn test_image_count_invariant() {
    let inputs = [
        r#"<div><p>x <img src="/a.jpg"> y</p><img src="/b.jpg"></div>"#,
        r#"<figure><img src="/a.jpg"><figcaption>cap</figcaption></figure><p>text</p>"#,
        r#"<p>no images at all</p>"#,
        r#"<img src="/a.jpg"><img src="/a.jpg"><img src="/a.jpg">"#,
    ];

    for html in inputs {
        assert_eq!(
            count_images(&strip_text_keep_images(html)),
            count_images(html),
            "input: {}",
            html
        );
    }
}

#[test]
fn test_no_orphan_text_after_strip() {
    let html = r#"<div><h2>Title</h2><p>words <img src="/a.jpg"> more</p></div><p>tail text</p>"#;
    let stripped = strip_text_keep_images(html);

    assert_eq!(Document::parse_fragment(&stripped).text_content().trim(), "");
}

#[test]
fn test_normalize_roundtrip_idempotent() {
    let inputs = [
        "<div><p>Plain paragraph content.</p><aside>side</aside></div>",
        "<article><h2>Heading</h2><p>Body with <strong>bold</strong> words.</p></article>",
        "<ul><li>one</li><li>two</li></ul>",
    ];

    for html in inputs {
        let normalized = normalize(html, &NormalizeConfig::default()).into_html();
        let once = Document::parse_fragment(&normalized).content_html();
        let twice = Document::parse_fragment(&once).content_html();
        assert_eq!(once, twice, "input: {}", html);
    }
}

#[test]
fn test_keyword_slice_containment() {
    let html = "<p>Alpha block</p><p>Beta block with marker inside</p><p>Gamma block</p>";

    let sliced = slice_from(html, "marker").unwrap();
    assert!(!sliced.is_empty());
    assert!(Document::parse_fragment(&sliced).text_content().contains("marker"));

    assert!(slice_from(html, "nonexistent token").is_none());
}

#[test]
fn test_truncation_monotonic_and_marker_free() {
    let inputs = [
        "<p>Body</p><h2>Related Posts</h2><ul><li>a</li></ul>",
        "<p>Body one</p><p>Body two</p><p>Follow us on social media</p>",
        "<p>No markers here at all</p>",
    ];

    for html in inputs {
        let result = truncate(html);
        assert!(result.len() <= html.len(), "input: {}", html);
        for marker in BOILERPLATE_MARKERS {
            assert!(
                !result.to_lowercase().contains(&marker.to_lowercase()),
                "marker '{}' survived for input: {}",
                marker,
                html
            );
        }
    }
}

#[test]
fn test_merge_image_conservation() {
    let description = "<p>The target post description paragraph.</p>";
    let body = "<p>One.</p><p>Two.</p><p>Three.</p><p>Four.</p>";
    let images = r#"<img src="/a.jpg"><img src="/b.jpg"><img src="/c.jpg">"#;

    for interleave in [true, false] {
        let config = MergeConfig { interleave_images: interleave, ..Default::default() };
        let merged = merge_with_description(description, body, images, &config);
        assert_eq!(count_images(merged.html()), 3, "interleave: {}", interleave);
    }
}

#[test]
fn test_extract_and_republish_pipeline() {
    let page = format!(
        r#"<html><head><title>Names</title></head><body>
            <h1>Best Names This Year</h1>
            <nav><a href="/">Home</a></nav>
            <article>
                {}
                <h2>About the Author</h2>
                <p>The author writes about names.</p>
            </article>
            <footer>footer</footer>
        </body></html>"#,
        "<p>A long paragraph describing naming trends in enough words to pass every length gate in the pipeline.</p>"
            .repeat(3)
    );

    let result = extract_from_html(&page, "https://example.com/names", &ExtractorConfig::default()).unwrap();
    assert_eq!(result.title, "Best Names This Year");
    assert_eq!(result.domain, "example.com");
    assert!(!result.content.contains("footer"));

    let formatted = format_for_republication(&result, None);
    assert!(!formatted.contains("About the Author"));
    assert!(formatted.contains("naming trends"));
    assert!(formatted.trim_end().ends_with("</em></p>"));
    assert!(formatted.contains(r#"<a href="https://example.com/names" target="_blank">example.com</a>"#));
}

#[test]
fn test_description_and_images_roundtrip_into_merge() {
    let target = r#"
        <p>This is the description paragraph of the target post.</p>
        <p>And the second descriptive paragraph with enough text.</p>
        <figure><img src="/keep-1.jpg"></figure>
        <p>Deep body text that the merge will replace entirely.</p>
        <img src="/keep-2.jpg">
    "#;

    let separated = separate_description_and_images(target, DEFAULT_DESCRIPTION_PARAGRAPHS);
    assert_eq!(separated.description_content.matches("<p>").count(), 2);
    assert_eq!(separated.images_content.matches("<img").count(), 2);

    let merged = merge_with_description(
        &separated.description_content,
        "<p>Fresh body from the source article.</p>",
        &separated.images_content,
        &MergeConfig::default(),
    );

    let html = merged.html();
    assert_eq!(count_images(html), 2);
    assert!(html.contains("description paragraph of the target post"));
    assert!(html.contains("Fresh body from the source article"));
}
