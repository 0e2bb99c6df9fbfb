use grabber_core::{
    contains_link_marker, strip_formatting, tokenize, AnnotatedLine, Classification,
};

fn annotate(line: &str, classify: impl Fn(&str) -> Classification) -> AnnotatedLine {
    let tokens = tokenize(line);
    let mut annotated = AnnotatedLine::new(&tokens);
    for token in &tokens {
        let Some(url) = token.link() else { continue };
        if let Some(color) = classify(url).color() {
            annotated.paint(token, color);
        }
    }
    annotated
}

#[test]
fn plain_lines_have_no_marker() {
    for line in ["hello", "www.example.com", "ftp://host/file", "", "http:/x"] {
        assert!(!contains_link_marker(line), "{line}");
    }
}

#[test]
fn mixed_outcomes_paint_each_link_independently() {
    let line = "a https://ok.example/x.png b https://bad.example/y c https://page.example/";
    let annotated = annotate(line, |url| {
        if url.starts_with("https://ok") {
            Classification::VerifiedImage
        } else if url.starts_with("https://bad") {
            Classification::RejectedNetworkError
        } else {
            Classification::NotALink
        }
    });

    assert_eq!(annotated.painted_count(), 2);
    let rendered = annotated.render();
    assert!(rendered.contains("\x0303https://ok.example/x.png\x03"));
    assert!(rendered.contains("\x0304https://bad.example/y\x03"));
    assert!(rendered.ends_with(" c https://page.example/"));
    assert_eq!(strip_formatting(&rendered), line);
}
