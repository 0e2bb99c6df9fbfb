use url::Url;

/// Characters Windows refuses in a path segment.
pub const ILLEGAL_FILENAME_CHARACTERS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

const FALLBACK_FILENAME: &str = "image";

/// Remove every character that cannot appear in a Windows path segment.
pub fn sanitize_filename(input: &str) -> String {
    sanitize_filename_with(input, "")
}

/// Replace every illegal character with `replacement`.
///
/// Illegal characters inside `replacement` itself are dropped, so the result
/// never contains one and sanitizing twice changes nothing.
pub fn sanitize_filename_with(input: &str, replacement: &str) -> String {
    let replacement: String = replacement.chars().filter(|c| !is_illegal(*c)).collect();
    let mut cleaned = String::with_capacity(input.len());
    for c in input.chars() {
        if is_illegal(c) {
            cleaned.push_str(&replacement);
        } else {
            cleaned.push(c);
        }
    }
    cleaned
}

pub fn is_illegal(c: char) -> bool {
    ILLEGAL_FILENAME_CHARACTERS.contains(&c) || c.is_control()
}

/// A sanitized directory name that cannot climb out of its parent:
/// `""`, `.` and `..` become `_`.
pub fn path_segment(raw: &str) -> String {
    let cleaned = sanitize_filename(raw);
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// Filename for a direct download: the last path segment of `url`, without
/// query or fragment, sanitized. Falls back to `image` when nothing is left.
pub fn filename_from_url(url: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => {
            let without_fragment = url.split('#').next().unwrap_or(url);
            let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
            without_query.rsplit('/').next().unwrap_or_default().to_string()
        }
    };
    let sanitized = sanitize_filename(&segment);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_segments_are_neutralised() {
        assert_eq!(path_segment(".."), "_");
        assert_eq!(path_segment("."), "_");
        assert_eq!(path_segment(""), "_");
        assert_eq!(path_segment("/"), "_");
        assert_eq!(path_segment("..."), "...");
        assert_eq!(path_segment("a:b"), "ab");
    }

    #[test]
    fn removes_every_illegal_character() {
        assert_eq!(sanitize_filename(r#"a\b/c:d*e?f"g<h>i|j"#), "abcdefghij");
        assert_eq!(sanitize_filename("#chan\u{3}04"), "#chan04");
    }

    #[test]
    fn replacement_is_applied_and_filtered() {
        assert_eq!(sanitize_filename_with("a:b", "_"), "a_b");
        assert_eq!(sanitize_filename_with("a:b", "?"), "ab");
    }

    #[test]
    fn sanitize_is_idempotent_and_clean() {
        let samples = [
            "plain",
            "",
            "Network: Libera/Chat",
            "<nick|away>",
            "\"quoted\" *star*",
            "ünïcödé?",
        ];
        for sample in samples {
            for replacement in ["", "_", "-:-"] {
                let once = sanitize_filename_with(sample, replacement);
                assert!(!once.chars().any(is_illegal), "{once:?}");
                assert_eq!(sanitize_filename_with(&once, replacement), once);
            }
        }
    }

    #[test]
    fn filename_uses_last_segment_without_query() {
        assert_eq!(
            filename_from_url("https://example.com/pics/cat.png?size=large#top"),
            "cat.png"
        );
        assert_eq!(filename_from_url("https://example.com/"), "image");
        assert_eq!(filename_from_url("https://example.com/a%3Fb.jpg"), "a%3Fb.jpg");
    }
}
