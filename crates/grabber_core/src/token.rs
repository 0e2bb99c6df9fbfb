use url::Url;

use crate::style::{color_text, strip_formatting, Color};

const LEADING_PUNCTUATION: &[char] = &[','];
const TRAILING_PUNCTUATION: &[char] = &[',', '.', ';', '!', '?'];

/// Cheap pre-check run before any tokenizing.
pub fn contains_link_marker(line: &str) -> bool {
    line.contains("http://") || line.contains("https://")
}

/// A space-delimited piece of a chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub index: usize,
    pub raw: String,
    /// Formatting stripped, surrounding punctuation removed.
    pub text: String,
    prefix: String,
    suffix: String,
}

impl Token {
    fn parse(index: usize, raw: &str) -> Self {
        let stripped = strip_formatting(raw);
        let after_prefix = stripped.trim_start_matches(LEADING_PUNCTUATION);
        let text = after_prefix.trim_end_matches(TRAILING_PUNCTUATION);
        let prefix = stripped[..stripped.len() - after_prefix.len()].to_string();
        let suffix = after_prefix[text.len()..].to_string();
        Self {
            index,
            raw: raw.to_string(),
            text: text.to_string(),
            prefix,
            suffix,
        }
    }

    /// The token as a URL, if it is a well-formed `http`/`https` link.
    pub fn link(&self) -> Option<&str> {
        if !(self.text.starts_with("http://") || self.text.starts_with("https://")) {
            return None;
        }
        Url::parse(&self.text).ok().map(|_| self.text.as_str())
    }

    fn painted(&self, color: Color) -> String {
        format!("{}{}{}", self.prefix, color_text(&self.text, color), self.suffix)
    }
}

/// Split a line on single spaces, keeping empty pieces so the line can be
/// rebuilt byte for byte.
pub fn tokenize(line: &str) -> Vec<Token> {
    line.split(' ')
        .enumerate()
        .map(|(index, raw)| Token::parse(index, raw))
        .collect()
}

/// A chat line whose link tokens can be recolored in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    parts: Vec<String>,
    painted: Vec<bool>,
}

impl AnnotatedLine {
    pub fn new(tokens: &[Token]) -> Self {
        Self {
            parts: tokens.iter().map(|t| t.raw.clone()).collect(),
            painted: vec![false; tokens.len()],
        }
    }

    pub fn paint(&mut self, token: &Token, color: Color) {
        let index = token.index;
        if let (Some(part), Some(painted)) =
            (self.parts.get_mut(index), self.painted.get_mut(index))
        {
            *part = token.painted(color);
            *painted = true;
        }
    }

    /// Number of distinct tokens painted; repainting one does not count twice.
    pub fn painted_count(&self) -> usize {
        self.painted.iter().filter(|painted| **painted).count()
    }

    pub fn render(&self) -> String {
        self.parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_requires_scheme() {
        assert!(contains_link_marker("see https://x.y/z"));
        assert!(contains_link_marker("http://x"));
        assert!(!contains_link_marker("www.example.com and http:/nope"));
    }

    #[test]
    fn tokens_keep_index_and_strip_punctuation() {
        let tokens = tokenize("look: \x02https://a.example/b.png\x02, ok");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].index, 1);
        assert_eq!(tokens[1].text, "https://a.example/b.png");
        assert_eq!(tokens[1].link(), Some("https://a.example/b.png"));
        assert_eq!(tokens[0].link(), None);
    }

    #[test]
    fn untouched_line_renders_identically() {
        let line = "two  spaces and https://x.example/ end";
        assert_eq!(AnnotatedLine::new(&tokenize(line)).render(), line);
    }

    #[test]
    fn painting_keeps_punctuation_outside_color() {
        let tokens = tokenize("(see) ,https://x.example/a.jpg.");
        let mut line = AnnotatedLine::new(&tokens);
        line.paint(&tokens[1], Color::Green);
        assert_eq!(line.render(), "(see) ,\x0303https://x.example/a.jpg\x03.");
        assert_eq!(line.painted_count(), 1);
    }

    #[test]
    fn repainting_a_token_replaces_its_color() {
        let tokens = tokenize("https://x.example/a.jpg");
        let mut line = AnnotatedLine::new(&tokens);
        line.paint(&tokens[0], Color::LightRed);
        line.paint(&tokens[0], Color::Green);
        assert_eq!(line.render(), "\x0303https://x.example/a.jpg\x03");
        assert_eq!(line.painted_count(), 1);
    }

    #[test]
    fn bare_scheme_is_not_a_link() {
        assert_eq!(tokenize("http://")[0].link(), None);
    }
}
