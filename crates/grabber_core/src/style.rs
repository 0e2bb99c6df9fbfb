//! mIRC-style formatting bytes used by chat clients.
use std::iter::Peekable;

pub const BOLD_BYTE: char = '\x02';
pub const COLOR_BYTE: char = '\x03';
pub const HEX_COLOR_BYTE: char = '\x04';
pub const RESET_BYTE: char = '\x0f';
pub const MONOSPACE_BYTE: char = '\x11';
pub const REVERSE_BYTE: char = '\x16';
pub const ITALICS_BYTE: char = '\x1d';
pub const STRIKETHROUGH_BYTE: char = '\x1e';
pub const UNDERLINE_BYTE: char = '\x1f';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    LightRed,
}

impl Color {
    pub fn code(self) -> &'static str {
        match self {
            Color::Green => "03",
            Color::LightRed => "04",
        }
    }
}

pub fn color_text(text: &str, color: Color) -> String {
    format!("{COLOR_BYTE}{}{text}{COLOR_BYTE}", color.code())
}

/// Remove all formatting control codes, including the digits that belong to
/// a color code (`\x03FF[,BB]` or `\x04RRGGBB[,RRGGBB]`).
pub fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            COLOR_BYTE => {
                take_color(&mut chars);
            }
            HEX_COLOR_BYTE => skip_hex_color(&mut chars),
            BOLD_BYTE | RESET_BYTE | MONOSPACE_BYTE | REVERSE_BYTE | ITALICS_BYTE
            | STRIKETHROUGH_BYTE | UNDERLINE_BYTE => {}
            other => out.push(other),
        }
    }
    out
}

/// Consume the `FF[,BB]` that follows a [`COLOR_BYTE`] and return the
/// foreground and optional background color numbers. `None` means a bare
/// color byte, which resets colors.
pub fn take_color<I>(chars: &mut Peekable<I>) -> Option<(u8, Option<u8>)>
where
    I: Iterator<Item = char> + Clone,
{
    let foreground = take_number(chars)?;
    let background = if comma_then(chars, char::is_ascii_digit) {
        take_number(chars)
    } else {
        None
    };
    Some((foreground, background))
}

/// Consume the `RRGGBB[,RRGGBB]` that follows a [`HEX_COLOR_BYTE`].
pub fn skip_hex_color<I>(chars: &mut Peekable<I>)
where
    I: Iterator<Item = char> + Clone,
{
    if take_while_max(chars, 6, char::is_ascii_hexdigit) == 6
        && comma_then(chars, char::is_ascii_hexdigit)
    {
        take_while_max(chars, 6, char::is_ascii_hexdigit);
    }
}

/// Up to two decimal digits.
fn take_number<I: Iterator<Item = char>>(chars: &mut Peekable<I>) -> Option<u8> {
    let mut value: Option<u8> = None;
    for _ in 0..2 {
        let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) else {
            break;
        };
        chars.next();
        value = Some(value.unwrap_or(0) * 10 + digit as u8);
    }
    value
}

/// Consume a `,` only when the character after it satisfies `next`.
fn comma_then<I>(chars: &mut Peekable<I>, next: fn(&char) -> bool) -> bool
where
    I: Iterator<Item = char> + Clone,
{
    if chars.peek() != Some(&',') {
        return false;
    }
    let mut lookahead = chars.clone();
    lookahead.next();
    if lookahead.peek().is_some_and(next) {
        chars.next();
        true
    } else {
        false
    }
}

fn take_while_max<I: Iterator<Item = char>>(
    chars: &mut Peekable<I>,
    max: usize,
    pred: fn(&char) -> bool,
) -> usize {
    let mut taken = 0;
    while taken < max && chars.peek().is_some_and(pred) {
        chars.next();
        taken += 1;
    }
    taken
}
