//! mIRC formatting to ANSI terminal escapes.
use grabber_core::{
    skip_hex_color, take_color, BOLD_BYTE, COLOR_BYTE, HEX_COLOR_BYTE, ITALICS_BYTE,
    MONOSPACE_BYTE, RESET_BYTE, REVERSE_BYTE, STRIKETHROUGH_BYTE, UNDERLINE_BYTE,
};

const SGR_RESET: &str = "\x1b[0m";
const SGR_DEFAULT_COLORS: &str = "\x1b[39;49m";

/// Foreground SGR code for each of the 16 mIRC colors.
const FOREGROUND: [u8; 16] = [97, 30, 34, 32, 91, 31, 35, 33, 93, 92, 36, 96, 94, 95, 90, 37];

pub(crate) fn to_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut styled = false;
    let mut bold = false;
    let mut italics = false;
    let mut underline = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            COLOR_BYTE => {
                styled = true;
                match take_color(&mut chars) {
                    Some((fg, Some(bg))) => {
                        let bg = foreground(bg) + 10;
                        out.push_str(&format!("\x1b[{};{bg}m", foreground(fg)));
                    }
                    Some((fg, None)) => out.push_str(&format!("\x1b[{}m", foreground(fg))),
                    None => out.push_str(SGR_DEFAULT_COLORS),
                }
            }
            HEX_COLOR_BYTE => skip_hex_color(&mut chars),
            BOLD_BYTE => {
                styled = true;
                bold = !bold;
                out.push_str(if bold { "\x1b[1m" } else { "\x1b[22m" });
            }
            ITALICS_BYTE => {
                styled = true;
                italics = !italics;
                out.push_str(if italics { "\x1b[3m" } else { "\x1b[23m" });
            }
            UNDERLINE_BYTE => {
                styled = true;
                underline = !underline;
                out.push_str(if underline { "\x1b[4m" } else { "\x1b[24m" });
            }
            RESET_BYTE => {
                styled = true;
                bold = false;
                italics = false;
                underline = false;
                out.push_str(SGR_RESET);
            }
            MONOSPACE_BYTE | REVERSE_BYTE | STRIKETHROUGH_BYTE => {}
            other => out.push(other),
        }
    }

    if styled {
        out.push_str(SGR_RESET);
    }
    out
}

fn foreground(color: u8) -> u8 {
    FOREGROUND.get(usize::from(color)).copied().unwrap_or(39)
}
