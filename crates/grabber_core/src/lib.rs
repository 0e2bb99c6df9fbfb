//! Image grabber core: pure building blocks shared by the engine and hosts.
mod action;
mod classification;
mod context;
mod filename;
mod guard;
mod queue;
mod style;
mod token;

pub use action::DeferredAction;
pub use classification::Classification;
pub use context::{download_directory, ChatContext};
pub use filename::{
    filename_from_url, is_illegal, path_segment, sanitize_filename, sanitize_filename_with,
    ILLEGAL_FILENAME_CHARACTERS,
};
pub use guard::{EmissionScope, ReentrancyGuard};
pub use queue::{DrainReport, OutputQueue};
pub use style::{
    color_text, skip_hex_color, strip_formatting, take_color, Color, BOLD_BYTE, COLOR_BYTE,
    HEX_COLOR_BYTE, ITALICS_BYTE, MONOSPACE_BYTE, RESET_BYTE, REVERSE_BYTE, STRIKETHROUGH_BYTE,
    UNDERLINE_BYTE,
};
pub use token::{contains_link_marker, tokenize, AnnotatedLine, Token};
