use std::cell::RefCell;
use std::io::Write;

use grabber_core::ChatContext;
use grabber_engine::Host;
use grabber_logging::grabber_warn;

use super::render::to_ansi;

/// Prints every line the grabber (or the default handling) emits to a
/// terminal-like writer, prefixed with a local timestamp.
pub(crate) struct ConsoleHost<W: Write> {
    out: RefCell<W>,
    clock: fn() -> String,
}

impl<W: Write> ConsoleHost<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            clock: local_timestamp,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_clock(out: W, clock: fn() -> String) -> Self {
        Self {
            out: RefCell::new(out),
            clock,
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_line(&self, context: Option<&ChatContext>, line: &str) {
        let stamp = (self.clock)();
        let rendered = to_ansi(line);
        let mut out = self.out.borrow_mut();
        let result = match context {
            Some(context) => writeln!(
                out,
                "{stamp} [{}/{}] {rendered}",
                context.network, context.channel
            ),
            None => writeln!(out, "{stamp} {rendered}"),
        };
        if let Err(err) = result.and_then(|()| out.flush()) {
            grabber_warn!("Failed to write to the console: {}", err);
        }
    }
}

impl<W: Write> Host for ConsoleHost<W> {
    fn emit_print(&self, context: &ChatContext, event_name: &str, fields: &[String]) {
        self.write_line(Some(context), &format_event(event_name, fields));
    }

    fn print(&self, context: Option<&ChatContext>, text: &str) {
        self.write_line(context, text);
    }
}

/// How a chat client shows a print event: `* nick text` for actions,
/// `<nick> text` for everything else.
fn format_event(event_name: &str, fields: &[String]) -> String {
    let sender = fields.first().map(String::as_str).unwrap_or_default();
    let text = fields.get(1).map(String::as_str).unwrap_or_default();
    if event_name.contains("Action") {
        format!("* {sender} {text}")
    } else {
        format!("<{sender}> {text}")
    }
}

fn local_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
