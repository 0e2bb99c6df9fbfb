//! The chat client as seen by the grabber.
use std::time::Duration;

use grabber_core::ChatContext;

/// Print events the grabber hooks.
pub const HOOKED_PRINT_EVENTS: [&str; 8] = [
    "Channel Action",
    "Channel Action Hilight",
    "Channel Message",
    "Channel Msg Hilight",
    "Private Action",
    "Private Action to Dialog",
    "Private Message",
    "Private Message to Dialog",
];

/// How often the host should call [`crate::ImageGrabber::on_timer`].
pub const OUTPUT_QUEUE_INTERVAL: Duration = Duration::from_millis(1000);

/// Capabilities the grabber needs from its host. Only ever called on the
/// host's own thread; an implementation may synchronously re-enter the
/// grabber from `emit_print`, as chat clients do.
pub trait Host {
    fn emit_print(&self, context: &ChatContext, event_name: &str, fields: &[String]);
    fn print(&self, context: Option<&ChatContext>, text: &str);
}

/// Whether the host should still run its default handling for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The grabber printed the event itself.
    Consumed,
    NotConsumed,
}

/// One print event: `fields[0]` is the sender, `fields[1]` the message text,
/// anything after is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub context: ChatContext,
    pub event_name: String,
    pub fields: Vec<String>,
}

impl ChatEvent {
    pub fn new(
        context: ChatContext,
        event_name: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            context,
            event_name: event_name.into(),
            fields: vec![sender.into(), text.into()],
        }
    }

    pub fn sender(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    pub fn text(&self) -> Option<&str> {
        self.fields.get(1).map(String::as_str)
    }

    pub fn is_hooked(&self) -> bool {
        HOOKED_PRINT_EVENTS.contains(&self.event_name.as_str())
    }

    /// Fields with the message text swapped for `text`.
    pub(crate) fn fields_with_text(&self, text: String) -> Vec<String> {
        let mut fields = self.fields.clone();
        if let Some(slot) = fields.get_mut(1) {
            *slot = text;
        }
        fields
    }
}
