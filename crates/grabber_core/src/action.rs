use crate::context::ChatContext;

/// Work that touches the host and therefore must run on the host thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    /// Print `text` into `context`, or the currently focused window.
    PrintLine {
        context: Option<ChatContext>,
        text: String,
    },
    /// Emit a print event as if the host had produced it.
    EmitEvent {
        context: ChatContext,
        event_name: String,
        fields: Vec<String>,
    },
    /// Diagnostic output, only produced in debug mode.
    ReportError { text: String },
}
