use grabber_core::{DeferredAction, DrainReport};
use grabber_logging::{grabber_error, grabber_trace};

use crate::grabber::ImageGrabber;
use crate::host::Host;

impl ImageGrabber {
    /// Timer hook. Replays queued actions on the host thread and always asks
    /// to keep the timer.
    pub fn on_timer(&self, host: &dyn Host) -> bool {
        match self.outputs.drain(&self.guard, |action| run_action(host, action)) {
            DrainReport::Busy => grabber_trace!("Output queue drain skipped: emission in progress"),
            DrainReport::Drained { failed, .. } if failed > 0 => {
                grabber_error!("{} queued action(s) failed and were dropped", failed);
            }
            DrainReport::Drained { .. } => {}
        }
        true
    }
}

fn run_action(host: &dyn Host, action: DeferredAction) {
    match action {
        DeferredAction::PrintLine { context, text } => host.print(context.as_ref(), &text),
        DeferredAction::EmitEvent {
            context,
            event_name,
            fields,
        } => host.emit_print(&context, &event_name, &fields),
        DeferredAction::ReportError { text } => host.print(None, &text),
    }
}
