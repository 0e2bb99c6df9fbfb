use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use grabber_core::ChatContext;
use grabber_engine::{ChatEvent, EventResult, Host, ImageGrabber, OUTPUT_QUEUE_INTERVAL};
use grabber_logging::{grabber_debug, grabber_info, grabber_warn};

use super::input::{parse_line, ConsoleInput};

const NETWORK: &str = "Console";
const DEFAULT_CHANNEL: &str = "#lobby";

/// Feed `input` to the grabber line by line until EOF or `/quit`, running
/// the output queue timer in between. Unloads the grabber before returning.
pub(crate) fn run<R>(grabber: &ImageGrabber, host: &dyn Host, input: R) -> anyhow::Result<()>
where
    R: BufRead + Send + 'static,
{
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        grabber_warn!("Stopped reading input: {}", err);
                        break;
                    }
                }
            }
        })
        .context("failed to start the input reader")?;

    let mut context = ChatContext::new(NETWORK, DEFAULT_CHANNEL);
    let mut next_tick = Some(Instant::now() + OUTPUT_QUEUE_INTERVAL);
    loop {
        if let Some(deadline) = next_tick {
            if Instant::now() >= deadline {
                next_tick = grabber
                    .on_timer(host)
                    .then(|| Instant::now() + OUTPUT_QUEUE_INTERVAL);
                continue;
            }
        }

        let received = match next_tick {
            Some(deadline) => {
                line_rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => line_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(line) => match parse_line(&line) {
                Some(ConsoleInput::Quit) => break,
                Some(input) => handle_input(grabber, host, &mut context, input),
                None => {}
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    grabber_info!("Input closed, unloading");
    grabber.on_unload();
    grabber.on_timer(host);
    Ok(())
}

fn handle_input(
    grabber: &ImageGrabber,
    host: &dyn Host,
    context: &mut ChatContext,
    input: ConsoleInput,
) {
    let (event_name, sender, text) = match input {
        ConsoleInput::Join(channel) => {
            grabber_debug!("Switching to {}", channel);
            context.channel = channel;
            host.print(Some(context), &format!("Now talking on {}", context.channel));
            return;
        }
        ConsoleInput::Say { sender, text } => (message_event(context), sender, text),
        ConsoleInput::Act { sender, text } => (action_event(context), sender, text),
        ConsoleInput::Quit => return,
    };

    let event = ChatEvent::new(context.clone(), event_name, sender, text);
    if grabber.on_print_event(host, &event) == EventResult::NotConsumed {
        host.emit_print(&event.context, &event.event_name, &event.fields);
    }
}

fn message_event(context: &ChatContext) -> &'static str {
    if context.is_channel() {
        "Channel Message"
    } else {
        "Private Message to Dialog"
    }
}

fn action_event(context: &ChatContext) -> &'static str {
    if context.is_channel() {
        "Channel Action"
    } else {
        "Private Action to Dialog"
    }
}
