use std::sync::Arc;

use futures_util::future::join_all;
use grabber_core::{
    contains_link_marker, download_directory, tokenize, AnnotatedLine, Classification, Token,
};
use grabber_logging::{grabber_debug, grabber_warn};

use crate::fetch::{ImageResponse, ProbeOutcome};
use crate::grabber::ImageGrabber;
use crate::host::{ChatEvent, EventResult, Host};
use crate::job::DownloadJob;
use crate::sites::SiteHandler;

/// A download decided during classification, waiting for its directory.
enum Pending {
    Site {
        handler: Arc<dyn SiteHandler>,
        url: String,
    },
    Image(ImageResponse),
}

impl ImageGrabber {
    /// Print hook. Runs on the host thread for every hooked event.
    ///
    /// Returns [`EventResult::Consumed`] only when the annotated line has been
    /// re-emitted; in every other case the host prints the event itself.
    pub fn on_print_event(&self, host: &dyn Host, event: &ChatEvent) -> EventResult {
        if self.guard.is_emitting() {
            return EventResult::NotConsumed;
        }
        let Some(text) = event.text() else {
            return EventResult::NotConsumed;
        };
        if !event.is_hooked() || !contains_link_marker(text) {
            return EventResult::NotConsumed;
        }

        let tokens = tokenize(text);
        let links: Vec<(&Token, &str, Vec<Arc<dyn SiteHandler>>)> = tokens
            .iter()
            .filter_map(|token| token.link().map(|url| (token, url)))
            .map(|(token, url)| (token, url, self.registry.matching(url)))
            .collect();

        // All probes of a line share one wait, bounded by a single timeout.
        let probes = links.iter().map(|(_, url, handlers)| async move {
            if handlers.is_empty() {
                Some(self.fetcher.probe(url).await)
            } else {
                None
            }
        });
        let outcomes = self.pool.block_on(join_all(probes));

        let mut annotated = AnnotatedLine::new(&tokens);
        let mut pending = Vec::new();
        for ((token, url, handlers), outcome) in links.into_iter().zip(outcomes) {
            let classification = match outcome {
                Some(outcome) => record_probe(url, outcome, &mut pending),
                None => {
                    pending.extend(handlers.into_iter().map(|handler| Pending::Site {
                        handler,
                        url: url.to_string(),
                    }));
                    Classification::HandledBySiteHandler
                }
            };
            grabber_debug!("Classified {} as {:?}", url, classification);
            if let Some(color) = classification.color() {
                annotated.paint(token, color);
            }
        }

        if pending.is_empty() {
            return EventResult::NotConsumed;
        }

        {
            let Some(_scope) = self.guard.enter() else {
                return EventResult::NotConsumed;
            };
            let fields = event.fields_with_text(annotated.render());
            host.emit_print(&event.context, &event.event_name, &fields);
        }

        let directory = download_directory(
            &self.config.path,
            &event.context,
            event.sender(),
            self.config.save_by_nickname,
        );
        for download in pending {
            let job = match download {
                Pending::Site { handler, url } => DownloadJob::Site {
                    handler,
                    url,
                    directory: directory.clone(),
                },
                Pending::Image(response) => DownloadJob::Response {
                    target: directory.join(response.filename()),
                    response,
                },
            };
            let label = job.label();
            if let Err(err) = self.pool.submit(job) {
                grabber_warn!("Dropped download {}: {}", label, err);
            }
        }

        EventResult::Consumed
    }
}

fn record_probe(url: &str, outcome: ProbeOutcome, pending: &mut Vec<Pending>) -> Classification {
    let classification = outcome.classification();
    match outcome {
        ProbeOutcome::Image(response) => pending.push(Pending::Image(response)),
        ProbeOutcome::NotImage { content_type } => {
            grabber_debug!("{} is not an image ({:?})", url, content_type);
        }
        ProbeOutcome::Failed(err) => grabber_debug!("{} rejected: {}", url, err),
    }
    classification
}
