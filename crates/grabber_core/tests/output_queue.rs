use std::sync::Arc;
use std::thread;

use grabber_core::{ChatContext, DeferredAction, DrainReport, OutputQueue, ReentrancyGuard};

fn print(text: &str) -> DeferredAction {
    DeferredAction::PrintLine {
        context: None,
        text: text.to_string(),
    }
}

fn text_of(action: &DeferredAction) -> String {
    match action {
        DeferredAction::PrintLine { text, .. } | DeferredAction::ReportError { text } => {
            text.clone()
        }
        DeferredAction::EmitEvent { fields, .. } => fields.join(" "),
    }
}

#[test]
fn drain_runs_actions_in_fifo_order_under_guard() {
    grabber_logging::initialize_for_tests();
    let queue = OutputQueue::new();
    let guard = ReentrancyGuard::new();
    queue.enqueue(print("one"));
    queue.enqueue(DeferredAction::EmitEvent {
        context: ChatContext::new("net", "#c"),
        event_name: "Generic Message".to_string(),
        fields: vec!["two".to_string()],
    });
    queue.enqueue(DeferredAction::ReportError {
        text: "three".to_string(),
    });

    let mut seen = Vec::new();
    let report = queue.drain(&guard, |action| {
        assert!(guard.is_emitting());
        seen.push(text_of(&action));
    });

    assert_eq!(seen, vec!["one", "two", "three"]);
    assert_eq!(report, DrainReport::Drained { executed: 3, failed: 0 });
    assert!(queue.is_empty());
    assert!(!guard.is_emitting());
}

#[test]
fn drain_is_skipped_while_an_emission_is_in_progress() {
    let queue = OutputQueue::new();
    let guard = ReentrancyGuard::new();
    queue.enqueue(print("later"));

    let scope = guard.enter().unwrap();
    let report = queue.drain(&guard, |_| panic!("must not run"));
    drop(scope);

    assert_eq!(report, DrainReport::Busy);
    assert_eq!(queue.len(), 1);
}

#[test]
fn panicking_action_is_dropped_and_drain_continues() {
    let queue = OutputQueue::new();
    let guard = ReentrancyGuard::new();
    queue.enqueue(print("boom"));
    queue.enqueue(print("after"));

    let mut seen = Vec::new();
    let report = queue.drain(&guard, |action| {
        let text = text_of(&action);
        if text == "boom" {
            panic!("host rejected the print");
        }
        seen.push(text);
    });

    assert_eq!(seen, vec!["after"]);
    assert_eq!(report, DrainReport::Drained { executed: 1, failed: 1 });
    assert!(!guard.is_emitting());
    assert!(queue.is_empty());
}

#[test]
fn actions_enqueued_during_drain_wait_for_next_tick() {
    let queue = OutputQueue::new();
    let guard = ReentrancyGuard::new();
    queue.enqueue(print("first"));

    let producer = queue.clone();
    let report = queue.drain(&guard, |_| producer.enqueue(print("second")));
    assert_eq!(report, DrainReport::Drained { executed: 1, failed: 0 });
    assert_eq!(queue.snapshot(), vec![print("second")]);

    let report = queue.drain(&guard, |_| {});
    assert_eq!(report, DrainReport::Drained { executed: 1, failed: 0 });
    assert!(queue.is_empty());
}

#[test]
fn enqueue_from_many_threads_is_never_lost() {
    let queue = OutputQueue::new();
    let guard = Arc::new(ReentrancyGuard::new());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let queue = queue.clone();
            thread::spawn(move || {
                for n in 0..50 {
                    queue.enqueue(print(&format!("{worker}-{n}")));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut count = 0;
    queue.drain(&guard, |_| count += 1);
    assert_eq!(count, 400);
}
