use std::future::Future;
use std::io;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::FutureExt;
use grabber_core::{DeferredAction, OutputQueue};
use grabber_logging::{grabber_debug, grabber_info, grabber_warn};
use tokio::runtime::Runtime;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;

use crate::job::DownloadJob;
use crate::sites::SiteContext;
use crate::types::error_chain;
use crate::{JobError, JobReport, SubmitError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub submitted: usize,
    pub running: usize,
    pub peak_running: usize,
    pub completed: usize,
    pub failed: usize,
    pub rejected: usize,
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicUsize,
    running: AtomicUsize,
    peak_running: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    rejected: AtomicUsize,
}

impl Counters {
    fn started(&self) {
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_running.fetch_max(running, Ordering::SeqCst);
    }

    fn finished(&self, ok: bool) {
        self.running.fetch_sub(1, Ordering::SeqCst);
        if ok {
            self.completed.fetch_add(1, Ordering::SeqCst);
        } else {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn snapshot(&self) -> PoolStats {
        PoolStats {
            submitted: self.submitted.load(Ordering::SeqCst),
            running: self.running.load(Ordering::SeqCst),
            peak_running: self.peak_running.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            rejected: self.rejected.load(Ordering::SeqCst),
        }
    }
}

/// Fixed-size set of workers running download jobs off the host thread.
///
/// At most `workers` jobs run at once; the rest wait for a permit. A job that
/// fails or panics is logged without affecting any other job. In debug mode
/// every outcome is also reported through the output queue.
pub struct WorkerPool {
    runtime: Runtime,
    tracker: TaskTracker,
    permits: Arc<Semaphore>,
    open: Mutex<bool>,
    counters: Arc<Counters>,
    site: Arc<SiteContext>,
    outputs: OutputQueue,
    workers: usize,
    debug: bool,
}

impl WorkerPool {
    pub fn new(
        workers: usize,
        site: SiteContext,
        outputs: OutputQueue,
        debug: bool,
    ) -> io::Result<Self> {
        let workers = workers.max(1);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("grabber-worker")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime,
            tracker: TaskTracker::new(),
            permits: Arc::new(Semaphore::new(workers)),
            open: Mutex::new(true),
            counters: Arc::new(Counters::default()),
            site: Arc::new(site),
            outputs,
            workers,
            debug,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }

    pub fn is_open(&self) -> bool {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue `job`. Returns immediately; refused once shutdown has begun.
    pub fn submit(&self, job: DownloadJob) -> Result<(), SubmitError> {
        let label = job.label();
        let site = self.site.clone();
        self.spawn_job(label, async move { job.run(&site).await })
    }

    /// Drive `future` to completion on the pool's runtime from the calling
    /// thread. Must not be called from inside a worker.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Stop accepting jobs and wait for every queued and running job.
    /// Calling it again is a no-op.
    pub fn shutdown(&self) {
        {
            let mut open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
            if !*open {
                return;
            }
            *open = false;
        }
        self.tracker.close();
        grabber_info!("Waiting for {} download job(s) to finish", self.tracker.len());
        self.runtime.block_on(self.tracker.wait());
        let stats = self.stats();
        grabber_info!(
            "Worker pool stopped: completed={} failed={} rejected={}",
            stats.completed,
            stats.failed,
            stats.rejected
        );
    }

    pub(crate) fn spawn_job<F>(&self, label: String, job: F) -> Result<(), SubmitError>
    where
        F: Future<Output = Result<JobReport, JobError>> + Send + 'static,
    {
        let open = self.open.lock().unwrap_or_else(PoisonError::into_inner);
        if !*open {
            self.counters.rejected.fetch_add(1, Ordering::SeqCst);
            grabber_warn!("Rejected job after shutdown: {}", label);
            return Err(SubmitError::ShutDown);
        }

        self.counters.submitted.fetch_add(1, Ordering::SeqCst);
        grabber_debug!("Submitted job {}", label);

        let permits = self.permits.clone();
        let counters = self.counters.clone();
        let outputs = self.outputs.clone();
        let debug = self.debug;
        self.runtime.spawn(self.tracker.track_future(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            counters.started();
            let result = match AssertUnwindSafe(job).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(JobError::Panicked(panic_message(panic.as_ref()))),
            };
            counters.finished(result.is_ok());

            match result {
                Ok(report) => {
                    grabber_info!("Job {} done: {}", label, report);
                    if debug {
                        outputs.enqueue(DeferredAction::PrintLine {
                            context: None,
                            text: format!("Image Grabber: {label}: {report}"),
                        });
                    }
                }
                Err(err) => {
                    let trace = error_chain(&err);
                    grabber_warn!("Job {} failed: {}", label, trace);
                    if debug {
                        outputs.enqueue(DeferredAction::ReportError {
                            text: format!("Image Grabber: {label} failed:\n{trace}"),
                        });
                    }
                }
            }
        }));
        drop(open);
        Ok(())
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
