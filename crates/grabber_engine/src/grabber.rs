use grabber_core::{OutputQueue, ReentrancyGuard};
use grabber_logging::grabber_info;

use crate::config::{ConfigError, GrabberConfig};
use crate::fetch::{build_client, GenericFetcher};
use crate::persist::CollisionSafeWriter;
use crate::pool::{PoolStats, WorkerPool};
use crate::sites::{SiteContext, SiteRegistry};
use crate::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum GrabberError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not build http client: {0}")]
    Client(#[from] FetchError),
    #[error("could not start worker pool: {0}")]
    Pool(#[from] std::io::Error),
}

/// Everything the grabber owns for the lifetime of the host session.
///
/// The host calls [`ImageGrabber::on_print_event`] for each hooked event,
/// [`ImageGrabber::on_timer`] every [`crate::OUTPUT_QUEUE_INTERVAL`], and
/// [`ImageGrabber::on_unload`] once when it unloads the grabber.
pub struct ImageGrabber {
    pub(crate) config: GrabberConfig,
    pub(crate) registry: SiteRegistry,
    pub(crate) fetcher: GenericFetcher,
    pub(crate) pool: WorkerPool,
    pub(crate) outputs: OutputQueue,
    pub(crate) guard: ReentrancyGuard,
}

impl ImageGrabber {
    pub fn new(config: GrabberConfig) -> Result<Self, GrabberError> {
        Self::with_registry(config, SiteRegistry::with_defaults())
    }

    pub fn with_registry(
        config: GrabberConfig,
        registry: SiteRegistry,
    ) -> Result<Self, GrabberError> {
        config.validate()?;

        let settings = config.fetch_settings();
        let client = build_client(&settings)?;
        let outputs = OutputQueue::new();
        let site = SiteContext {
            client: client.clone(),
            writer: CollisionSafeWriter::new(config.file_exists_mode),
        };
        let pool = WorkerPool::new(config.download_threads, site, outputs.clone(), config.debug)?;

        grabber_info!(
            "Image grabber ready: root={:?} workers={} handlers={:?}",
            config.path,
            pool.workers(),
            registry
        );

        Ok(Self {
            fetcher: GenericFetcher::new(client, settings),
            config,
            registry,
            pool,
            outputs,
            guard: ReentrancyGuard::new(),
        })
    }

    pub fn config(&self) -> &GrabberConfig {
        &self.config
    }

    /// Handle to the queue of actions waiting for the host thread.
    pub fn outputs(&self) -> &OutputQueue {
        &self.outputs
    }

    pub fn is_emitting(&self) -> bool {
        self.guard.is_emitting()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Unload hook: refuse new jobs and wait for the running ones.
    pub fn on_unload(&self) {
        self.pool.shutdown();
    }
}
