//! Handlers for sites whose links point at pages rather than images.
//!
//! Handlers are consulted in registration order and every one that matches
//! a URL gets to fetch it.
mod imgur;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::persist::{CollisionSafeWriter, PersistError};

pub use imgur::ImgurHandler;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl HandlerError {
    pub(crate) fn http(url: &str) -> impl FnOnce(reqwest::Error) -> HandlerError + '_ {
        move |source| HandlerError::Http {
            url: url.to_string(),
            source,
        }
    }
}

/// Shared resources a handler may use while fetching.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub client: reqwest::Client,
    pub writer: CollisionSafeWriter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteReport {
    pub saved: Vec<PathBuf>,
    pub skipped: usize,
}

#[async_trait::async_trait]
pub trait SiteHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Cheap, side-effect free test run on the host thread.
    fn matches(&self, url: &str) -> bool;

    /// Retrieve the images behind `url` into `directory`. Runs on a worker.
    async fn fetch(
        &self,
        site: &SiteContext,
        url: &str,
        directory: &Path,
    ) -> Result<SiteReport, HandlerError>;
}

/// Ordered collection of site handlers. Read-only once the grabber starts.
#[derive(Clone, Default)]
pub struct SiteRegistry {
    handlers: Vec<Arc<dyn SiteHandler>>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in handler.
    pub fn with_defaults() -> Self {
        Self::new().with(ImgurHandler)
    }

    pub fn with(mut self, handler: impl SiteHandler + 'static) -> Self {
        self.register(handler);
        self
    }

    pub fn register(&mut self, handler: impl SiteHandler + 'static) {
        self.handlers.push(Arc::new(handler));
    }

    /// All handlers claiming `url`, in registration order.
    pub fn matching(&self, url: &str) -> Vec<Arc<dyn SiteHandler>> {
        self.handlers
            .iter()
            .filter(|handler| handler.matches(url))
            .cloned()
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for SiteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
