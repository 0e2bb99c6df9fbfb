//! Image grabber engine: link classification, downloads and host plumbing.
mod config;
mod dispatch;
mod drain;
mod fetch;
mod grabber;
mod host;
mod job;
mod persist;
mod pool;
mod sites;
mod types;

pub use config::{ConfigError, GrabberConfig, DEFAULT_USER_AGENT};
pub use fetch::{
    build_client, is_image_content_type, FetchSettings, GenericFetcher, ImageResponse,
    ProbeOutcome,
};
pub use grabber::{GrabberError, ImageGrabber};
pub use host::{ChatEvent, EventResult, Host, HOOKED_PRINT_EVENTS, OUTPUT_QUEUE_INTERVAL};
pub use job::DownloadJob;
pub use persist::{
    ensure_output_dir, resolve_collision, CollisionPolicy, CollisionSafeWriter, PersistError,
    WriteOutcome, REQUEST_CHUNK_SIZE,
};
pub use pool::{PoolStats, WorkerPool};
pub use sites::{HandlerError, ImgurHandler, SiteContext, SiteHandler, SiteRegistry, SiteReport};
pub use types::{error_chain, FailureKind, FetchError, JobError, JobReport, SubmitError};
