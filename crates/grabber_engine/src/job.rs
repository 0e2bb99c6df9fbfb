use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::fetch::ImageResponse;
use crate::persist::ensure_output_dir;
use crate::sites::{SiteContext, SiteHandler};
use crate::{JobError, JobReport};

/// One unit of background work. Owned by the worker that runs it.
pub enum DownloadJob {
    /// Write an already verified response to `target`.
    Response {
        response: ImageResponse,
        target: PathBuf,
    },
    /// Let a site handler scrape `url` into `directory`.
    Site {
        handler: Arc<dyn SiteHandler>,
        url: String,
        directory: PathBuf,
    },
}

impl DownloadJob {
    pub fn label(&self) -> String {
        match self {
            DownloadJob::Response { response, target } => {
                format!("{} -> {}", response.final_url(), target.display())
            }
            DownloadJob::Site {
                handler,
                url,
                directory,
            } => format!("{} {} -> {}", handler.name(), url, directory.display()),
        }
    }

    pub(crate) async fn run(self, site: &SiteContext) -> Result<JobReport, JobError> {
        match self {
            DownloadJob::Response { response, target } => {
                if let Some(parent) = target.parent() {
                    ensure_output_dir(parent)?;
                }
                let stream = response.into_response().bytes_stream();
                let outcome = site.writer.write_stream(&target, stream).await?;
                Ok(JobReport::File(outcome))
            }
            DownloadJob::Site {
                handler,
                url,
                directory,
            } => {
                let report = handler.fetch(site, &url, &directory).await?;
                Ok(JobReport::Site {
                    handler: handler.name(),
                    saved: report.saved,
                    skipped: report.skipped,
                })
            }
        }
    }
}

impl fmt::Debug for DownloadJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DownloadJob").field(&self.label()).finish()
    }
}
