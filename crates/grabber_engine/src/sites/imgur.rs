use std::collections::HashSet;
use std::path::Path;

use grabber_core::{filename_from_url, path_segment};
use scraper::{Html, Selector};
use url::Url;

use super::{HandlerError, SiteContext, SiteHandler, SiteReport};
use crate::persist::{ensure_output_dir, WriteOutcome};

/// imgur gallery and album pages. The images are listed in `og:image` meta
/// tags; an album with several images gets its own sub-directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImgurHandler;

#[async_trait::async_trait]
impl SiteHandler for ImgurHandler {
    fn name(&self) -> &'static str {
        "imgur"
    }

    fn matches(&self, url: &str) -> bool {
        url.starts_with("http://imgur.com/") || url.starts_with("https://imgur.com/")
    }

    async fn fetch(
        &self,
        site: &SiteContext,
        url: &str,
        directory: &Path,
    ) -> Result<SiteReport, HandlerError> {
        let page = site
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(HandlerError::http(url))?;
        let html = page.text().await.map_err(HandlerError::http(url))?;
        let image_urls = og_image_urls(&html, url);

        let multiple = image_urls.len() > 1;
        let directory = if multiple {
            directory.join(path_segment(&album_id(url)))
        } else {
            directory.to_path_buf()
        };
        ensure_output_dir(&directory)?;

        let mut report = SiteReport::default();
        for image_url in image_urls {
            let target = directory.join(filename_from_url(&image_url));
            if multiple && target.exists() {
                report.skipped += 1;
                continue;
            }

            let response = site
                .client
                .get(&image_url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(HandlerError::http(&image_url))?;
            match site.writer.write_stream(&target, response.bytes_stream()).await? {
                WriteOutcome::Written { path, .. } => report.saved.push(path),
                WriteOutcome::Skipped { .. } => report.skipped += 1,
            }
        }
        Ok(report)
    }
}

/// `og:image` contents without query strings, de-duplicated, in page order.
fn og_image_urls(html: &str, page_url: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(r#"meta[property="og:image"]"#) else {
        return Vec::new();
    };
    let base = Url::parse(page_url).ok();
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for meta in document.select(&selector) {
        let Some(content) = meta.value().attr("content").map(str::trim) else {
            continue;
        };
        let Some(resolved) = resolve_url(content, base.as_ref()) else {
            continue;
        };
        let image_url = match resolved.split_once('?') {
            Some((head, _)) => head.to_string(),
            None => resolved,
        };
        if seen.insert(image_url.clone()) {
            urls.push(image_url);
        }
    }
    urls
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<String> {
    if reference.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(reference) {
        return Some(url.into());
    }
    base.and_then(|base| base.join(reference).ok()).map(Into::into)
}

/// Last path segment of the album URL, fragment dropped.
fn album_id(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let trimmed = without_fragment.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn og_images_are_deduplicated_without_query() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://i.imgur.com/a.jpg?fb">
            <meta property="og:image" content="https://i.imgur.com/a.jpg">
            <meta property="og:title" content="ignored">
            <meta property="og:image" content="/b.png?x=1">
            </head><body></body></html>"#;
        assert_eq!(
            og_image_urls(html, "https://imgur.com/a/XyZ"),
            vec!["https://i.imgur.com/a.jpg", "https://imgur.com/b.png"]
        );
    }

    #[test]
    fn album_id_is_last_segment() {
        assert_eq!(album_id("https://imgur.com/a/XyZ#0"), "XyZ");
        assert_eq!(album_id("https://imgur.com/gallery/abc/"), "abc");
    }

    #[test]
    fn album_directory_stays_inside_the_target() {
        assert_eq!(album_id("https://imgur.com/a/.."), "..");
        assert_eq!(path_segment(&album_id("https://imgur.com/a/..")), "_");
        assert_eq!(path_segment(&album_id("https://imgur.com/a/.#x")), "_");
    }

    #[test]
    fn matches_only_the_page_host() {
        assert!(ImgurHandler.matches("http://imgur.com/abc"));
        assert!(ImgurHandler.matches("https://imgur.com/a/abc"));
        assert!(!ImgurHandler.matches("https://i.imgur.com/abc.png"));
        assert!(!ImgurHandler.matches("https://imgur.com"));
    }
}
