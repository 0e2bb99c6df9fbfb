use std::path::{Path, PathBuf};

use crate::filename::path_segment;
use crate::style::strip_formatting;

/// The chat window an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatContext {
    pub network: String,
    pub channel: String,
}

impl ChatContext {
    pub fn new(network: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            channel: channel.into(),
        }
    }

    pub fn is_channel(&self) -> bool {
        self.channel.starts_with('#')
    }
}

/// `<root>/<network>/<channel>[/<nickname>]`, every segment sanitized.
///
/// The nickname level is only added for channels; private conversations are
/// already one directory per peer.
pub fn download_directory(
    root: &Path,
    context: &ChatContext,
    sender: &str,
    save_by_nickname: bool,
) -> PathBuf {
    let mut path = root.join(path_segment(&context.network));
    path.push(path_segment(&context.channel));
    if save_by_nickname && context.is_channel() {
        path.push(path_segment(&strip_formatting(sender)));
    }
    path
}
