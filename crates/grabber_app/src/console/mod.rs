//! A terminal that plays the part of the chat client.
mod host;
mod input;
mod render;
mod run;
mod settings;

pub(crate) use host::ConsoleHost;
pub(crate) use run::run;
pub(crate) use settings::{load_config, DEFAULT_CONFIG_FILE};
