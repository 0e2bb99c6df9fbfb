mod console;

use std::env;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use grabber_engine::ImageGrabber;
use grabber_logging::{grabber_info, LogDestination};
use log::LevelFilter;

use console::{ConsoleHost, DEFAULT_CONFIG_FILE};

fn main() -> anyhow::Result<()> {
    grabber_logging::initialize(LogDestination::default(), LevelFilter::Info);

    let config_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = console::load_config(&config_path);
    let grabber = ImageGrabber::new(config).context("failed to start the image grabber")?;
    grabber_info!("Saving images under {:?}", grabber.config().path);

    let host = ConsoleHost::new(io::stdout());
    console::run(&grabber, &host, BufReader::new(io::stdin()))
}
