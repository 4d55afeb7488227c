//! Logging setup for the command line front end.
//!
//! The library only emits `tracing` events; a subscriber is installed
//! here, by the binary.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

/// Installs a compact stderr subscriber showing `LEVEL message` lines at
/// `level` and above. A second call leaves the first subscriber in place.
pub fn init(level: LevelFilter) {
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(level);

    let _ = Registry::default().with(layer).try_init();
}

/// Maps the number of `-v` flags to a level: warnings by default, then
/// info, debug and trace.
pub fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
