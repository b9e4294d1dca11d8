//! Tracing subscriber setup for the command line binary.

use tracing::Level;

/// Install the global fmt subscriber, writing to stderr.
///
/// `json` switches to one JSON object per event. Calling this twice is a no-op.
pub fn init_logging(verbose: bool, json: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    // Fails only when a subscriber is already installed
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
