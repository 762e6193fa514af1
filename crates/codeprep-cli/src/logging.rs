//! Subscriber setup for the batch driver

use tracing::Level;

/// Map a configured level name to a [`Level`], defaulting to `INFO`
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global fmt subscriber writing to stderr
///
/// `verbose` forces `DEBUG` and adds targets and line numbers.
pub fn init_logging(level: &str, verbose: bool) {
    use tracing_subscriber::fmt;

    let level = if verbose { Level::DEBUG } else { parse_level(level) };

    fmt()
        .with_max_level(level)
        .with_target(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .init();
}
