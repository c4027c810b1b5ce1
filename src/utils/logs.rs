use tracing::Level;

// setup_tracing installs the json subscriber used by the sweeper binary
pub fn setup_tracing(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // keeps ANSI color codes out of collected log files.
        .with_ansi(false)
        .json()
        .init();
}
